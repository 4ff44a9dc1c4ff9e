//! Explicit `doc=<token> pdfPage=<n>` directives embedded in a query.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// ASCII word boundaries, so directives glued to native-script text still match.
static PIN: LazyLock<Option<Regex>> = LazyLock::new(|| {
	Regex::new(r"(?i)(?-u:\b)doc\s*=\s*(\S+?)\s+pdfPage\s*=\s*(\d+)").ok()
});
static DOC_FRAGMENT: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"(?i)(?-u:\b)doc\s*=\s*[!-~]+").ok());
static PAGE_FRAGMENT: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"(?i)(?-u:\b)pdfPage\s*=\s*\d+").ok());
static BARE_PAGE: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"(?-u:\b)[Pp]\d+(?-u:\b)").ok());

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pin {
	pub doc: String,
	pub pdf_page: i32,
}

/// Finds the first pin in a raw query. Full-width syntax is folded with NFKC first.
pub fn parse_pin(raw: &str) -> Option<Pin> {
	let folded: String = raw.nfkc().collect();
	let re = (*PIN).as_ref()?;
	let captures = re.captures(&folded)?;
	let doc = captures.get(1)?.as_str().trim();
	let pdf_page = captures.get(2)?.as_str().parse::<i32>().ok()?;

	if doc.is_empty() || pdf_page < 1 {
		return None;
	}

	Some(Pin { doc: doc.to_string(), pdf_page })
}

/// Removes `doc=`, `pdfPage=` and bare `P123` fragments, leaving the free text.
pub fn strip_pin_fragments(text: &str) -> String {
	let mut out = text.to_string();

	for re in [&DOC_FRAGMENT, &PAGE_FRAGMENT, &BARE_PAGE] {
		if let Some(re) = &**re {
			out = re.replace_all(&out, " ").into_owned();
		}
	}

	out
}
