use unicode_segmentation::UnicodeSegmentation;

/// Strips form feeds, collapses whitespace runs to one space and trims.
pub fn normalize_page_text(text: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for word in text.split(|ch: char| ch == '\u{000C}' || ch.is_whitespace()) {
		if word.is_empty() {
			continue;
		}
		if !out.is_empty() {
			out.push(' ');
		}

		out.push_str(word);
	}

	out
}

/// Drops control characters other than whitespace, then normalizes whitespace.
pub fn strip_controls(text: &str) -> String {
	let kept: String =
		text.chars().filter(|ch| !ch.is_control() || ch.is_whitespace()).collect();

	normalize_page_text(&kept)
}

/// The first `max_chars` user-perceived characters of `text`.
pub fn take_chars(text: &str, max_chars: usize) -> String {
	text.graphemes(true).take(max_chars).collect()
}

/// Snippet text: control characters stripped, whitespace normalized, truncated.
pub fn snippet_of(text: &str, max_chars: usize) -> String {
	take_chars(&strip_controls(text), max_chars)
}

/// Non-overlapping occurrences of `needle`, counting stops at `cap`.
pub fn count_occurrences(haystack: &str, needle: &str, cap: usize) -> usize {
	if needle.is_empty() {
		return 0;
	}

	haystack.match_indices(needle).take(cap).count()
}

/// Number of distinct `terms` present in `text`, compared case-insensitively.
pub fn count_distinct_terms(text: &str, terms: &[String]) -> usize {
	if terms.is_empty() || text.is_empty() {
		return 0;
	}

	let lowered = text.to_lowercase();

	terms
		.iter()
		.filter(|term| !term.is_empty() && lowered.contains(term.to_lowercase().as_str()))
		.count()
}

pub fn contains_any_term(text: &str, terms: &[String]) -> bool {
	count_distinct_terms(text, terms) > 0
}
