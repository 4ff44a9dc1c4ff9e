use unicode_normalization::UnicodeNormalization;

use crate::{pin, script::ScriptProfile};
use kokuzo_config::Corpus;

#[derive(Clone, Debug)]
pub struct QueryNormalizer {
	detail_marker: String,
	variants: Vec<(String, String)>,
	min_chars: usize,
	script: ScriptProfile,
}
impl QueryNormalizer {
	pub fn new(corpus: &Corpus, min_chars: usize) -> Self {
		let variants = corpus
			.orthographic_variants
			.iter()
			.filter(|[from, _]| !from.is_empty())
			.map(|[from, to]| (from.clone(), to.clone()))
			.collect();

		Self {
			detail_marker: corpus.detail_marker.nfkc().collect(),
			variants,
			min_chars,
			script: ScriptProfile::japanese(),
		}
	}

	pub fn script(&self) -> &ScriptProfile {
		&self.script
	}

	/// Canonical free-text form of a raw query, or an empty string when too little remains.
	pub fn normalize(&self, raw: &str) -> String {
		let mut text: String = raw.nfkc().collect();

		if !self.detail_marker.is_empty() {
			text = text.replace(self.detail_marker.as_str(), " ");
		}

		text = pin::strip_pin_fragments(&text);

		for (from, to) in &self.variants {
			text = text.replace(from.as_str(), to.as_str());
		}

		let spaced: String = text
			.chars()
			.map(|ch| if self.script.is_punctuation(ch) { ' ' } else { ch })
			.collect();
		let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

		if collapsed.chars().count() < self.min_chars {
			return String::new();
		}

		collapsed
	}
}

/// Whitespace-separated terms of a normalized query, first occurrence order, no repeats.
pub fn query_terms(normalized: &str) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();

	for term in normalized.split_whitespace() {
		if out.iter().any(|existing| existing == term) {
			continue;
		}

		out.push(term.to_string());
	}

	out
}
