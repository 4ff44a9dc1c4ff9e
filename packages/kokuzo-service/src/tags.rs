use serde::{Deserialize, Serialize};

use crate::Result;
use kokuzo_config::Tags;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
	pub label: String,
	pub hits: u32,
}

/// Annotates page text. Failures are tolerated by callers and yield no tags.
pub trait TagExtractor
where
	Self: Send + Sync,
{
	fn extract(&self, text: &str) -> Result<Vec<Tag>>;
}

/// Counts occurrences of each configured label's trigger terms.
#[derive(Clone, Debug, Default)]
pub struct VocabularyTagExtractor {
	vocabulary: Vec<(String, Vec<String>)>,
}
impl VocabularyTagExtractor {
	pub fn new(tags: &Tags) -> Self {
		let vocabulary = tags
			.vocabulary
			.iter()
			.map(|(label, terms)| (label.clone(), terms.clone()))
			.collect();

		Self { vocabulary }
	}
}
impl TagExtractor for VocabularyTagExtractor {
	fn extract(&self, text: &str) -> Result<Vec<Tag>> {
		let mut out = Vec::new();

		for (label, terms) in &self.vocabulary {
			let hits: usize = terms
				.iter()
				.filter(|term| !term.is_empty())
				.map(|term| text.matches(term.as_str()).count())
				.sum();

			if hits > 0 {
				out.push(Tag { label: label.clone(), hits: u32::try_from(hits).unwrap_or(u32::MAX) });
			}
		}

		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use super::{Tag, TagExtractor, VocabularyTagExtractor};
	use kokuzo_config::Tags;

	#[test]
	fn counts_hits_per_label_in_label_order() {
		let extractor = VocabularyTagExtractor::new(&Tags {
			vocabulary: BTreeMap::from([
				("MIZU".to_string(), vec!["水".to_string()]),
				("HI".to_string(), vec!["火".to_string()]),
				("IKI".to_string(), vec!["息".to_string()]),
			]),
		});
		let tags = extractor.extract("水火の法則。水と火。").expect("Extraction must succeed.");

		assert_eq!(
			tags,
			vec![
				Tag { label: "HI".to_string(), hits: 2 },
				Tag { label: "MIZU".to_string(), hits: 2 },
			]
		);
	}
}
