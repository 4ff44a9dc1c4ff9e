use std::collections::{HashMap, HashSet};

use super::Scored;
use kokuzo_config::RankingDiversity;
use kokuzo_domain::script::ScriptProfile;

/// Non-empty, placeholder-free, and dense enough in the native script.
pub(crate) fn passes_quality(
	text: &str,
	placeholder: &str,
	script: &ScriptProfile,
	min_density: usize,
) -> bool {
	!text.trim().is_empty() && !text.contains(placeholder) && script.has_min_density(text, min_density)
}

pub(crate) fn quality_filter(
	list: Vec<Scored>,
	placeholder: &str,
	script: &ScriptProfile,
	min_density: usize,
) -> Vec<Scored> {
	list.into_iter()
		.filter(|scored| {
			!scored.candidate.snippet.contains(placeholder)
				&& scored
					.page_text
					.as_deref()
					.is_some_and(|text| passes_quality(text, placeholder, script, min_density))
		})
		.collect()
}

/// Keeps the first occurrence of each `(doc, pdf_page)`.
pub(crate) fn dedup(list: Vec<Scored>) -> Vec<Scored> {
	let mut seen: HashSet<(String, i32)> = HashSet::new();

	list.into_iter()
		.filter(|scored| seen.insert((scored.candidate.doc.clone(), scored.candidate.pdf_page)))
		.collect()
}

/// Caps documents that dominate the leading window, moving their surplus behind everyone else,
/// then truncates to `limit`.
pub(crate) fn diversity_cap(
	list: Vec<Scored>,
	diversity: &RankingDiversity,
	limit: usize,
) -> Vec<Scored> {
	let mut list = list;

	if !diversity.enabled || list.is_empty() {
		list.truncate(limit);

		return list;
	}

	let window = (diversity.window as usize).min(list.len());
	let mut counts: HashMap<&str, usize> = HashMap::new();

	for scored in &list[..window] {
		*counts.entry(scored.candidate.doc.as_str()).or_default() += 1;
	}

	let threshold = f64::from(diversity.max_share) * window as f64;
	let dominant = counts
		.into_iter()
		.filter(|(_, count)| *count as f64 > threshold)
		.map(|(doc, _)| doc.to_string())
		.collect::<HashSet<_>>();

	if dominant.is_empty() {
		list.truncate(limit);

		return list;
	}

	let cap = diversity.per_doc_cap as usize;
	let mut taken: HashMap<String, usize> = HashMap::new();
	let mut kept = Vec::with_capacity(list.len());
	let mut overflow = Vec::new();

	for scored in list {
		if dominant.contains(&scored.candidate.doc) {
			let count = taken.entry(scored.candidate.doc.clone()).or_default();

			if *count >= cap {
				overflow.push(scored);

				continue;
			}

			*count += 1;
		}

		kept.push(scored);
	}

	kept.extend(overflow);
	kept.truncate(limit);

	kept
}
