use std::cmp::Ordering;

use super::{Candidate, Scored};
use kokuzo_domain::text::contains_any_term;

/// Score descending, then non-first pages before page 1, then page and document ascending.
pub(crate) fn compare(a: &Candidate, b: &Candidate) -> Ordering {
	b.score
		.total_cmp(&a.score)
		.then_with(|| (a.pdf_page == 1).cmp(&(b.pdf_page == 1)))
		.then_with(|| a.pdf_page.cmp(&b.pdf_page))
		.then_with(|| a.doc.cmp(&b.doc))
}

pub(crate) fn sort(list: &mut [Scored]) {
	list.sort_by(|a, b| compare(&a.candidate, &b.candidate));
}

/// A first page whose snippet reads like front matter.
pub(crate) fn is_bad_cover(candidate: &Candidate, cover_terms: &[String]) -> bool {
	candidate.pdf_page == 1 && contains_any_term(&candidate.snippet, cover_terms)
}

/// Moves bad covers behind every other candidate, keeping relative order, then truncates.
pub(crate) fn avoid_covers(list: Vec<Scored>, cover_terms: &[String], limit: usize) -> Vec<Scored> {
	let (mut good, bad): (Vec<_>, Vec<_>) =
		list.into_iter().partition(|scored| !is_bad_cover(&scored.candidate, cover_terms));

	good.extend(bad);
	good.truncate(limit);

	good
}
