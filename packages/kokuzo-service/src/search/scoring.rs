use super::{Candidate, Scored};
use crate::{KokuzoService, Result};
use kokuzo_config::Ranking;
use kokuzo_domain::text::count_distinct_terms;
use kokuzo_storage::models::PageHit;

impl KokuzoService {
	/// Scores search hits against their page text. One page fetch per hit.
	pub(crate) async fn score_hits(&self, hits: Vec<PageHit>) -> Result<Vec<Scored>> {
		let mut out = Vec::with_capacity(hits.len());

		for hit in hits {
			let page_text = self.fetch_page(&hit.doc, hit.pdf_page).await?.map(|record| record.text);
			let analysis =
				page_text.as_deref().map(|text| self.analysis_text(text)).unwrap_or_default();
			let score = score_page(&self.cfg.ranking, hit.rank, &analysis, hit.pdf_page);
			let snippet = self.snippet_for(&hit.snippet, &analysis);
			let tags = self.tags_for(&analysis);

			out.push(Scored {
				candidate: Candidate { doc: hit.doc, pdf_page: hit.pdf_page, snippet, score, tags },
				page_text,
			});
		}

		Ok(out)
	}
}

/// `max(0, base - store_rank + bonus - penalties)` over the analysis text.
pub(crate) fn score_page(ranking: &Ranking, store_rank: f64, analysis: &str, pdf_page: i32) -> f64 {
	let weights = &ranking.weights;
	let base = (weights.base - store_rank).max(0.0);
	let mut penalty = 0.0;

	if analysis.chars().count() < ranking.min_analysis_chars as usize {
		penalty += weights.empty_page_penalty;
	}

	penalty += weights.noise_penalty * count_distinct_terms(analysis, &ranking.noise_terms) as f64;

	let bonus =
		weights.content_bonus * count_distinct_terms(analysis, &ranking.content_terms) as f64;

	if pdf_page == 1 {
		penalty += weights.first_page_penalty;
	}

	let score = (base + bonus - penalty).max(0.0);

	if score.is_finite() { score } else { 0.0 }
}
