use super::Candidate;
use crate::{KokuzoService, Result};

impl KokuzoService {
	/// Pages 2 onward of `doc` (or the default document) with a fixed snippet and score.
	///
	/// Pages the store confirms to be missing or placeholders are skipped. When the store cannot
	/// be reached, or nothing survives, the page range is emitted as-is without tags.
	pub(crate) async fn safe_fallback(&self, doc: Option<&str>, limit: u32) -> Vec<Candidate> {
		let doc = doc.unwrap_or(self.cfg.corpus.default_document.as_str());
		let last_page = self
			.cfg
			.search
			.fallback_last_page
			.min(i32::try_from(limit).unwrap_or(i32::MAX).saturating_add(1));
		let pages = (2..=last_page).collect::<Vec<_>>();

		match self.confirmed_fallback(doc, &pages).await {
			Ok(candidates) if !candidates.is_empty() => candidates,
			Ok(_) => self.synthetic_fallback(doc, &pages),
			Err(err) => {
				tracing::debug!(error = %err, "Store unreachable in the safe fallback.");

				self.synthetic_fallback(doc, &pages)
			},
		}
	}

	async fn confirmed_fallback(&self, doc: &str, pages: &[i32]) -> Result<Vec<Candidate>> {
		let physical = self.aliases.aliases(doc);
		let Some(bounds) = self.pages.page_bounds(&physical).await? else {
			return Ok(Vec::new());
		};
		let placeholder = self.cfg.corpus.placeholder_sentinel.as_str();
		let mut out = Vec::with_capacity(pages.len());

		for pdf_page in pages.iter().copied() {
			if pdf_page > bounds.last_page {
				break;
			}

			for physical_doc in &physical {
				let Some(record) = self.fetch_page(physical_doc, pdf_page).await? else {
					continue;
				};

				if !record.text.contains(placeholder) {
					let analysis = self.analysis_text(&record.text);

					out.push(Candidate {
						doc: record.doc,
						pdf_page,
						snippet: self.cfg.corpus.fallback_snippet.clone(),
						score: self.cfg.ranking.fallback_score,
						tags: self.tags_for(&analysis),
					});
				}

				break;
			}
		}

		Ok(out)
	}

	fn synthetic_fallback(&self, doc: &str, pages: &[i32]) -> Vec<Candidate> {
		pages
			.iter()
			.map(|pdf_page| Candidate {
				doc: doc.to_string(),
				pdf_page: *pdf_page,
				snippet: self.cfg.corpus.fallback_snippet.clone(),
				score: self.cfg.ranking.fallback_score,
				tags: Vec::new(),
			})
			.collect()
	}
}
