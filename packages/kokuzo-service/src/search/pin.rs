use unicode_normalization::UnicodeNormalization;

use super::{Candidate, Scored, finalize};
use crate::{KokuzoService, Result};
use kokuzo_domain::pin::Pin;

impl KokuzoService {
	/// The pinned page as a single maximal candidate, or `None` to continue with normal ranking.
	pub(crate) async fn resolve_pin(&self, pin: &Pin) -> Result<Option<Candidate>> {
		let ranking = &self.cfg.ranking;

		for doc in self.aliases.aliases(&pin.doc) {
			let Some(record) = self.fetch_page(&doc, pin.pdf_page).await? else {
				continue;
			};

			if !finalize::passes_quality(
				&record.text,
				&self.cfg.corpus.placeholder_sentinel,
				self.normalizer().script(),
				ranking.min_script_density as usize,
			) {
				tracing::debug!(
					doc = %record.doc,
					pdf_page = record.pdf_page,
					"Pinned page failed quality gating."
				);

				return Ok(None);
			}

			return Ok(Some(self.page_candidate(record, ranking.pin_score).candidate));
		}

		Ok(None)
	}

	/// Whether the raw query asks about the configured generation chain.
	pub(crate) fn chain_intent(&self, raw_query: &str, doc: Option<&str>) -> bool {
		let chain = &self.cfg.ranking.generation_chain;

		if !chain.enabled || chain.pages.is_empty() || chain.keyword_groups.is_empty() {
			return false;
		}
		if let Some(doc) = doc
			&& !self.aliases.aliases(doc).iter().any(|physical| physical == &chain.doc)
		{
			return false;
		}

		let folded: String = raw_query.nfkc().collect();

		chain
			.keyword_groups
			.iter()
			.all(|group| group.iter().any(|keyword| folded.contains(keyword.as_str())))
	}

	/// Prepends the chain pages in configured order, each one point below the previous.
	pub(crate) async fn inject_chain(&self, list: Vec<Scored>) -> Result<Vec<Scored>> {
		let chain = &self.cfg.ranking.generation_chain;
		let placeholder = self.cfg.corpus.placeholder_sentinel.as_str();
		let mut injected: Vec<Scored> = Vec::with_capacity(chain.pages.len() + list.len());

		for (idx, pdf_page) in chain.pages.iter().copied().enumerate() {
			let present = list.iter().chain(injected.iter()).any(|scored| {
				scored.candidate.doc == chain.doc && scored.candidate.pdf_page == pdf_page
			});

			if present {
				continue;
			}

			let Some(record) = self.fetch_page(&chain.doc, pdf_page).await? else {
				continue;
			};

			if record.text.trim().is_empty() || record.text.contains(placeholder) {
				continue;
			}

			let score = self.cfg.ranking.pinned_chain_score - idx as f64;

			injected.push(self.page_candidate(record, score));
		}

		if !injected.is_empty() {
			tracing::debug!(count = injected.len(), "Injected generation-chain pages.");
		}

		injected.extend(list);

		Ok(injected)
	}
}
