use std::collections::HashSet;

use super::{Scored, finalize};
use crate::{KokuzoService, Result};
use kokuzo_domain::query::query_terms;
use kokuzo_storage::{
	models::PageHit,
	pages::{FullTextQuery, ScanQuery, SubstringQuery},
};

impl KokuzoService {
	/// Full-text search, then substring search, then a page range scan. The first source with
	/// usable candidates wins; an empty result means none had any.
	pub(crate) async fn select_source(
		&self,
		normalized: &str,
		scope: Option<&[String]>,
		limit: u32,
	) -> Result<Vec<Scored>> {
		let search = &self.cfg.search;

		if !normalized.is_empty() {
			if self.pages.supports_full_text() {
				let terms = query_terms(normalized).join(" ");
				let hits = self
					.pages
					.full_text_search(FullTextQuery {
						terms: &terms,
						docs: scope,
						limit,
						snippet_chars: search.snippet_chars,
					})
					.await?;
				let usable = self.usable_hits(hits).await?;

				if !usable.is_empty() {
					tracing::debug!(
						source = "full_text",
						rows = usable.len(),
						"Candidate source selected."
					);

					return Ok(usable);
				}
			}

			let hits = self
				.pages
				.substring_search(SubstringQuery {
					needle: normalized,
					docs: scope,
					limit: search.substring_working_set.max(limit),
					occurrence_cap: search.occurrence_cap,
					snippet_chars: search.snippet_chars,
				})
				.await?;
			let usable = self.usable_hits(hits).await?;

			if !usable.is_empty() {
				tracing::debug!(
					source = "substring",
					rows = usable.len(),
					"Candidate source selected."
				);

				return Ok(usable);
			}
		}

		let docs = match scope {
			Some(scope) => scope.to_vec(),
			None => match self.pages.densest_document(&self.cfg.corpus.placeholder_sentinel).await? {
				Some(doc) => vec![doc],
				None => {
					tracing::debug!("No document holds usable pages.");

					return Ok(Vec::new());
				},
			},
		};
		let usable = self.range_candidates(&docs, limit).await?;

		if !usable.is_empty() {
			tracing::debug!(source = "range", rows = usable.len(), "Candidate source selected.");
		}

		Ok(usable)
	}

	async fn usable_hits(&self, hits: Vec<PageHit>) -> Result<Vec<Scored>> {
		if hits.is_empty() {
			return Ok(Vec::new());
		}

		Ok(self.usable(self.score_hits(hits).await?))
	}

	/// Usable pages from page 2 upward, topped up with page 1 only when short.
	///
	/// The scan continues past pages that fail quality gating until `limit` pages pass or the
	/// documents run out.
	async fn range_candidates(&self, docs: &[String], limit: u32) -> Result<Vec<Scored>> {
		let ranking = &self.cfg.ranking;
		let placeholder = self.cfg.corpus.placeholder_sentinel.as_str();
		let batch = limit.max(self.cfg.search.substring_working_set).max(1);
		let target = limit as usize;
		let mut seen: HashSet<(String, i32)> = HashSet::new();
		let mut out: Vec<Scored> = Vec::new();
		let mut from_page = 2;

		while out.len() < target {
			let records = self
				.pages
				.scan_pages(ScanQuery { docs, from_page, placeholder, limit: batch })
				.await?;
			let exhausted = records.len() < batch as usize;
			let Some(last_page) = records.last().map(|record| record.pdf_page) else {
				break;
			};
			let fresh = records
				.into_iter()
				.filter(|record| seen.insert((record.doc.clone(), record.pdf_page)))
				.map(|record| self.page_candidate(record, ranking.range_score))
				.collect::<Vec<_>>();

			if fresh.is_empty() {
				break;
			}

			out.extend(self.usable(fresh));

			if exhausted {
				break;
			}

			// Rows sharing the last page may continue in the next batch.
			from_page = if last_page > from_page { last_page } else { last_page.saturating_add(1) };
		}

		out.truncate(target);

		for doc in docs {
			if out.len() >= target {
				break;
			}
			if let Some(record) = self.fetch_page(doc, 1).await? {
				out.extend(self.usable(vec![self.page_candidate(record, ranking.range_score)]));
			}
		}

		Ok(out)
	}

	/// Drops candidates whose page is empty, a placeholder, or too sparse in native script.
	pub(crate) fn usable(&self, list: Vec<Scored>) -> Vec<Scored> {
		finalize::quality_filter(
			list,
			&self.cfg.corpus.placeholder_sentinel,
			self.normalizer().script(),
			self.cfg.ranking.min_script_density as usize,
		)
	}
}
