mod fallback;
mod finalize;
mod order;
mod pin;
mod scoring;
mod source;

use serde::{Deserialize, Serialize};

use crate::{Error, KokuzoService, Result, Tag};
use kokuzo_domain::{pin::parse_pin, text};
use kokuzo_storage::models::PageRecord;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
	pub doc: String,
	pub pdf_page: i32,
	pub snippet: String,
	pub score: f64,
	pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SearchRequest {
	#[serde(default)]
	pub doc: Option<String>,
	#[serde(default)]
	pub query: String,
	#[serde(default)]
	pub limit: Option<u32>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchResponse {
	pub candidates: Vec<Candidate>,
}

/// What the ranking pipeline produced, before fallback routing.
#[derive(Debug)]
pub enum SearchOutcome {
	Ok(Vec<Candidate>),
	StoreUnavailable(String),
	Unexpected(Error),
}
impl From<Result<Vec<Candidate>>> for SearchOutcome {
	fn from(result: Result<Vec<Candidate>>) -> Self {
		match result {
			Ok(candidates) => Self::Ok(candidates),
			Err(Error::StoreUnavailable { message }) => Self::StoreUnavailable(message),
			Err(err) => Self::Unexpected(err),
		}
	}
}

/// A candidate and the full page text it was judged on. `None` when the fetch failed.
#[derive(Clone, Debug)]
pub(crate) struct Scored {
	pub(crate) candidate: Candidate,
	pub(crate) page_text: Option<String>,
}

impl KokuzoService {
	pub async fn search_pages(&self, req: SearchRequest) -> SearchResponse {
		let limit = req.limit.unwrap_or(self.cfg.search.default_limit);
		let candidates = self.search_pages_for_hybrid(req.doc.as_deref(), &req.query, limit).await;

		SearchResponse { candidates }
	}

	/// Ranked page candidates for `query`, optionally scoped to one logical document.
	///
	/// Never fails. Store errors and empty pipelines are answered by the safe fallback, so the
	/// list is empty only when `limit` is zero.
	pub async fn search_pages_for_hybrid(
		&self,
		doc: Option<&str>,
		query: &str,
		limit: u32,
	) -> Vec<Candidate> {
		let limit = limit.min(self.cfg.search.max_limit);

		if limit == 0 {
			return Vec::new();
		}

		let doc = doc.map(str::trim).filter(|doc| !doc.is_empty());
		let outcome = self.search_outcome(doc, query, limit).await;

		match outcome {
			SearchOutcome::Ok(candidates) if !candidates.is_empty() => candidates,
			SearchOutcome::Ok(_) => {
				tracing::debug!("Ranking pipeline produced no candidates. Using the safe fallback.");

				self.safe_fallback(doc, limit).await
			},
			SearchOutcome::StoreUnavailable(reason) => {
				tracing::warn!(%reason, "Page store unavailable. Using the safe fallback.");

				self.safe_fallback(doc, limit).await
			},
			SearchOutcome::Unexpected(err) => {
				tracing::error!(error = %err, "Page search failed. Using the safe fallback.");

				self.safe_fallback(doc, limit).await
			},
		}
	}

	/// Runs the ranking pipeline without the fallback adapter.
	pub async fn search_outcome(&self, doc: Option<&str>, query: &str, limit: u32) -> SearchOutcome {
		SearchOutcome::from(self.run_pipeline(doc, query, limit).await)
	}

	async fn run_pipeline(
		&self,
		doc: Option<&str>,
		raw_query: &str,
		limit: u32,
	) -> Result<Vec<Candidate>> {
		if let Some(pin) = parse_pin(raw_query)
			&& let Some(candidate) = self.resolve_pin(&pin).await?
		{
			return Ok(vec![candidate]);
		}

		let ranking = &self.cfg.ranking;
		let normalized = self.normalizer().normalize(raw_query);
		let scope = doc.map(|doc| self.aliases.aliases(doc));
		let mut list = self.select_source(&normalized, scope.as_deref(), limit).await?;

		if list.is_empty() {
			return Ok(Vec::new());
		}

		if self.chain_intent(raw_query, doc) {
			list = self.inject_chain(list).await?;
		}

		let limit = limit as usize;
		let mut list = finalize::dedup(list);

		order::sort(&mut list);

		let mut list = finalize::diversity_cap(list, &ranking.diversity, limit);

		order::sort(&mut list);

		let mut list = order::avoid_covers(list, &ranking.cover_terms, limit);

		let leads_with_cover = list
			.first()
			.is_some_and(|first| order::is_bad_cover(&first.candidate, &ranking.cover_terms));

		if leads_with_cover {
			list = self.splice_cover_alternatives(list, limit).await?;
		}

		Ok(list.into_iter().map(|scored| scored.candidate).collect())
	}

	/// Puts non-cover pages of the leading document ahead of a list made only of bad covers.
	async fn splice_cover_alternatives(
		&self,
		list: Vec<Scored>,
		limit: usize,
	) -> Result<Vec<Scored>> {
		let Some(first) = list.first() else {
			return Ok(list);
		};
		let corpus = &self.cfg.corpus;
		let ranking = &self.cfg.ranking;
		let docs = vec![first.candidate.doc.clone()];
		let scan_limit = u32::try_from(limit + list.len()).unwrap_or(u32::MAX);
		let records = self
			.pages
			.scan_pages(kokuzo_storage::pages::ScanQuery {
				docs: &docs,
				from_page: 2,
				placeholder: &corpus.placeholder_sentinel,
				limit: scan_limit,
			})
			.await?;
		let mut spliced = records
			.into_iter()
			.filter(|record| {
				!list.iter().any(|scored| {
					scored.candidate.doc == record.doc && scored.candidate.pdf_page == record.pdf_page
				})
			})
			.take(limit)
			.map(|record| self.page_candidate(record, ranking.range_score))
			.collect::<Vec<_>>();

		if spliced.is_empty() {
			return Ok(list);
		}

		tracing::debug!(count = spliced.len(), "Spliced pages ahead of bad covers.");

		spliced.extend(list);

		let mut out = self.usable(finalize::dedup(spliced));

		out.truncate(limit);

		Ok(out)
	}

	/// Page text, or `None` when the page is absent or its fetch failed. Unavailability
	/// propagates.
	pub(crate) async fn fetch_page(&self, doc: &str, pdf_page: i32) -> Result<Option<PageRecord>> {
		match self.pages.get_page(doc, pdf_page).await {
			Ok(record) => Ok(record),
			Err(err) if err.is_unavailable() => Err(err.into()),
			Err(err) => {
				let err =
					Error::PageFetch { doc: doc.to_string(), pdf_page, message: err.to_string() };

				tracing::warn!(error = %err, "Page fetch failed. Dropping the candidate.");

				Ok(None)
			},
		}
	}

	/// A fixed-score candidate built from a full page row.
	pub(crate) fn page_candidate(&self, record: PageRecord, score: f64) -> Scored {
		let analysis = self.analysis_text(&record.text);
		let snippet = self.snippet_for(&record.text, &analysis);
		let tags = self.tags_for(&analysis);

		Scored {
			candidate: Candidate { doc: record.doc, pdf_page: record.pdf_page, snippet, score, tags },
			page_text: Some(record.text),
		}
	}

	/// Leading window of the page, whitespace-normalized.
	pub(crate) fn analysis_text(&self, page_text: &str) -> String {
		let window = text::take_chars(page_text, self.cfg.search.analysis_window_chars as usize);

		text::normalize_page_text(&window)
	}

	pub(crate) fn snippet_for(&self, preferred: &str, analysis: &str) -> String {
		let max_chars = self.cfg.search.snippet_chars as usize;
		let snippet = text::snippet_of(preferred, max_chars);

		if !snippet.is_empty() {
			return snippet;
		}

		let snippet = text::snippet_of(analysis, max_chars);

		if !snippet.is_empty() {
			return snippet;
		}

		self.cfg.corpus.unextractable_snippet.clone()
	}

	pub(crate) fn tags_for(&self, analysis: &str) -> Vec<Tag> {
		if analysis.is_empty() {
			return Vec::new();
		}

		match self.tags.extract(analysis) {
			Ok(tags) => tags,
			Err(err) => {
				tracing::debug!(error = %err, "Tag extraction failed. Continuing without tags.");

				Vec::new()
			},
		}
	}
}
