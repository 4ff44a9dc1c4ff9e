//! An in-memory `PageStore` + `ArchiveStore` with switchable failure modes.

use std::{
	collections::{BTreeMap, BTreeSet},
	sync::Mutex,
};

use kokuzo_domain::text::count_occurrences;
use kokuzo_storage::{
	Error, Result,
	models::{Chunk, PageBounds, PageHit, PageRecord, Seed},
	pages::{FullTextQuery, SNIPPET_LEAD_CHARS, SUBSTRING_RANK_CEILING, ScanQuery, SubstringQuery},
	store::{ArchiveStore, BoxFuture, PageStore},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreCall {
	GetPage,
	PageBounds,
	ScanPages,
	DensestDocument,
	FullTextSearch,
	SubstringSearch,
	SearchChunks,
	SeedsByFile,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
	pages: BTreeMap<(String, i32), String>,
	chunks: Vec<Chunk>,
	seeds: Vec<Seed>,
	full_text: bool,
	missing_full_text_table: bool,
	unavailable: Option<String>,
	failing_pages: BTreeSet<(String, i32)>,
	calls: Mutex<Vec<StoreCall>>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_page(mut self, doc: &str, pdf_page: i32, text: impl Into<String>) -> Self {
		self.pages.insert((doc.to_string(), pdf_page), text.into());

		self
	}

	pub fn with_pages<I, S>(mut self, doc: &str, pages: I) -> Self
	where
		I: IntoIterator<Item = (i32, S)>,
		S: Into<String>,
	{
		for (pdf_page, text) in pages {
			self.pages.insert((doc.to_string(), pdf_page), text.into());
		}

		self
	}

	/// Reports a full-text index and answers full-text queries.
	pub fn with_full_text(mut self) -> Self {
		self.full_text = true;

		self
	}

	/// Reports a full-text index whose table is gone, as after a failed migration.
	pub fn with_missing_full_text_table(mut self) -> Self {
		self.full_text = true;
		self.missing_full_text_table = true;

		self
	}

	/// Every call fails as if the base table were missing.
	pub fn unavailable(mut self) -> Self {
		self.unavailable = Some("relation \"kokuzo_pages\" does not exist".to_string());

		self
	}

	/// `get_page` fails for this page while searches still return it.
	pub fn with_failing_page(mut self, doc: &str, pdf_page: i32) -> Self {
		self.failing_pages.insert((doc.to_string(), pdf_page));

		self
	}

	pub fn with_chunk(mut self, chunk: Chunk) -> Self {
		self.chunks.push(chunk);

		self
	}

	pub fn with_seed(mut self, seed: Seed) -> Self {
		self.seeds.push(seed);

		self
	}

	pub fn calls(&self) -> Vec<StoreCall> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn count(&self, call: StoreCall) -> usize {
		self.calls().into_iter().filter(|seen| *seen == call).count()
	}

	fn enter(&self, call: StoreCall) -> Result<()> {
		self.calls.lock().unwrap_or_else(|err| err.into_inner()).push(call);

		match &self.unavailable {
			Some(reason) => Err(Error::Unavailable(reason.clone())),
			None => Ok(()),
		}
	}

	fn in_scope(docs: Option<&[String]>, doc: &str) -> bool {
		docs.is_none_or(|docs| docs.iter().any(|candidate| candidate == doc))
	}

	fn sort_hits(hits: &mut Vec<PageHit>, limit: u32) {
		hits.sort_by(|a, b| {
			a.rank
				.total_cmp(&b.rank)
				.then_with(|| a.doc.cmp(&b.doc))
				.then_with(|| a.pdf_page.cmp(&b.pdf_page))
		});
		hits.truncate(limit as usize);
	}
}
impl PageStore for MemoryStore {
	fn supports_full_text(&self) -> bool {
		self.full_text
	}

	fn get_page<'a>(
		&'a self,
		doc: &'a str,
		pdf_page: i32,
	) -> BoxFuture<'a, Result<Option<PageRecord>>> {
		Box::pin(async move {
			self.enter(StoreCall::GetPage)?;

			let key = (doc.to_string(), pdf_page);

			if self.failing_pages.contains(&key) {
				return Err(Error::Sqlx(sqlx::Error::Protocol(format!(
					"Simulated read failure for {doc} page {pdf_page}."
				))));
			}

			Ok(self.pages.get(&key).map(|text| PageRecord {
				doc: doc.to_string(),
				pdf_page,
				text: text.clone(),
			}))
		})
	}

	fn page_bounds<'a>(&'a self, docs: &'a [String]) -> BoxFuture<'a, Result<Option<PageBounds>>> {
		Box::pin(async move {
			self.enter(StoreCall::PageBounds)?;

			let pages = self
				.pages
				.keys()
				.filter(|(doc, _)| docs.contains(doc))
				.map(|(_, pdf_page)| *pdf_page);
			let bounds = pages.fold(None, |acc: Option<PageBounds>, pdf_page| {
				Some(match acc {
					Some(bounds) => PageBounds {
						first_page: bounds.first_page.min(pdf_page),
						last_page: bounds.last_page.max(pdf_page),
					},
					None => PageBounds { first_page: pdf_page, last_page: pdf_page },
				})
			});

			Ok(bounds)
		})
	}

	fn scan_pages<'a>(&'a self, query: ScanQuery<'a>) -> BoxFuture<'a, Result<Vec<PageRecord>>> {
		Box::pin(async move {
			self.enter(StoreCall::ScanPages)?;

			let mut rows = self
				.pages
				.iter()
				.filter(|((doc, pdf_page), text)| {
					query.docs.contains(doc)
						&& *pdf_page >= query.from_page
						&& !text.contains(query.placeholder)
				})
				.map(|((doc, pdf_page), text)| PageRecord {
					doc: doc.clone(),
					pdf_page: *pdf_page,
					text: text.clone(),
				})
				.collect::<Vec<_>>();

			rows.sort_by(|a, b| a.pdf_page.cmp(&b.pdf_page).then_with(|| a.doc.cmp(&b.doc)));
			rows.truncate(query.limit as usize);

			Ok(rows)
		})
	}

	fn densest_document<'a>(
		&'a self,
		placeholder: &'a str,
	) -> BoxFuture<'a, Result<Option<String>>> {
		Box::pin(async move {
			self.enter(StoreCall::DensestDocument)?;

			let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

			for ((doc, _), text) in &self.pages {
				if !text.contains(placeholder) {
					*counts.entry(doc.as_str()).or_default() += 1;
				}
			}

			// BTreeMap iterates names ascending, so the first maximum wins ties.
			let mut best: Option<(&str, usize)> = None;

			for (doc, count) in counts {
				if best.is_none_or(|(_, best_count)| count > best_count) {
					best = Some((doc, count));
				}
			}

			Ok(best.map(|(doc, _)| doc.to_string()))
		})
	}

	fn full_text_search<'a>(
		&'a self,
		query: FullTextQuery<'a>,
	) -> BoxFuture<'a, Result<Vec<PageHit>>> {
		Box::pin(async move {
			self.enter(StoreCall::FullTextSearch)?;

			if self.missing_full_text_table {
				return Err(Error::Unavailable(
					"relation \"kokuzo_pages_fts\" does not exist".to_string(),
				));
			}

			let terms =
				query.terms.split_whitespace().map(str::to_lowercase).collect::<Vec<String>>();

			if terms.is_empty() {
				return Ok(Vec::new());
			}

			let mut hits = Vec::new();

			for ((doc, pdf_page), text) in &self.pages {
				if !Self::in_scope(query.docs, doc) {
					continue;
				}

				let lowered = text.to_lowercase();

				if !terms.iter().all(|term| lowered.contains(term.as_str())) {
					continue;
				}

				let occurrences: usize = terms
					.iter()
					.map(|term| count_occurrences(&lowered, term, usize::MAX))
					.sum();

				hits.push(PageHit {
					doc: doc.clone(),
					pdf_page: *pdf_page,
					snippet: text.chars().take(query.snippet_chars as usize).collect(),
					rank: -(occurrences as f64),
				});
			}

			Self::sort_hits(&mut hits, query.limit);

			Ok(hits)
		})
	}

	fn substring_search<'a>(
		&'a self,
		query: SubstringQuery<'a>,
	) -> BoxFuture<'a, Result<Vec<PageHit>>> {
		Box::pin(async move {
			self.enter(StoreCall::SubstringSearch)?;

			if query.needle.is_empty() {
				return Ok(Vec::new());
			}

			let mut hits = Vec::new();

			for ((doc, pdf_page), text) in &self.pages {
				if !Self::in_scope(query.docs, doc) {
					continue;
				}

				let Some(byte_pos) = text.find(query.needle) else {
					continue;
				};
				let occurrences =
					count_occurrences(text, query.needle, query.occurrence_cap as usize);
				let start = text[..byte_pos]
					.chars()
					.count()
					.saturating_sub(SNIPPET_LEAD_CHARS as usize);

				hits.push(PageHit {
					doc: doc.clone(),
					pdf_page: *pdf_page,
					snippet: text.chars().skip(start).take(query.snippet_chars as usize).collect(),
					rank: SUBSTRING_RANK_CEILING - occurrences as f64,
				});
			}

			Self::sort_hits(&mut hits, query.limit);

			Ok(hits)
		})
	}
}
impl ArchiveStore for MemoryStore {
	fn search_chunks<'a>(
		&'a self,
		needle: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<Chunk>>> {
		Box::pin(async move {
			self.enter(StoreCall::SearchChunks)?;

			let mut rows = self
				.chunks
				.iter()
				.filter(|chunk| chunk.content.contains(needle))
				.cloned()
				.collect::<Vec<_>>();

			rows.sort_by(|a, b| {
				b.created_at.cmp(&a.created_at).then_with(|| b.chunk_id.cmp(&a.chunk_id))
			});
			rows.truncate(limit as usize);

			Ok(rows)
		})
	}

	fn seeds_by_file(&self, file_id: i64, limit: u32) -> BoxFuture<'_, Result<Vec<Seed>>> {
		Box::pin(async move {
			self.enter(StoreCall::SeedsByFile)?;

			let mut rows =
				self.seeds.iter().filter(|seed| seed.file_id == file_id).cloned().collect::<Vec<_>>();

			rows.sort_by(|a, b| {
				b.created_at.cmp(&a.created_at).then_with(|| a.seed_id.cmp(&b.seed_id))
			});
			rows.truncate(limit as usize);

			Ok(rows)
		})
	}
}
