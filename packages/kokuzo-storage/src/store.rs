//! Store adapters the retrieval engine talks to.

use std::{future::Future, pin::Pin};

use crate::{
	Result, chunks,
	db::Db,
	models::{Chunk, PageBounds, PageHit, PageRecord, Seed},
	pages::{self, FullTextQuery, ScanQuery, SubstringQuery},
	seeds,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait PageStore
where
	Self: Send + Sync,
{
	/// Whether `full_text_search` is backed by an index. Probed once at startup.
	fn supports_full_text(&self) -> bool;

	fn get_page<'a>(
		&'a self,
		doc: &'a str,
		pdf_page: i32,
	) -> BoxFuture<'a, Result<Option<PageRecord>>>;

	fn page_bounds<'a>(&'a self, docs: &'a [String]) -> BoxFuture<'a, Result<Option<PageBounds>>>;

	fn scan_pages<'a>(&'a self, query: ScanQuery<'a>) -> BoxFuture<'a, Result<Vec<PageRecord>>>;

	fn densest_document<'a>(&'a self, placeholder: &'a str)
	-> BoxFuture<'a, Result<Option<String>>>;

	fn full_text_search<'a>(
		&'a self,
		query: FullTextQuery<'a>,
	) -> BoxFuture<'a, Result<Vec<PageHit>>>;

	fn substring_search<'a>(
		&'a self,
		query: SubstringQuery<'a>,
	) -> BoxFuture<'a, Result<Vec<PageHit>>>;
}

pub trait ArchiveStore
where
	Self: Send + Sync,
{
	fn search_chunks<'a>(&'a self, needle: &'a str, limit: u32)
	-> BoxFuture<'a, Result<Vec<Chunk>>>;

	fn seeds_by_file(&self, file_id: i64, limit: u32) -> BoxFuture<'_, Result<Vec<Seed>>>;
}

pub struct PgStore {
	db: Db,
	full_text: bool,
}
impl PgStore {
	pub fn new(db: Db, full_text: bool) -> Self {
		Self { db, full_text }
	}

	/// Wraps `db`, enabling full-text search only when configured and the index table exists.
	pub async fn detect(db: Db, full_text_enabled: bool) -> Result<Self> {
		let full_text = full_text_enabled && db.has_full_text_index().await?;

		if full_text_enabled && !full_text {
			tracing::warn!("Full-text index table is missing. Falling back to substring search.");
		}

		Ok(Self::new(db, full_text))
	}

	pub fn db(&self) -> &Db {
		&self.db
	}
}
impl PageStore for PgStore {
	fn supports_full_text(&self) -> bool {
		self.full_text
	}

	fn get_page<'a>(
		&'a self,
		doc: &'a str,
		pdf_page: i32,
	) -> BoxFuture<'a, Result<Option<PageRecord>>> {
		Box::pin(pages::get_page(&self.db.pool, doc, pdf_page))
	}

	fn page_bounds<'a>(&'a self, docs: &'a [String]) -> BoxFuture<'a, Result<Option<PageBounds>>> {
		Box::pin(pages::page_bounds(&self.db.pool, docs))
	}

	fn scan_pages<'a>(&'a self, query: ScanQuery<'a>) -> BoxFuture<'a, Result<Vec<PageRecord>>> {
		Box::pin(pages::scan_pages(&self.db.pool, query))
	}

	fn densest_document<'a>(
		&'a self,
		placeholder: &'a str,
	) -> BoxFuture<'a, Result<Option<String>>> {
		Box::pin(pages::densest_document(&self.db.pool, placeholder))
	}

	fn full_text_search<'a>(
		&'a self,
		query: FullTextQuery<'a>,
	) -> BoxFuture<'a, Result<Vec<PageHit>>> {
		Box::pin(pages::full_text_search(&self.db.pool, query))
	}

	fn substring_search<'a>(
		&'a self,
		query: SubstringQuery<'a>,
	) -> BoxFuture<'a, Result<Vec<PageHit>>> {
		Box::pin(pages::substring_search(&self.db.pool, query))
	}
}
impl ArchiveStore for PgStore {
	fn search_chunks<'a>(
		&'a self,
		needle: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<Chunk>>> {
		Box::pin(chunks::search_chunks(&self.db.pool, needle, limit))
	}

	fn seeds_by_file(&self, file_id: i64, limit: u32) -> BoxFuture<'_, Result<Vec<Seed>>> {
		Box::pin(seeds::seeds_by_file(&self.db.pool, file_id, limit))
	}
}
