//! Chunk and seed lookups kept for older callers. These return errors instead of falling back.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, KokuzoService, Result};
use kokuzo_storage::models::{Chunk, Seed};

#[derive(Clone, Debug, Deserialize)]
pub struct ChunkSearchRequest {
	pub query: String,
	#[serde(default)]
	pub limit: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkItem {
	pub chunk_id: i64,
	pub file_id: i64,
	pub content: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}
impl From<Chunk> for ChunkItem {
	fn from(chunk: Chunk) -> Self {
		Self {
			chunk_id: chunk.chunk_id,
			file_id: chunk.file_id,
			content: chunk.content,
			created_at: chunk.created_at,
		}
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct ChunkSearchResponse {
	pub chunks: Vec<ChunkItem>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SeedsRequest {
	pub file_id: i64,
	#[serde(default)]
	pub limit: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedItem {
	pub seed_id: String,
	pub file_id: i64,
	pub kind: String,
	pub title: Option<String>,
	pub content: String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}
impl From<Seed> for SeedItem {
	fn from(seed: Seed) -> Self {
		Self {
			seed_id: seed.seed_id,
			file_id: seed.file_id,
			kind: seed.kind,
			title: seed.title,
			content: seed.content,
			created_at: seed.created_at,
		}
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct SeedsResponse {
	pub seeds: Vec<SeedItem>,
}

impl KokuzoService {
	/// Chunks containing the query verbatim, newest first.
	pub async fn search_chunks(&self, req: ChunkSearchRequest) -> Result<ChunkSearchResponse> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "query must be non-empty.".to_string() });
		}

		let limit = resolve_limit(req.limit, self.cfg.search.chunk_limit)?;
		let chunks = self.archive.search_chunks(query, limit).await?;

		Ok(ChunkSearchResponse { chunks: chunks.into_iter().map(ChunkItem::from).collect() })
	}

	/// Seeds derived from one file, newest first.
	pub async fn seeds_by_file(&self, req: SeedsRequest) -> Result<SeedsResponse> {
		if req.file_id <= 0 {
			return Err(Error::InvalidRequest {
				message: "file_id must be a positive integer.".to_string(),
			});
		}

		let limit = resolve_limit(req.limit, self.cfg.search.seed_limit)?;
		let seeds = self.archive.seeds_by_file(req.file_id, limit).await?;

		Ok(SeedsResponse { seeds: seeds.into_iter().map(SeedItem::from).collect() })
	}
}

fn resolve_limit(requested: Option<u32>, default_limit: u32) -> Result<u32> {
	match requested {
		Some(0) =>
			Err(Error::InvalidRequest { message: "limit must be greater than zero.".to_string() }),
		Some(limit) => Ok(limit),
		None => Ok(default_limit),
	}
}

#[cfg(test)]
mod tests {
	use super::resolve_limit;
	use crate::Error;

	#[test]
	fn missing_limit_uses_the_default() {
		assert_eq!(resolve_limit(None, 20).expect("Default limit must resolve."), 20);
		assert_eq!(resolve_limit(Some(5), 20).expect("Explicit limit must resolve."), 5);
	}

	#[test]
	fn zero_limit_is_rejected() {
		assert!(matches!(resolve_limit(Some(0), 20), Err(Error::InvalidRequest { .. })));
	}
}
