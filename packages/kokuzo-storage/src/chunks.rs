use sqlx::PgExecutor;
use time::OffsetDateTime;

use crate::{Result, models::Chunk};

pub async fn insert_chunk<'e, E>(
	executor: E,
	file_id: i64,
	content: &str,
	created_at: OffsetDateTime,
) -> Result<i64>
where
	E: PgExecutor<'e>,
{
	let chunk_id: i64 = sqlx::query_scalar(
		"\
INSERT INTO kokuzo_chunks (file_id, content, created_at)
VALUES ($1, $2, $3)
RETURNING chunk_id",
	)
	.bind(file_id)
	.bind(content)
	.bind(created_at)
	.fetch_one(executor)
	.await?;

	Ok(chunk_id)
}

/// Chunks containing `needle`, newest first.
pub async fn search_chunks<'e, E>(executor: E, needle: &str, limit: u32) -> Result<Vec<Chunk>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, Chunk>(
		"\
SELECT chunk_id, file_id, content, created_at
FROM kokuzo_chunks
WHERE strpos(content, $1) > 0
ORDER BY created_at DESC, chunk_id DESC
LIMIT $2",
	)
	.bind(needle)
	.bind(i64::from(limit))
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
