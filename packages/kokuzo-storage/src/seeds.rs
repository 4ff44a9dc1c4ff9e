use sqlx::PgExecutor;

use crate::{Result, models::Seed};

pub async fn insert_seed<'e, E>(executor: E, seed: &Seed) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO kokuzo_seeds (seed_id, file_id, kind, title, content, created_at)
VALUES ($1, $2, $3, $4, $5, $6)
ON CONFLICT (seed_id) DO NOTHING",
	)
	.bind(seed.seed_id.as_str())
	.bind(seed.file_id)
	.bind(seed.kind.as_str())
	.bind(seed.title.as_deref())
	.bind(seed.content.as_str())
	.bind(seed.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

/// Seeds derived from one source file, newest first.
pub async fn seeds_by_file<'e, E>(executor: E, file_id: i64, limit: u32) -> Result<Vec<Seed>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, Seed>(
		"\
SELECT seed_id, file_id, kind, title, content, created_at
FROM kokuzo_seeds
WHERE file_id = $1
ORDER BY created_at DESC, seed_id ASC
LIMIT $2",
	)
	.bind(file_id)
	.bind(i64::from(limit))
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
