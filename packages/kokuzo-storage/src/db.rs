use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Result, schema};

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &kokuzo_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	/// Creates the core tables, plus the full-text index table when `full_text` is set.
	pub async fn ensure_schema(&self, full_text: bool) -> Result<()> {
		let mut sql = schema::render_schema();

		if full_text {
			sql.push_str(&schema::render_full_text_schema());
		}

		let lock_id: i64 = 5_730_218;
		// Advisory locks are held per connection, so keep the lock inside one transaction.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}

	/// Whether the full-text index table exists in the connected database.
	pub async fn has_full_text_index(&self) -> Result<bool> {
		let exists: bool =
			sqlx::query_scalar("SELECT to_regclass('kokuzo_pages_fts') IS NOT NULL")
				.fetch_one(&self.pool)
				.await?;

		Ok(exists)
	}
}
