use time::OffsetDateTime;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct PageRecord {
	pub doc: String,
	pub pdf_page: i32,
	pub text: String,
}

/// A search hit. Lower `rank` is better on both search paths.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct PageHit {
	pub doc: String,
	pub pdf_page: i32,
	pub snippet: String,
	pub rank: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageBounds {
	pub first_page: i32,
	pub last_page: i32,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Chunk {
	pub chunk_id: i64,
	pub file_id: i64,
	pub content: String,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Seed {
	pub seed_id: String,
	pub file_id: i64,
	pub kind: String,
	pub title: Option<String>,
	pub content: String,
	pub created_at: OffsetDateTime,
}
