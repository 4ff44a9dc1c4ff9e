use sqlx::{PgExecutor, PgPool};

use crate::{
	Error, Result,
	models::{PageBounds, PageHit, PageRecord},
};

/// Substring ranks are `SUBSTRING_RANK_CEILING - occurrences`, on the same lower-is-better scale
/// as full-text ranks.
pub const SUBSTRING_RANK_CEILING: f64 = 100.0;

/// Characters kept before the first match in a substring-search snippet.
pub const SNIPPET_LEAD_CHARS: u32 = 40;

const PAGE_SHA_HEX_CHARS: usize = 16;

#[derive(Clone, Copy, Debug)]
pub struct ScanQuery<'a> {
	pub docs: &'a [String],
	pub from_page: i32,
	pub placeholder: &'a str,
	pub limit: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct FullTextQuery<'a> {
	pub terms: &'a str,
	pub docs: Option<&'a [String]>,
	pub limit: u32,
	pub snippet_chars: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct SubstringQuery<'a> {
	pub needle: &'a str,
	pub docs: Option<&'a [String]>,
	pub limit: u32,
	pub occurrence_cap: u32,
	pub snippet_chars: u32,
}

#[derive(sqlx::FromRow)]
struct SubstringRow {
	doc: String,
	pdf_page: i32,
	snippet: String,
	occurrences: i32,
}

pub fn page_sha(text: &str) -> String {
	let hex = blake3::hash(text.as_bytes()).to_hex();

	hex.as_str()[..PAGE_SHA_HEX_CHARS].to_string()
}

pub async fn upsert_page<'e, E>(executor: E, doc: &str, pdf_page: i32, text: &str) -> Result<()>
where
	E: PgExecutor<'e>,
{
	if doc.trim().is_empty() {
		return Err(Error::InvalidArgument("doc must be non-empty.".to_string()));
	}
	if pdf_page < 1 {
		return Err(Error::InvalidArgument("pdf_page must be at least 1.".to_string()));
	}

	sqlx::query(
		"\
INSERT INTO kokuzo_pages (doc, pdf_page, text, sha)
VALUES ($1, $2, $3, $4)
ON CONFLICT (doc, pdf_page) DO UPDATE
SET
\ttext = EXCLUDED.text,
\tsha = EXCLUDED.sha,
\tupdated_at = now()
WHERE kokuzo_pages.sha <> EXCLUDED.sha",
	)
	.bind(doc)
	.bind(pdf_page)
	.bind(text)
	.bind(page_sha(text))
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn get_page<'e, E>(executor: E, doc: &str, pdf_page: i32) -> Result<Option<PageRecord>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, PageRecord>(
		"\
SELECT doc, pdf_page, text
FROM kokuzo_pages
WHERE doc = $1 AND pdf_page = $2
LIMIT 1",
	)
	.bind(doc)
	.bind(pdf_page)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

/// First and last stored page across `docs`, or `None` when none of them has pages.
pub async fn page_bounds<'e, E>(executor: E, docs: &[String]) -> Result<Option<PageBounds>>
where
	E: PgExecutor<'e>,
{
	let (first, last): (Option<i32>, Option<i32>) = sqlx::query_as(
		"\
SELECT MIN(pdf_page), MAX(pdf_page)
FROM kokuzo_pages
WHERE doc = ANY($1)",
	)
	.bind(docs)
	.fetch_one(executor)
	.await?;

	Ok(first.zip(last).map(|(first_page, last_page)| PageBounds { first_page, last_page }))
}

/// Non-placeholder pages of `docs` from `from_page` onward, in page order.
pub async fn scan_pages<'e, E>(executor: E, query: ScanQuery<'_>) -> Result<Vec<PageRecord>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, PageRecord>(
		"\
SELECT doc, pdf_page, text
FROM kokuzo_pages
WHERE doc = ANY($1)
\tAND pdf_page >= $2
\tAND strpos(text, $3) = 0
ORDER BY pdf_page ASC, doc ASC
LIMIT $4",
	)
	.bind(query.docs)
	.bind(query.from_page)
	.bind(query.placeholder)
	.bind(i64::from(query.limit))
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// The document with the most non-placeholder pages. Ties go to the smaller name.
pub async fn densest_document<'e, E>(executor: E, placeholder: &str) -> Result<Option<String>>
where
	E: PgExecutor<'e>,
{
	let doc: Option<String> = sqlx::query_scalar(
		"\
SELECT doc
FROM kokuzo_pages
WHERE strpos(text, $1) = 0
GROUP BY doc
ORDER BY COUNT(*) DESC, doc ASC
LIMIT 1",
	)
	.bind(placeholder)
	.fetch_optional(executor)
	.await?;

	Ok(doc)
}

pub async fn full_text_search<'e, E>(executor: E, query: FullTextQuery<'_>) -> Result<Vec<PageHit>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, PageHit>(
		"\
SELECT
\tp.doc,
\tp.pdf_page,
\tleft(p.text, $4) AS snippet,
\t(-ts_rank_cd(f.tsv, q))::float8 AS rank
FROM kokuzo_pages_fts f
JOIN kokuzo_pages p ON p.doc = f.doc AND p.pdf_page = f.pdf_page
CROSS JOIN plainto_tsquery('simple', $1) q
WHERE f.tsv @@ q
\tAND ($2::text[] IS NULL OR f.doc = ANY($2))
ORDER BY rank ASC, p.doc ASC, p.pdf_page ASC
LIMIT $3",
	)
	.bind(query.terms)
	.bind(query.docs)
	.bind(i64::from(query.limit))
	.bind(snippet_len(query.snippet_chars))
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Pages containing `needle` verbatim, ranked by capped occurrence count.
pub async fn substring_search<'e, E>(
	executor: E,
	query: SubstringQuery<'_>,
) -> Result<Vec<PageHit>>
where
	E: PgExecutor<'e>,
{
	if query.needle.is_empty() {
		return Ok(Vec::new());
	}

	let rows = sqlx::query_as::<_, SubstringRow>(
		"\
SELECT
\tdoc,
\tpdf_page,
\tsubstr(text, greatest(1, strpos(text, $1) - $5), $6) AS snippet,
\tLEAST(
\t\t(char_length(text) - char_length(replace(text, $1, ''))) / char_length($1),
\t\t$4
\t)::int4 AS occurrences
FROM kokuzo_pages
WHERE strpos(text, $1) > 0
\tAND ($2::text[] IS NULL OR doc = ANY($2))
ORDER BY occurrences DESC, doc ASC, pdf_page ASC
LIMIT $3",
	)
	.bind(query.needle)
	.bind(query.docs)
	.bind(i64::from(query.limit))
	.bind(i32::try_from(query.occurrence_cap).unwrap_or(i32::MAX))
	.bind(snippet_len(SNIPPET_LEAD_CHARS))
	.bind(snippet_len(query.snippet_chars))
	.fetch_all(executor)
	.await?;

	Ok(rows
		.into_iter()
		.map(|row| PageHit {
			doc: row.doc,
			pdf_page: row.pdf_page,
			snippet: row.snippet,
			rank: SUBSTRING_RANK_CEILING - f64::from(row.occurrences),
		})
		.collect())
}

/// Rebuilds the full-text rows of one document from its stored pages.
pub async fn rebuild_full_text(pool: &PgPool, doc: &str) -> Result<u64> {
	let mut tx = pool.begin().await?;

	sqlx::query("DELETE FROM kokuzo_pages_fts WHERE doc = $1").bind(doc).execute(&mut *tx).await?;

	let inserted = sqlx::query(
		"\
INSERT INTO kokuzo_pages_fts (doc, pdf_page, tsv)
SELECT doc, pdf_page, to_tsvector('simple', text)
FROM kokuzo_pages
WHERE doc = $1",
	)
	.bind(doc)
	.execute(&mut *tx)
	.await?
	.rows_affected();

	tx.commit().await?;

	tracing::info!(doc, pages = inserted, "Rebuilt full-text index.");

	Ok(inserted)
}

fn snippet_len(snippet_chars: u32) -> i32 {
	i32::try_from(snippet_chars).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
	use super::page_sha;

	#[test]
	fn page_sha_is_stable_and_short() {
		let sha = page_sha("言霊の法則");

		assert_eq!(sha.len(), 16);
		assert_eq!(sha, page_sha("言霊の法則"));
		assert_ne!(sha, page_sha("水火の法則"));
	}
}
