pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

pub fn render_full_text_schema() -> String {
	expand_includes(include_str!("../../../sql/full_text.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_kokuzo_pages.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_kokuzo_pages.sql")),
				"tables/002_kokuzo_chunks.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_kokuzo_chunks.sql")),
				"tables/003_kokuzo_seeds.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_kokuzo_seeds.sql")),
				"tables/010_kokuzo_pages_fts.sql" =>
					out.push_str(include_str!("../../../sql/tables/010_kokuzo_pages_fts.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
