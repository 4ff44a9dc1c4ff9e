use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use kokuzo_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_temp_config(payload: String) -> PathBuf {
	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be after the Unix epoch.")
		.as_nanos();
	let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
	let mut path = env::temp_dir();

	path.push(format!("kokuzo_config_test_{}_{nanos}_{seq}.toml", std::process::id()));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_with(edit: impl FnOnce(&mut toml::Table)) -> kokuzo_config::Result<Config> {
	let mut value: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let root = value.as_table_mut().expect("Sample config must be a table.");

	edit(root);

	let payload = toml::to_string(&value).expect("Failed to render sample config.");
	let path = write_temp_config(payload);
	let result = kokuzo_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn section<'a>(root: &'a mut toml::Table, name: &str) -> &'a mut toml::Table {
	root.get_mut(name)
		.and_then(Value::as_table_mut)
		.unwrap_or_else(|| panic!("Sample config must include [{name}]."))
}

fn validation_message(result: kokuzo_config::Result<Config>) -> String {
	match result {
		Err(Error::Validation { message }) => message,
		Err(other) => panic!("Expected a validation error, got {other:?}."),
		Ok(_) => panic!("Expected a validation error, got a config."),
	}
}

#[test]
fn sample_config_loads() {
	let cfg = load_with(|_| {}).expect("Sample config must load.");

	assert_eq!(cfg.corpus.default_document, "KHS");
	assert_eq!(cfg.corpus.placeholder_sentinel, "[NON_TEXT_PAGE_OR_OCR_FAILED]");
	assert_eq!(cfg.search.substring_working_set, 60);
	assert_eq!(cfg.ranking.generation_chain.pages, vec![35, 36, 37, 41]);
	assert!(cfg.storage.postgres.full_text);
}

#[test]
fn missing_search_section_uses_defaults() {
	let cfg = load_with(|root| {
		root.remove("search");
	})
	.expect("Config without [search] must load.");

	assert_eq!(cfg.search.default_limit, 10);
	assert_eq!(cfg.search.analysis_window_chars, 500);
	assert_eq!(cfg.search.fallback_last_page, 11);
}

#[test]
fn alias_lists_start_with_their_logical_name() {
	let cfg = load_with(|root| {
		let corpus = section(root, "corpus");
		let aliases = section(corpus, "aliases");

		aliases.insert(
			"IROHA".to_string(),
			Value::Array(vec![
				Value::String(" IROHA_V2 ".to_string()),
				Value::String(String::new()),
				Value::String("IROHA_V2".to_string()),
			]),
		);
	})
	.expect("Config must load.");

	assert_eq!(cfg.corpus.aliases["KHS"], vec!["KHS".to_string(), "KHS_REINGEST".to_string()]);
	assert_eq!(cfg.corpus.aliases["IROHA"], vec!["IROHA".to_string(), "IROHA_V2".to_string()]);
}

#[test]
fn term_lists_are_trimmed_and_deduplicated() {
	let cfg = load_with(|root| {
		let ranking = section(root, "ranking");

		ranking.insert(
			"noise_terms".to_string(),
			Value::Array(vec![
				Value::String(" 目次 ".to_string()),
				Value::String("目次".to_string()),
				Value::String("   ".to_string()),
				Value::String("奥付".to_string()),
			]),
		);
	})
	.expect("Config must load.");

	assert_eq!(cfg.ranking.noise_terms, vec!["目次".to_string(), "奥付".to_string()]);
}

#[test]
fn rejects_empty_placeholder_sentinel() {
	let message = validation_message(load_with(|root| {
		section(root, "corpus")
			.insert("placeholder_sentinel".to_string(), Value::String(" ".to_string()));
	}));

	assert_eq!(message, "corpus.placeholder_sentinel must be non-empty.");
}

#[test]
fn rejects_default_limit_above_max_limit() {
	let message = validation_message(load_with(|root| {
		let search = section(root, "search");

		search.insert("default_limit".to_string(), Value::Integer(80));
	}));

	assert_eq!(message, "search.default_limit must not exceed search.max_limit.");
}

#[test]
fn rejects_zero_snippet_chars() {
	let message = validation_message(load_with(|root| {
		section(root, "search").insert("snippet_chars".to_string(), Value::Integer(0));
	}));

	assert_eq!(message, "search.snippet_chars must be greater than zero.");
}

#[test]
fn rejects_chain_score_that_does_not_outrank_computed_scores() {
	let message = validation_message(load_with(|root| {
		section(root, "ranking").insert("pinned_chain_score".to_string(), Value::Float(120.0));
	}));

	assert_eq!(message, "ranking.pinned_chain_score must outrank every computed score.");
}

#[test]
fn rejects_pin_score_below_chain_score() {
	let message = validation_message(load_with(|root| {
		section(root, "ranking").insert("pin_score".to_string(), Value::Float(500.0));
	}));

	assert_eq!(message, "ranking.pin_score must be greater than ranking.pinned_chain_score.");
}

#[test]
fn rejects_enabled_chain_without_pages() {
	let message = validation_message(load_with(|root| {
		let ranking = section(root, "ranking");
		let chain = section(ranking, "generation_chain");

		chain.insert("pages".to_string(), Value::Array(Vec::new()));
	}));

	assert_eq!(message, "ranking.generation_chain.pages must be non-empty when enabled.");
}

#[test]
fn rejects_diversity_share_out_of_range() {
	let message = validation_message(load_with(|root| {
		let ranking = section(root, "ranking");
		let diversity = section(ranking, "diversity");

		diversity.insert("max_share".to_string(), Value::Float(1.5));
	}));

	assert_eq!(message, "ranking.diversity.max_share must be in the range (0.0, 1.0].");
}

#[test]
fn rejects_fallback_snippet_containing_sentinel() {
	let message = validation_message(load_with(|root| {
		section(root, "corpus").insert(
			"fallback_snippet".to_string(),
			Value::String("[NON_TEXT_PAGE_OR_OCR_FAILED]".to_string()),
		);
	}));

	assert_eq!(message, "corpus.fallback_snippet must not contain the placeholder sentinel.");
}

#[test]
fn missing_file_is_a_read_error() {
	let path = env::temp_dir().join("kokuzo_config_missing_file.toml");
	let err = kokuzo_config::load(&path).expect_err("Missing file must fail.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}
