use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	pub corpus: Corpus,
	pub ranking: Ranking,
	#[serde(default)]
	pub tags: Tags,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	/// Create and query the `kokuzo_pages_fts` relation. When false the engine starts at the
	/// substring source.
	#[serde(default = "default_true")]
	pub full_text: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub default_limit: u32,
	pub max_limit: u32,
	pub substring_working_set: u32,
	pub occurrence_cap: u32,
	pub analysis_window_chars: u32,
	pub snippet_chars: u32,
	pub min_query_chars: u32,
	pub fallback_last_page: i32,
	pub chunk_limit: u32,
	pub seed_limit: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_limit: 10,
			max_limit: 50,
			substring_working_set: 60,
			occurrence_cap: 20,
			analysis_window_chars: 500,
			snippet_chars: 200,
			min_query_chars: 2,
			fallback_last_page: 11,
			chunk_limit: 20,
			seed_limit: 50,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Corpus {
	pub placeholder_sentinel: String,
	pub default_document: String,
	#[serde(default = "default_detail_marker")]
	pub detail_marker: String,
	#[serde(default = "default_unextractable_snippet")]
	pub unextractable_snippet: String,
	#[serde(default = "default_fallback_snippet")]
	pub fallback_snippet: String,
	/// Ordered `[from, to]` substitutions applied to every query.
	#[serde(default = "default_orthographic_variants")]
	pub orthographic_variants: Vec<[String; 2]>,
	/// Logical document name to physical identifiers holding the same source.
	#[serde(default)]
	pub aliases: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct Ranking {
	#[serde(default = "default_noise_terms")]
	pub noise_terms: Vec<String>,
	#[serde(default = "default_content_terms")]
	pub content_terms: Vec<String>,
	#[serde(default = "default_cover_terms")]
	pub cover_terms: Vec<String>,
	#[serde(default = "default_min_script_density")]
	pub min_script_density: u32,
	#[serde(default = "default_min_analysis_chars")]
	pub min_analysis_chars: u32,
	#[serde(default = "default_pin_score")]
	pub pin_score: f64,
	#[serde(default = "default_pinned_chain_score")]
	pub pinned_chain_score: f64,
	#[serde(default = "default_range_score")]
	pub range_score: f64,
	#[serde(default = "default_fallback_score")]
	pub fallback_score: f64,
	#[serde(default)]
	pub weights: RankingWeights,
	#[serde(default)]
	pub diversity: RankingDiversity,
	#[serde(default)]
	pub generation_chain: GenerationChain,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
	pub base: f64,
	pub empty_page_penalty: f64,
	pub noise_penalty: f64,
	pub content_bonus: f64,
	pub first_page_penalty: f64,
}
impl Default for RankingWeights {
	fn default() -> Self {
		Self {
			base: 100.0,
			empty_page_penalty: 120.0,
			noise_penalty: 30.0,
			content_bonus: 10.0,
			first_page_penalty: 300.0,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RankingDiversity {
	pub enabled: bool,
	pub window: u32,
	pub max_share: f32,
	pub per_doc_cap: u32,
}
impl Default for RankingDiversity {
	fn default() -> Self {
		Self { enabled: true, window: 10, max_share: 0.5, per_doc_cap: 3 }
	}
}

/// Fixed known-good pages injected ahead of computed candidates when a query asks about the
/// generation chain.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerationChain {
	pub enabled: bool,
	pub doc: String,
	/// Every group must contribute at least one keyword found in the raw query.
	pub keyword_groups: Vec<Vec<String>>,
	pub pages: Vec<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Tags {
	/// Tag label to the terms that trigger it.
	pub vocabulary: BTreeMap<String, Vec<String>>,
}

fn default_true() -> bool {
	true
}

fn default_detail_marker() -> String {
	"#詳細".to_string()
}

fn default_unextractable_snippet() -> String {
	"（本文を抽出できません）".to_string()
}

fn default_fallback_snippet() -> String {
	"（候補本文は準備中です）".to_string()
}

fn default_orthographic_variants() -> Vec<[String; 2]> {
	vec![["言灵".to_string(), "言霊".to_string()], ["灵".to_string(), "霊".to_string()]]
}

fn default_noise_terms() -> Vec<String> {
	["目次", "著作権", "序文", "奥付", "凡例", "索引", "発行所", "copyright", "contents", "preface"]
		.into_iter()
		.map(str::to_string)
		.collect()
}

fn default_content_terms() -> Vec<String> {
	["言霊", "水火", "五十音", "五十連", "法則", "天津金木", "形仮名", "息", "音"]
		.into_iter()
		.map(str::to_string)
		.collect()
}

fn default_cover_terms() -> Vec<String> {
	["目次", "表紙", "序", "著者", "発行", "凡例", "題字", "contents"]
		.into_iter()
		.map(str::to_string)
		.collect()
}

fn default_min_script_density() -> u32 {
	30
}

fn default_min_analysis_chars() -> u32 {
	20
}

fn default_pin_score() -> f64 {
	1_000_000.0
}

fn default_pinned_chain_score() -> f64 {
	100_000.0
}

fn default_range_score() -> f64 {
	50.0
}

fn default_fallback_score() -> f64 {
	10.0
}
