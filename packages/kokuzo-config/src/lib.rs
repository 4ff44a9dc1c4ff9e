mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Corpus, GenerationChain, Postgres, Ranking, RankingDiversity, RankingWeights, Search,
	Service, Storage, Tags,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: Box::new(err) })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	validate_search(&cfg.search)?;

	if cfg.corpus.placeholder_sentinel.trim().is_empty() {
		return Err(Error::Validation {
			message: "corpus.placeholder_sentinel must be non-empty.".to_string(),
		});
	}
	if cfg.corpus.default_document.trim().is_empty() {
		return Err(Error::Validation {
			message: "corpus.default_document must be non-empty.".to_string(),
		});
	}

	for (label, value) in [
		("corpus.unextractable_snippet", &cfg.corpus.unextractable_snippet),
		("corpus.fallback_snippet", &cfg.corpus.fallback_snippet),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
		if value.contains(cfg.corpus.placeholder_sentinel.as_str()) {
			return Err(Error::Validation {
				message: format!("{label} must not contain the placeholder sentinel."),
			});
		}
	}
	for [from, _] in &cfg.corpus.orthographic_variants {
		if from.is_empty() {
			return Err(Error::Validation {
				message: "corpus.orthographic_variants entries must have a non-empty source."
					.to_string(),
			});
		}
	}
	for name in cfg.corpus.aliases.keys() {
		if name.trim().is_empty() {
			return Err(Error::Validation {
				message: "corpus.aliases keys must be non-empty.".to_string(),
			});
		}
	}

	validate_ranking(&cfg.ranking)?;

	Ok(())
}

fn validate_search(search: &Search) -> Result<()> {
	for (label, value) in [
		("search.default_limit", search.default_limit),
		("search.max_limit", search.max_limit),
		("search.substring_working_set", search.substring_working_set),
		("search.occurrence_cap", search.occurrence_cap),
		("search.analysis_window_chars", search.analysis_window_chars),
		("search.snippet_chars", search.snippet_chars),
		("search.chunk_limit", search.chunk_limit),
		("search.seed_limit", search.seed_limit),
	] {
		if value == 0 {
			return Err(Error::Validation { message: format!("{label} must be greater than zero.") });
		}
	}

	if search.default_limit > search.max_limit {
		return Err(Error::Validation {
			message: "search.default_limit must not exceed search.max_limit.".to_string(),
		});
	}
	if search.fallback_last_page < 2 {
		return Err(Error::Validation {
			message: "search.fallback_last_page must be 2 or greater.".to_string(),
		});
	}

	Ok(())
}

fn validate_ranking(ranking: &Ranking) -> Result<()> {
	for (label, value) in [
		("ranking.pin_score", ranking.pin_score),
		("ranking.pinned_chain_score", ranking.pinned_chain_score),
		("ranking.range_score", ranking.range_score),
		("ranking.fallback_score", ranking.fallback_score),
		("ranking.weights.base", ranking.weights.base),
		("ranking.weights.empty_page_penalty", ranking.weights.empty_page_penalty),
		("ranking.weights.noise_penalty", ranking.weights.noise_penalty),
		("ranking.weights.content_bonus", ranking.weights.content_bonus),
		("ranking.weights.first_page_penalty", ranking.weights.first_page_penalty),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if value < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	if ranking.pin_score <= ranking.pinned_chain_score {
		return Err(Error::Validation {
			message: "ranking.pin_score must be greater than ranking.pinned_chain_score."
				.to_string(),
		});
	}

	let chain_floor = ranking.pinned_chain_score - ranking.generation_chain.pages.len() as f64;
	let computed_ceiling = ranking.weights.base
		+ ranking.weights.content_bonus * ranking.content_terms.len() as f64;

	if chain_floor <= computed_ceiling.max(ranking.range_score) {
		return Err(Error::Validation {
			message: "ranking.pinned_chain_score must outrank every computed score.".to_string(),
		});
	}

	let diversity = &ranking.diversity;

	if diversity.enabled {
		if diversity.window == 0 {
			return Err(Error::Validation {
				message: "ranking.diversity.window must be greater than zero.".to_string(),
			});
		}
		if !diversity.max_share.is_finite()
			|| diversity.max_share <= 0.0
			|| diversity.max_share > 1.0
		{
			return Err(Error::Validation {
				message: "ranking.diversity.max_share must be in the range (0.0, 1.0].".to_string(),
			});
		}
		if diversity.per_doc_cap == 0 {
			return Err(Error::Validation {
				message: "ranking.diversity.per_doc_cap must be greater than zero.".to_string(),
			});
		}
	}

	let chain = &ranking.generation_chain;

	if chain.enabled {
		if chain.doc.trim().is_empty() {
			return Err(Error::Validation {
				message: "ranking.generation_chain.doc must be non-empty when enabled.".to_string(),
			});
		}
		if chain.pages.is_empty() {
			return Err(Error::Validation {
				message: "ranking.generation_chain.pages must be non-empty when enabled."
					.to_string(),
			});
		}
		if chain.keyword_groups.is_empty() || chain.keyword_groups.iter().any(Vec::is_empty) {
			return Err(Error::Validation {
				message:
					"ranking.generation_chain.keyword_groups must be non-empty groups when enabled."
						.to_string(),
			});
		}
		if chain.pages.iter().any(|page| *page < 1) {
			return Err(Error::Validation {
				message: "ranking.generation_chain.pages must be positive page numbers."
					.to_string(),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.corpus.default_document = cfg.corpus.default_document.trim().to_string();

	for terms in [
		&mut cfg.ranking.noise_terms,
		&mut cfg.ranking.content_terms,
		&mut cfg.ranking.cover_terms,
	] {
		normalize_terms(terms);
	}
	for group in &mut cfg.ranking.generation_chain.keyword_groups {
		normalize_terms(group);
	}

	cfg.ranking.generation_chain.keyword_groups.retain(|group| !group.is_empty());

	for terms in cfg.tags.vocabulary.values_mut() {
		normalize_terms(terms);
	}

	cfg.tags.vocabulary.retain(|_, terms| !terms.is_empty());

	for (name, physical) in cfg.corpus.aliases.iter_mut() {
		let mut out = vec![name.clone()];

		for value in physical.iter() {
			let trimmed = value.trim();

			if trimmed.is_empty() || out.iter().any(|existing| existing == trimmed) {
				continue;
			}

			out.push(trimmed.to_string());
		}

		*physical = out;
	}
}

fn normalize_terms(terms: &mut Vec<String>) {
	let mut out: Vec<String> = Vec::with_capacity(terms.len());

	for term in terms.iter() {
		let trimmed = term.trim();

		if trimmed.is_empty() || out.iter().any(|existing| existing == trimmed) {
			continue;
		}

		out.push(trimmed.to_string());
	}

	*terms = out;
}
