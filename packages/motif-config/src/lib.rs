mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Bm25FieldWeights, Config, EmbeddingProviderConfig, Library, Providers, Ranking, RankingBm25,
	Search, SearchCache, Service,
};

use std::{fs, path::Path};

const WEIGHT_SUM_TOLERANCE: f32 = 1e-6;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

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
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.admin_bind must be non-empty.".to_string(),
		});
	}
	if cfg.library.path.as_os_str().is_empty() {
		return Err(Error::Validation { message: "library.path must be non-empty.".to_string() });
	}
	if cfg.library.embed_batch_size == 0 {
		return Err(Error::Validation {
			message: "library.embed_batch_size must be greater than zero.".to_string(),
		});
	}

	validate_embedding_provider(&cfg.providers.embedding)?;
	validate_search(&cfg.search)?;
	validate_ranking(&cfg.ranking)?;

	Ok(())
}

fn validate_embedding_provider(provider: &EmbeddingProviderConfig) -> Result<()> {
	for (label, value) in [
		("providers.embedding.provider_id", &provider.provider_id),
		("providers.embedding.api_base", &provider.api_base),
		("providers.embedding.api_key", &provider.api_key),
		("providers.embedding.model", &provider.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if provider.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if provider.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn validate_search(search: &Search) -> Result<()> {
	if search.default_top_k == 0 {
		return Err(Error::Validation {
			message: "search.default_top_k must be greater than zero.".to_string(),
		});
	}
	if search.default_top_k > search.max_top_k {
		return Err(Error::Validation {
			message: "search.default_top_k must be less than or equal to search.max_top_k."
				.to_string(),
		});
	}
	if search.lexical_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.lexical_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if search.semantic_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.semantic_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if search.cache.enabled && search.cache.max_entries == 0 {
		return Err(Error::Validation {
			message: "search.cache.max_entries must be greater than zero when enabled."
				.to_string(),
		});
	}
	if search.cache.enabled && search.cache.ttl_secs == 0 {
		return Err(Error::Validation {
			message: "search.cache.ttl_secs must be greater than zero when enabled.".to_string(),
		});
	}

	Ok(())
}

fn validate_ranking(ranking: &Ranking) -> Result<()> {
	for (label, weight) in [
		("ranking.bm25_weight", ranking.bm25_weight),
		("ranking.semantic_weight", ranking.semantic_weight),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if !(0.0..=1.0).contains(&weight) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-1.0."),
			});
		}
	}

	if (ranking.bm25_weight + ranking.semantic_weight - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
		return Err(Error::Validation {
			message: "ranking.bm25_weight and ranking.semantic_weight must sum to 1.0.".to_string(),
		});
	}

	let bm25 = &ranking.bm25;

	if !bm25.k1.is_finite() || bm25.k1 <= 0.0 {
		return Err(Error::Validation {
			message: "ranking.bm25.k1 must be a finite number greater than zero.".to_string(),
		});
	}
	if !bm25.b.is_finite() || !(0.0..=1.0).contains(&bm25.b) {
		return Err(Error::Validation {
			message: "ranking.bm25.b must be in the range 0.0-1.0.".to_string(),
		});
	}

	let mut any_positive = false;

	for (field, weight) in bm25.fields.entries() {
		if !weight.is_finite() || weight < 0.0 {
			return Err(Error::Validation {
				message: format!(
					"ranking.bm25.fields.{field} must be a finite number zero or greater."
				),
			});
		}

		any_positive |= weight > 0.0;
	}

	if !any_positive {
		return Err(Error::Validation {
			message: "ranking.bm25.fields must contain at least one positive weight.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();

	if cfg.service.log_level.is_empty() {
		cfg.service.log_level = "info".to_string();
	}

	let api_base = cfg.providers.embedding.api_base.trim_end_matches('/').to_string();

	cfg.providers.embedding.api_base = api_base;
}
