use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub library: Library,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub ranking: Ranking,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Library {
	/// JSON corpus of pattern records, either a bare array or `{ "patterns": [...] }`.
	pub path: PathBuf,
	#[serde(default = "default_load_on_start")]
	pub load_on_start: bool,
	#[serde(default = "default_embed_batch_size")]
	pub embed_batch_size: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub default_top_k: u32,
	pub max_top_k: u32,
	pub lexical_timeout_ms: u64,
	/// Hard ceiling on the query embedding call. A single attempt is made.
	pub semantic_timeout_ms: u64,
	pub cache: SearchCache,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_top_k: 3,
			max_top_k: 50,
			lexical_timeout_ms: 500,
			semantic_timeout_ms: 2_500,
			cache: SearchCache::default(),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SearchCache {
	pub enabled: bool,
	pub max_entries: u64,
	pub ttl_secs: u64,
}
impl Default for SearchCache {
	fn default() -> Self {
		Self { enabled: true, max_entries: 1_024, ttl_secs: 3_600 }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub bm25_weight: f32,
	pub semantic_weight: f32,
	pub bm25: RankingBm25,
}
impl Default for Ranking {
	fn default() -> Self {
		Self { bm25_weight: 0.3, semantic_weight: 0.7, bm25: RankingBm25::default() }
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RankingBm25 {
	pub k1: f32,
	pub b: f32,
	pub fields: Bm25FieldWeights,
}
impl Default for RankingBm25 {
	fn default() -> Self {
		Self { k1: 1.2, b: 0.75, fields: Bm25FieldWeights::default() }
	}
}

/// Per-field multipliers applied to term frequency and document length at index build time.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Bm25FieldWeights {
	pub name: f32,
	pub category: f32,
	pub description: f32,
	pub props: f32,
	pub variants: f32,
	pub a11y: f32,
	pub tags: f32,
}
impl Bm25FieldWeights {
	pub fn entries(&self) -> [(&'static str, f32); 7] {
		[
			("name", self.name),
			("category", self.category),
			("description", self.description),
			("props", self.props),
			("variants", self.variants),
			("a11y", self.a11y),
			("tags", self.tags),
		]
	}
}
impl Default for Bm25FieldWeights {
	fn default() -> Self {
		Self {
			name: 3.0,
			category: 3.0,
			description: 1.0,
			props: 2.0,
			variants: 2.0,
			a11y: 1.5,
			tags: 1.0,
		}
	}
}

fn default_load_on_start() -> bool {
	true
}

fn default_embed_batch_size() -> u32 {
	32
}
