pub mod admin;
pub mod search;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

pub use admin::{IndexStatus, ReloadReport};
pub use error::{Error, Result};
pub use search::{
	DegradedRetriever, FusionWeights, MatchHighlights, RankingDetails, RetrievalMetadata,
	RetrievalMethod, SearchItem, SearchRequest, SearchResponse,
};

use motif_config::{Config, EmbeddingProviderConfig};
use motif_index::IndexHandle;
use motif_providers::embedding;
use search::cache::QueryEmbeddingCache;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	/// Embeds `texts` in one batch, returning one vector per input in the same order.
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

pub struct MotifService {
	pub cfg: Config,
	pub providers: Providers,
	index: IndexHandle,
	query_cache: Option<QueryEmbeddingCache>,
}
impl MotifService {
	pub fn new(cfg: Config) -> Self {
		Self::with_providers(cfg, Providers::default())
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		let cache_cfg = &cfg.search.cache;
		let query_cache = cache_cfg
			.enabled
			.then(|| QueryEmbeddingCache::new(cache_cfg.max_entries, cache_cfg.ttl_secs));

		Self { cfg, providers, index: IndexHandle::new(), query_cache }
	}

	pub fn index(&self) -> &IndexHandle {
		&self.index
	}

	pub(crate) fn query_cache(&self) -> Option<&QueryEmbeddingCache> {
		self.query_cache.as_ref()
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(cfg, texts).await?) })
	}
}
