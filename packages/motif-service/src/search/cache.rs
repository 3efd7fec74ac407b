use std::{sync::Arc, time::Duration};

use moka::sync::Cache;

use motif_config::EmbeddingProviderConfig;

/// Query embeddings keyed by a blake3 hash of the provider identity and the query text.
pub struct QueryEmbeddingCache {
	cache: Cache<String, Arc<Vec<f32>>>,
}
impl QueryEmbeddingCache {
	pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
		let cache = Cache::builder()
			.max_capacity(max_entries)
			.time_to_live(Duration::from_secs(ttl_secs))
			.build();

		Self { cache }
	}

	pub fn get(&self, key: &str) -> Option<Arc<Vec<f32>>> {
		self.cache.get(key)
	}

	pub fn insert(&self, key: String, vector: Arc<Vec<f32>>) {
		self.cache.insert(key, vector);
	}
}

/// Cache key for `text` under the given provider settings.
///
/// Changing the provider, model, or dimensions yields a different key, so stale vectors are never
/// served after a config change.
pub fn query_key(cfg: &EmbeddingProviderConfig, text: &str) -> String {
	let payload = serde_json::json!({
		"provider_id": cfg.provider_id,
		"model": cfg.model,
		"dimensions": cfg.dimensions,
		"text": text,
	});

	blake3::hash(payload.to_string().as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn provider(model: &str) -> EmbeddingProviderConfig {
		EmbeddingProviderConfig {
			provider_id: "test".to_string(),
			api_base: "http://localhost".to_string(),
			api_key: "key".to_string(),
			path: "/embeddings".to_string(),
			model: model.to_string(),
			dimensions: 8,
			timeout_ms: 1_000,
			default_headers: Default::default(),
		}
	}

	#[test]
	fn key_changes_with_model_and_text() {
		let base = query_key(&provider("a"), "Button component");

		assert_eq!(base, query_key(&provider("a"), "Button component"));
		assert_ne!(base, query_key(&provider("b"), "Button component"));
		assert_ne!(base, query_key(&provider("a"), "Card component"));
	}

	#[test]
	fn cached_vectors_are_shared() {
		let cache = QueryEmbeddingCache::new(4, 60);
		let vector = Arc::new(vec![0.5, 0.5]);

		cache.insert("k".to_string(), vector.clone());

		assert_eq!(cache.get("k").as_deref(), Some(&vec![0.5, 0.5]));
		assert!(cache.get("missing").is_none());
	}
}
