use std::sync::Arc;

use super::{
	cache::{self, QueryEmbeddingCache},
	fusion::{self, ScoredDoc},
};
use crate::{Error, Providers, Result};
use motif_config::EmbeddingProviderConfig;
use motif_index::PatternIndex;

/// Embeds the query text, consulting the cache first.
///
/// Exactly one provider call is made on a miss. Only well-formed vectors are cached.
pub async fn embed_query(
	providers: &Providers,
	cfg: &EmbeddingProviderConfig,
	cache: Option<&QueryEmbeddingCache>,
	text: &str,
) -> Result<Arc<Vec<f32>>> {
	let key = cache.map(|_| cache::query_key(cfg, text));

	if let (Some(cache), Some(key)) = (cache, key.as_deref())
		&& let Some(vector) = cache.get(key)
	{
		tracing::debug!(dimensions = vector.len(), "Query embedding cache hit.");

		return Ok(vector);
	}

	let texts = vec![text.to_string()];
	let mut vectors = providers.embedding.embed(cfg, &texts).await?;

	if vectors.len() != 1 {
		return Err(Error::Provider {
			message: format!("Expected one query embedding, got {}.", vectors.len()),
		});
	}

	let vector = Arc::new(vectors.swap_remove(0));

	if let (Some(cache), Some(key)) = (cache, key) {
		cache.insert(key, vector.clone());
	}

	Ok(vector)
}

/// Scores every pattern by `(cos + 1) / 2`, sorted best-first.
///
/// The shift keeps scores in `[0, 1]` independent of corpus size. A query vector whose length
/// differs from the index dimensions is a provider failure.
pub fn rank(index: &PatternIndex, query: &[f32]) -> Result<Vec<ScoredDoc>> {
	let vectors = index.vectors();

	if query.len() != vectors.dimensions() {
		return Err(Error::Provider {
			message: format!(
				"Query embedding has {} dimensions; the index expects {}.",
				query.len(),
				vectors.dimensions()
			),
		});
	}

	let mut hits: Vec<ScoredDoc> = vectors
		.cosine_all(query)
		.into_iter()
		.enumerate()
		.map(|(doc, cosine)| ScoredDoc { doc, score: (cosine + 1.0) / 2.0 })
		.collect();

	fusion::sort_scored(index, &mut hits);

	Ok(hits)
}

#[cfg(test)]
mod tests {
	use super::*;
	use motif_config::Bm25FieldWeights;
	use motif_domain::Pattern;
	use motif_index::IndexBuild;

	fn index() -> PatternIndex {
		let patterns: Vec<Pattern> = ["east", "north", "west"]
			.iter()
			.map(|id| Pattern {
				id: id.to_string(),
				name: id.to_string(),
				category: "compass".to_string(),
				framework: String::new(),
				library: String::new(),
				code: String::new(),
				metadata: None,
			})
			.collect();

		PatternIndex::build(IndexBuild {
			version: 1,
			patterns,
			embeddings: vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0]],
			dimensions: 2,
			field_weights: &Bm25FieldWeights::default(),
		})
		.expect("Failed to build index.")
	}

	#[test]
	fn shifted_cosine_orders_by_angle() {
		let index = index();
		let hits = rank(&index, &[1.0, 0.0]).expect("Failed to rank.");
		let scores: Vec<f32> = hits.iter().map(|hit| hit.score).collect();
		let docs: Vec<usize> = hits.iter().map(|hit| hit.doc).collect();

		assert_eq!(docs, vec![0, 1, 2]);
		assert!((scores[0] - 1.0).abs() < 1e-6);
		assert!((scores[1] - 0.5).abs() < 1e-6);
		assert!(scores[2].abs() < 1e-6);
	}

	#[test]
	fn dimension_mismatch_is_a_provider_failure() {
		let err = rank(&index(), &[1.0, 0.0, 0.0]).expect_err("Expected dimension mismatch.");

		assert!(matches!(err, Error::Provider { .. }));
	}
}
