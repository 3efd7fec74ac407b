use std::{
	sync::Arc,
	time::{Duration, Instant},
};

use motif_domain::Requirements;
use motif_service::{FusionWeights, RetrievalMethod, SearchRequest};
use motif_testkit::{FailingEmbedder, StallingEmbedder};

#[tokio::test]
async fn semantic_failure_degrades_to_bm25_only() {
	let service = super::service_with(super::test_config(), Arc::new(FailingEmbedder)).await;
	let response =
		super::search(&service, SearchRequest::new(super::button_requirements())).await;
	let metadata = &response.retrieval_metadata;

	assert!(!response.results.is_empty());
	assert_eq!(response.results[0].pattern_id, "button-primary");
	assert_eq!(metadata.methods_used, vec![RetrievalMethod::Bm25]);
	assert_eq!(metadata.weights, FusionWeights { bm25: 1.0, semantic: 0.0 });
	assert_eq!(metadata.degraded.len(), 1);
	assert_eq!(metadata.degraded[0].method, RetrievalMethod::Semantic);
	assert!(metadata.degraded[0].reason.contains("embedding backend is down"));

	for item in &response.results {
		assert_eq!(item.ranking_details.semantic_rank, None);
		assert!(
			(item.ranking_details.final_score - item.ranking_details.bm25_norm).abs() < 1e-6
		);
	}
}

#[tokio::test]
async fn stalled_embedder_is_cut_off_by_the_semantic_timeout() {
	let mut cfg = super::test_config();

	cfg.search.semantic_timeout_ms = 50;

	let embedder = StallingEmbedder { delay: Duration::from_secs(5) };
	let service = super::service_with(cfg, Arc::new(embedder)).await;
	let started = Instant::now();
	let response =
		super::search(&service, SearchRequest::new(super::button_requirements())).await;

	assert!(started.elapsed() < Duration::from_secs(2));
	assert_eq!(response.retrieval_metadata.methods_used, vec![RetrievalMethod::Bm25]);
	assert!(response.retrieval_metadata.degraded[0].reason.contains("timed out"));
	assert_eq!(response.results[0].pattern_id, "button-primary");
}

#[tokio::test]
async fn degraded_search_without_lexical_matches_is_an_empty_success() {
	let service = super::service_with(super::test_config(), Arc::new(FailingEmbedder)).await;
	let response =
		super::search(&service, SearchRequest::new(Requirements::new("Carousel"))).await;
	let metadata = &response.retrieval_metadata;

	assert!(response.results.is_empty());
	assert_eq!(metadata.methods_used, vec![RetrievalMethod::Bm25]);
	assert_eq!(metadata.weights, FusionWeights { bm25: 1.0, semantic: 0.0 });
	assert_eq!(metadata.total_patterns_searched, 6);
	assert_eq!(metadata.degraded.len(), 1);
	assert_eq!(metadata.degraded[0].method, RetrievalMethod::Semantic);
}
