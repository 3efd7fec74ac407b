use motif_domain::Requirements;
use motif_service::{Error, RetrievalMethod, SearchRequest};

#[tokio::test]
async fn exact_button_request_ranks_button_first_with_high_confidence() {
	let service = super::sample_service().await;
	let requirements = super::button_requirements().with_a11y(["aria-label"]);
	let response = super::search(&service, SearchRequest::new(requirements)).await;
	let top = &response.results[0];

	assert!(response.results.len() <= 3);
	assert_eq!(top.pattern_id, "button-primary");
	assert!(top.confidence >= 0.9, "confidence was {}", top.confidence);
	assert!(top.explanation.starts_with("High match"));
	assert_eq!(top.match_highlights.matched_props, vec!["variant", "size", "disabled"]);
	assert_eq!(top.match_highlights.matched_variants, vec!["primary", "secondary", "ghost"]);
	assert_eq!(top.match_highlights.matched_a11y, vec!["aria-label"]);
	assert_eq!(
		top.ranking_details.applied_boosts,
		vec!["category_match", "props_coverage", "variants_coverage", "a11y_present"]
	);
	assert_eq!(top.ranking_details.final_rank, 1);
	assert_eq!(top.ranking_details.bm25_rank, Some(1));
	assert_eq!(top.ranking_details.semantic_rank, Some(1));
	assert_eq!(top.library, "shadcn");
	assert!(top.code.contains("<button"));

	let metadata = &response.retrieval_metadata;

	assert_eq!(
		metadata.methods_used,
		vec![RetrievalMethod::Bm25, RetrievalMethod::Semantic, RetrievalMethod::Fusion]
	);
	assert_eq!(metadata.total_patterns_searched, 6);
	assert_eq!(metadata.index_version, 1);
	assert!(metadata.degraded.is_empty());
	assert_eq!(
		metadata.query,
		"Button component with props: variant, size, disabled; variants: primary, secondary, ghost; \
		 accessibility: aria-label"
	);
}

#[tokio::test]
async fn empty_corpus_is_an_error_not_an_empty_result() {
	let service = super::sample_service().await;

	service.load_patterns(Vec::new()).await.expect("Failed to load empty corpus.");

	let err = service
		.search(SearchRequest::new(super::button_requirements()))
		.await
		.expect_err("Expected retrieval to be unavailable.");

	assert!(matches!(err, Error::RetrievalUnavailable { .. }));
}

#[tokio::test]
async fn misspelled_component_type_is_surfaced_by_semantic_similarity() {
	let service = super::sample_service().await;
	let requirements = Requirements::new("Buttn")
		.with_props(["variant", "size", "disabled"])
		.with_variants(["primary", "secondary", "ghost"]);
	let response = super::search(&service, SearchRequest::new(requirements)).await;
	let top = &response.results[0];

	assert_eq!(top.pattern_id, "button-primary");
	assert_eq!(top.ranking_details.semantic_rank, Some(1));
	assert!(!top.ranking_details.applied_boosts.iter().any(|boost| boost == "category_match"));
	assert!(top.explanation.contains("differs from requested Buttn"));
}

#[tokio::test]
async fn pattern_without_metadata_gets_a_basic_explanation() {
	let service = super::sample_service().await;
	let response =
		super::search(&service, SearchRequest::new(Requirements::new("Badge")).with_top_k(1))
			.await;
	let top = &response.results[0];

	assert_eq!(super::ids(&response), vec!["badge-legacy"]);
	assert!(top.metadata.is_none());
	assert!(top.explanation.contains("Match details are unavailable"));
	assert_eq!(top.ranking_details.applied_boosts, vec!["category_match"]);
	assert!(top.match_highlights.matched_props.is_empty());
}

#[tokio::test]
async fn bare_component_type_ranks_the_matching_pattern_first() {
	let service = super::sample_service().await;
	let response = super::search(&service, SearchRequest::new(Requirements::new("Button"))).await;
	let top = &response.results[0];

	assert_eq!(top.pattern_id, "button-primary");
	assert_eq!(top.ranking_details.bm25_rank, Some(1));
	assert_eq!(top.ranking_details.semantic_rank, Some(1));
	assert!(
		response.results[1..].iter().all(|item| item.confidence < top.confidence),
		"{:?}",
		super::ids(&response)
	);
}
