use std::sync::Arc;

use serde_json::json;

use motif_domain::Requirements;
use motif_service::{Error, MotifService, Providers, SearchRequest};
use motif_testkit::{CountingEmbedder, HashEmbedder};

fn button() -> Requirements {
	Requirements::new("Button").with_props(["variant", "size"]).with_variants(["primary"])
}

#[tokio::test]
async fn query_embeddings_are_cached() {
	let embedder = Arc::new(CountingEmbedder::default());
	let cfg = motif_testkit::test_config("unused.json");
	let service = motif_testkit::sample_service(cfg, embedder.clone())
		.await
		.expect("Failed to build sample service.");

	service.search(SearchRequest::new(button())).await.expect("Search failed.");
	service.search(SearchRequest::new(button()).with_top_k(5)).await.expect("Search failed.");

	assert_eq!(embedder.calls(), 1);

	service.search(SearchRequest::new(Requirements::new("Card"))).await.expect("Search failed.");

	assert_eq!(embedder.calls(), 2);
}

#[tokio::test]
async fn disabled_cache_embeds_every_query() {
	let mut cfg = motif_testkit::test_config("unused.json");

	cfg.search.cache.enabled = false;

	let embedder = Arc::new(CountingEmbedder::default());
	let service = motif_testkit::sample_service(cfg, embedder.clone())
		.await
		.expect("Failed to build sample service.");

	service.search(SearchRequest::new(button())).await.expect("Search failed.");
	service.search(SearchRequest::new(button())).await.expect("Search failed.");

	assert_eq!(embedder.calls(), 2);
}

#[tokio::test]
async fn search_before_first_load_is_not_ready() {
	let service = MotifService::with_providers(
		motif_testkit::test_config("unused.json"),
		Providers::new(Arc::new(HashEmbedder)),
	);
	let err = service
		.search(SearchRequest::new(button()))
		.await
		.expect_err("Expected index not ready.");

	assert!(matches!(err, Error::IndexNotReady));
	assert!(!service.index_status().ready);
}

#[tokio::test]
async fn blank_component_type_is_a_validation_error() {
	let service = motif_testkit::sample_service(
		motif_testkit::test_config("unused.json"),
		Arc::new(HashEmbedder),
	)
	.await
	.expect("Failed to build sample service.");
	let err = service
		.search(SearchRequest::new(Requirements::new("   ")))
		.await
		.expect_err("Expected validation error.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn search_request_coerces_loose_requirements() {
	let request: SearchRequest = serde_json::from_value(json!({
		"requirements": {
			"componentType": "Button",
			"props": "variant, size, ,variant",
			"variants": null,
			"a11y": ["aria-label"],
		},
		"top_k": 2,
	}))
	.expect("Failed to parse request.");

	assert_eq!(request.top_k, Some(2));
	assert_eq!(request.requirements.component_type, "Button");
	assert_eq!(request.requirements.props, vec!["variant", "size"]);
	assert!(request.requirements.variants.is_empty());
}

#[test]
fn search_request_rejects_non_string_lists() {
	let result = serde_json::from_value::<SearchRequest>(json!({
		"requirements": { "component_type": "Button", "props": 3 },
	}));

	assert!(result.is_err());
}
