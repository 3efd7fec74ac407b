use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};

use motif_config::EmbeddingProviderConfig;

fn provider_config() -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "p".to_string(),
		api_base: "http://127.0.0.1:9".to_string(),
		api_key: "key".to_string(),
		path: "/embeddings".to_string(),
		model: "m".to_string(),
		dimensions: 8,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

#[test]
fn builds_bearer_auth_header() {
	let headers =
		motif_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn copies_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-team".to_string(), Value::String("design-system".to_string()));

	let headers =
		motif_providers::auth_headers("secret", &defaults).expect("Failed to build headers.");

	assert_eq!(headers.get("x-team").expect("Missing default header."), "design-system");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-retries".to_string(), Value::from(3));

	let err = motif_providers::auth_headers("secret", &defaults)
		.expect_err("Expected header validation error.");

	assert!(matches!(err, motif_providers::Error::InvalidConfig { .. }));
}

#[tokio::test]
async fn empty_input_skips_the_network() {
	let vectors = motif_providers::embedding::embed(&provider_config(), &[])
		.await
		.expect("Empty input must not call the provider.");

	assert!(vectors.is_empty());
}
