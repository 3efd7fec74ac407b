use std::{fs, sync::Arc};

use motif_service::{Error, MotifService, Providers, SearchRequest};
use motif_testkit::{CountingEmbedder, FailingEmbedder, TempCorpus};

#[tokio::test]
async fn reload_embeds_records_in_batches() {
	let records = motif_testkit::sample_records().expect("Failed to read sample corpus.");
	let corpus = TempCorpus::write(&records).expect("Failed to write corpus.");
	let embedder = Arc::new(CountingEmbedder::default());
	let service = MotifService::with_providers(
		motif_testkit::test_config(corpus.path()),
		Providers::new(embedder.clone()),
	);
	let report = service.reload_index().await.expect("Failed to reload index.");

	assert_eq!(report.version, 1);
	assert_eq!(report.pattern_count, 6);
	assert_eq!(report.embedded_count, 6);
	assert_eq!(report.reused_count, 0);
	assert_eq!(embedder.calls(), 2);

	let status = service.index_status();

	assert!(status.ready);
	assert_eq!(status.version, Some(1));
	assert_eq!(status.pattern_count, 6);
	assert_eq!(status.fingerprint.as_deref(), Some(report.fingerprint.as_str()));
	assert!(status.loaded_at.is_some());

	let response =
		super::search(&service, SearchRequest::new(super::button_requirements())).await;

	assert_eq!(response.results[0].pattern_id, "button-primary");
}

#[tokio::test]
async fn failed_reload_keeps_the_previous_snapshot() {
	let records = motif_testkit::sample_records().expect("Failed to read sample corpus.");
	let corpus = TempCorpus::write(&records).expect("Failed to write corpus.");
	let service = MotifService::with_providers(
		motif_testkit::test_config(corpus.path()),
		Providers::new(Arc::new(CountingEmbedder::default())),
	);

	service.reload_index().await.expect("Failed to reload index.");

	let in_flight = service.index().snapshot().expect("Index must be ready.");

	let duplicated = r#"[
		{ "id": "a", "name": "Card", "category": "card" },
		{ "id": "a", "name": "Input", "category": "input" }
	]"#;

	fs::write(corpus.path(), duplicated).expect("Failed to rewrite corpus.");

	let err = service.reload_index().await.expect_err("Expected duplicate id error.");

	assert!(matches!(err, Error::Index { .. }));
	assert_eq!(service.index_status().version, Some(1));
	assert_eq!(in_flight.len(), 6);
}

#[tokio::test]
async fn swap_leaves_in_flight_snapshots_untouched() {
	let service = super::sample_service().await;
	let in_flight = service.index().snapshot().expect("Index must be ready.");
	let patterns = motif_testkit::sample_patterns().expect("Failed to read sample corpus.");
	let smaller = motif_testkit::embedded_records(
		patterns.into_iter().take(2).collect(),
		service.cfg.providers.embedding.dimensions,
	);
	let report = service.load_patterns(smaller).await.expect("Failed to load patterns.");

	assert_eq!(report.version, 2);
	assert_eq!(report.reused_count, 2);
	assert_eq!(in_flight.len(), 6);
	assert_eq!(in_flight.version(), 1);
	assert_eq!(service.index_status().pattern_count, 2);
}

#[tokio::test]
async fn provider_failure_during_build_leaves_index_unready() {
	let service = MotifService::with_providers(
		super::test_config(),
		Providers::new(Arc::new(FailingEmbedder)),
	);
	let records = motif_testkit::sample_records().expect("Failed to read sample corpus.");
	let err = service.load_patterns(records).await.expect_err("Expected provider error.");

	assert!(matches!(err, Error::Provider { .. }));
	assert!(!service.index_status().ready);

	let err = service
		.search(SearchRequest::new(super::button_requirements()))
		.await
		.expect_err("Expected index not ready.");

	assert!(matches!(err, Error::IndexNotReady));
}
