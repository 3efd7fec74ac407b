use std::collections::HashSet;

use motif_domain::Requirements;
use motif_service::{Error, SearchRequest};

#[tokio::test]
async fn results_are_bounded_sorted_and_unique() {
	let service = super::sample_service().await;

	for top_k in [1, 3, 5, 50] {
		let request = SearchRequest::new(super::button_requirements()).with_top_k(top_k);
		let response = super::search(&service, request).await;
		let ids: HashSet<&str> = super::ids(&response).into_iter().collect();

		assert!(response.results.len() <= top_k as usize);
		assert_eq!(ids.len(), response.results.len());

		for (position, item) in response.results.iter().enumerate() {
			assert_eq!(item.ranking_details.final_rank as usize, position + 1);
		}
		for pair in response.results.windows(2) {
			let (left, right) = (&pair[0].ranking_details, &pair[1].ranking_details);

			assert!(left.final_score >= right.final_score);

			if left.final_score == right.final_score {
				assert!(pair[0].pattern_id < pair[1].pattern_id);
			}
		}
	}
}

#[tokio::test]
async fn final_score_is_the_weighted_sum_of_normalized_scores() {
	let service = super::sample_service().await;
	let request = SearchRequest::new(super::button_requirements()).with_top_k(50);
	let response = super::search(&service, request).await;
	let weights = response.retrieval_metadata.weights;

	assert_eq!(response.results.len(), 6);

	for item in &response.results {
		let details = &item.ranking_details;
		let expected = weights.bm25 * details.bm25_norm + weights.semantic * details.semantic_norm;

		assert!((details.final_score - expected).abs() < 1e-6);
		assert!((0.0..=1.0).contains(&details.bm25_norm));
		assert!((0.0..=1.0).contains(&details.semantic_norm));
		assert!((0.0..=1.0).contains(&item.confidence));

		if details.bm25_rank.is_none() {
			assert_eq!(details.bm25_norm, 0.0);
		}
	}
}

#[tokio::test]
async fn repeated_searches_are_identical() {
	let service = super::sample_service().await;
	let requirements = Requirements::new("Input").with_props(["size", "disabled"]);
	let first = super::search(&service, SearchRequest::new(requirements.clone())).await;
	let second = super::search(&service, SearchRequest::new(requirements)).await;

	assert_eq!(super::ids(&first), super::ids(&second));

	for (left, right) in first.results.iter().zip(&second.results) {
		assert_eq!(left.ranking_details.final_score, right.ranking_details.final_score);
		assert_eq!(left.confidence, right.confidence);
		assert_eq!(left.explanation, right.explanation);
	}
}

#[tokio::test]
async fn zero_top_k_returns_no_results_with_metadata() {
	let service = super::sample_service().await;
	let response =
		super::search(&service, SearchRequest::new(super::button_requirements()).with_top_k(0))
			.await;

	assert!(response.results.is_empty());
	assert_eq!(response.retrieval_metadata.total_patterns_searched, 6);
	assert!(!response.retrieval_metadata.methods_used.is_empty());
	assert!(!response.retrieval_metadata.query.is_empty());
}

#[tokio::test]
async fn top_k_above_the_ceiling_is_rejected() {
	let service = super::sample_service().await;
	let err = service
		.search(SearchRequest::new(super::button_requirements()).with_top_k(51))
		.await
		.expect_err("Expected validation error.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn default_top_k_is_three() {
	let service = super::sample_service().await;
	let response = super::search(&service, SearchRequest::new(Requirements::new("Card"))).await;

	assert_eq!(response.results.len(), 3);
	assert!(super::ids(&response).contains(&"card-elevated"));
}
