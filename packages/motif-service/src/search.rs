pub mod cache;
pub mod explain;
pub mod fusion;
pub mod lexical;
pub mod query;
pub mod semantic;

use std::{
	sync::Arc,
	time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tokio::time;

use crate::{Error, MotifService, Result};
use fusion::{FusedCandidate, ScoredDoc};
use motif_domain::{PatternMetadata, Requirements};
use motif_index::PatternIndex;
use query::Query;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	pub requirements: Requirements,
	#[serde(default)]
	pub top_k: Option<u32>,
}
impl SearchRequest {
	pub fn new(requirements: Requirements) -> Self {
		Self { requirements, top_k: None }
	}

	pub fn with_top_k(mut self, top_k: u32) -> Self {
		self.top_k = Some(top_k);

		self
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchHighlights {
	pub matched_props: Vec<String>,
	pub matched_variants: Vec<String>,
	pub matched_a11y: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RankingDetails {
	pub bm25_score: f32,
	pub bm25_norm: f32,
	pub bm25_rank: Option<u32>,
	pub semantic_score: f32,
	pub semantic_norm: f32,
	pub semantic_rank: Option<u32>,
	pub final_score: f32,
	pub final_rank: u32,
	pub applied_boosts: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchItem {
	pub pattern_id: String,
	pub name: String,
	pub category: String,
	pub framework: String,
	pub library: String,
	pub code: String,
	pub metadata: Option<PatternMetadata>,
	pub confidence: f32,
	pub explanation: String,
	pub match_highlights: MatchHighlights,
	pub ranking_details: RankingDetails,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMethod {
	Bm25,
	Semantic,
	Fusion,
}
impl RetrievalMethod {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Bm25 => "bm25",
			Self::Semantic => "semantic",
			Self::Fusion => "fusion",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
	pub bm25: f32,
	pub semantic: f32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradedRetriever {
	pub method: RetrievalMethod,
	pub reason: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievalMetadata {
	pub latency_ms: u64,
	pub methods_used: Vec<RetrievalMethod>,
	pub weights: FusionWeights,
	pub total_patterns_searched: usize,
	pub query: String,
	pub index_version: u64,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub degraded: Vec<DegradedRetriever>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResponse {
	pub results: Vec<SearchItem>,
	pub retrieval_metadata: RetrievalMetadata,
}

impl MotifService {
	/// Ranks the live index against `req.requirements` and explains the top results.
	///
	/// Both retrievers run concurrently under their own timeouts. One failing retriever degrades
	/// the response to the survivor's ranking; both failing is [`Error::RetrievalUnavailable`].
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let started = Instant::now();
		let top_k = self.resolve_top_k(req.top_k)?;
		let query = query::build_query(&req.requirements)?;
		let index = self.index().snapshot().ok_or(Error::IndexNotReady)?;

		if index.is_empty() {
			return Err(Error::RetrievalUnavailable {
				message: "The pattern index is empty.".to_string(),
			});
		}

		let (bm25, semantic) =
			tokio::join!(self.run_lexical(index.clone(), &query), self.run_semantic(&index, &query));
		let mut degraded = Vec::new();
		let bm25 = settle(RetrievalMethod::Bm25, bm25, &mut degraded);
		let semantic = settle(RetrievalMethod::Semantic, semantic, &mut degraded);
		let Some(weights) =
			fusion::resolve_weights(&self.cfg.ranking, bm25.is_some(), semantic.is_some())
		else {
			let reasons: Vec<String> = degraded
				.iter()
				.map(|failure| format!("{}: {}", failure.method.as_str(), failure.reason))
				.collect();

			return Err(Error::RetrievalUnavailable { message: reasons.join("; ") });
		};
		let mut methods_used = Vec::new();

		if bm25.is_some() {
			methods_used.push(RetrievalMethod::Bm25);
		}
		if semantic.is_some() {
			methods_used.push(RetrievalMethod::Semantic);
		}
		if methods_used.len() == 2 {
			methods_used.push(RetrievalMethod::Fusion);
		}

		let fused = fusion::fuse(&index, bm25.as_deref(), semantic.as_deref(), weights);
		let results: Vec<SearchItem> = fused
			.iter()
			.take(top_k)
			.filter_map(|candidate| build_item(&index, &req.requirements, candidate))
			.collect();
		let latency_ms = started.elapsed().as_millis() as u64;

		tracing::debug!(
			index_version = index.version(),
			candidates = fused.len(),
			returned = results.len(),
			degraded = degraded.len(),
			latency_ms,
			"Pattern search completed."
		);

		Ok(SearchResponse {
			results,
			retrieval_metadata: RetrievalMetadata {
				latency_ms,
				methods_used,
				weights,
				total_patterns_searched: index.len(),
				query: query.text,
				index_version: index.version(),
				degraded,
			},
		})
	}

	fn resolve_top_k(&self, requested: Option<u32>) -> Result<usize> {
		let top_k = requested.unwrap_or(self.cfg.search.default_top_k);

		if top_k > self.cfg.search.max_top_k {
			return Err(Error::Validation {
				message: format!(
					"top_k must be less than or equal to {}.",
					self.cfg.search.max_top_k
				),
			});
		}

		Ok(top_k as usize)
	}

	async fn run_lexical(&self, index: Arc<PatternIndex>, query: &Query) -> Result<Vec<ScoredDoc>> {
		let timeout_ms = self.cfg.search.lexical_timeout_ms;
		let terms = query.terms.clone();
		let params = self.cfg.ranking.bm25.clone();
		let task = tokio::task::spawn_blocking(move || lexical::rank(&index, &terms, &params));

		match time::timeout(Duration::from_millis(timeout_ms), task).await {
			Ok(Ok(hits)) => Ok(hits),
			Ok(Err(err)) => Err(Error::RetrievalUnavailable {
				message: format!("BM25 task failed: {err}"),
			}),
			Err(_) => Err(Error::RetrieverTimeout { retriever: "bm25", timeout_ms }),
		}
	}

	async fn run_semantic(&self, index: &PatternIndex, query: &Query) -> Result<Vec<ScoredDoc>> {
		let timeout_ms = self.cfg.search.semantic_timeout_ms;
		let embedding = semantic::embed_query(
			&self.providers,
			&self.cfg.providers.embedding,
			self.query_cache(),
			&query.text,
		);
		let vector = match time::timeout(Duration::from_millis(timeout_ms), embedding).await {
			Ok(result) => result?,
			Err(_) => return Err(Error::RetrieverTimeout { retriever: "semantic", timeout_ms }),
		};

		semantic::rank(index, &vector)
	}
}

fn settle(
	method: RetrievalMethod,
	result: Result<Vec<ScoredDoc>>,
	degraded: &mut Vec<DegradedRetriever>,
) -> Option<Vec<ScoredDoc>> {
	match result {
		Ok(hits) => Some(hits),
		Err(err) => {
			tracing::warn!(
				error = %err,
				retriever = method.as_str(),
				"Retriever failed. Continuing with the remaining ranking."
			);

			degraded.push(DegradedRetriever { method, reason: err.to_string() });

			None
		},
	}
}

fn build_item(
	index: &PatternIndex,
	requirements: &Requirements,
	candidate: &FusedCandidate,
) -> Option<SearchItem> {
	let pattern = index.pattern(candidate.doc)?;
	let explanation = explain::explain_or_fallback(requirements, pattern, candidate.final_score);

	Some(SearchItem {
		pattern_id: pattern.id.clone(),
		name: pattern.name.clone(),
		category: pattern.category.clone(),
		framework: pattern.framework.clone(),
		library: pattern.library.clone(),
		code: pattern.code.clone(),
		metadata: pattern.metadata.clone(),
		confidence: explanation.confidence,
		explanation: explanation.text,
		match_highlights: explanation.highlights,
		ranking_details: RankingDetails {
			bm25_score: candidate.bm25_score,
			bm25_norm: candidate.bm25_norm,
			bm25_rank: candidate.bm25_rank,
			semantic_score: candidate.semantic_score,
			semantic_norm: candidate.semantic_norm,
			semantic_rank: candidate.semantic_rank,
			final_score: candidate.final_score,
			final_rank: candidate.final_rank,
			applied_boosts: explanation.applied_boosts,
		},
	})
}
