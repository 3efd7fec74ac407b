use std::{cmp::Ordering, collections::HashMap};

use super::FusionWeights;
use motif_config::Ranking;
use motif_index::PatternIndex;

/// One retriever hit. `doc` addresses a pattern in the snapshot the query ran against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredDoc {
	pub doc: usize,
	pub score: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FusedCandidate {
	pub doc: usize,
	pub bm25_score: f32,
	pub bm25_norm: f32,
	pub bm25_rank: Option<u32>,
	pub semantic_score: f32,
	pub semantic_norm: f32,
	pub semantic_rank: Option<u32>,
	pub final_score: f32,
	pub final_rank: u32,
}
impl FusedCandidate {
	fn new(doc: usize) -> Self {
		Self {
			doc,
			bm25_score: 0.0,
			bm25_norm: 0.0,
			bm25_rank: None,
			semantic_score: 0.0,
			semantic_norm: 0.0,
			semantic_rank: None,
			final_score: 0.0,
			final_rank: 0,
		}
	}
}

/// Weights to apply given which retrievers produced a list.
///
/// A missing retriever hands its whole weight to the survivor. Returns `None` when neither is
/// available.
pub fn resolve_weights(
	ranking: &Ranking,
	bm25_available: bool,
	semantic_available: bool,
) -> Option<FusionWeights> {
	match (bm25_available, semantic_available) {
		(true, true) =>
			Some(FusionWeights { bm25: ranking.bm25_weight, semantic: ranking.semantic_weight }),
		(true, false) => Some(FusionWeights { bm25: 1.0, semantic: 0.0 }),
		(false, true) => Some(FusionWeights { bm25: 0.0, semantic: 1.0 }),
		(false, false) => None,
	}
}

/// Min-max normalization into `[0, 1]`, in input order.
///
/// A list whose scores are all equal maps every member to 1.0.
pub fn min_max_normalize(hits: &[ScoredDoc]) -> Vec<f32> {
	let (min, max) = hits.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), hit| {
		(min.min(hit.score), max.max(hit.score))
	});
	let range = max - min;

	if !range.is_finite() || range <= f32::EPSILON {
		return vec![1.0; hits.len()];
	}

	hits.iter().map(|hit| ((hit.score - min) / range).clamp(0.0, 1.0)).collect()
}

/// Weighted combination over the union of both lists.
///
/// Each input list must already be sorted best-first; list position becomes the retriever rank.
/// The output is sorted by final score descending, pattern id ascending, with dense 1-indexed
/// final ranks.
pub fn fuse(
	index: &PatternIndex,
	bm25: Option<&[ScoredDoc]>,
	semantic: Option<&[ScoredDoc]>,
	weights: FusionWeights,
) -> Vec<FusedCandidate> {
	let mut by_doc: HashMap<usize, FusedCandidate> = HashMap::new();

	if let Some(hits) = bm25 {
		for ((position, hit), norm) in hits.iter().enumerate().zip(min_max_normalize(hits)) {
			let candidate = by_doc.entry(hit.doc).or_insert_with(|| FusedCandidate::new(hit.doc));

			candidate.bm25_score = hit.score;
			candidate.bm25_norm = norm;
			candidate.bm25_rank = Some(position as u32 + 1);
		}
	}
	if let Some(hits) = semantic {
		for ((position, hit), norm) in hits.iter().enumerate().zip(min_max_normalize(hits)) {
			let candidate = by_doc.entry(hit.doc).or_insert_with(|| FusedCandidate::new(hit.doc));

			candidate.semantic_score = hit.score;
			candidate.semantic_norm = norm;
			candidate.semantic_rank = Some(position as u32 + 1);
		}
	}

	let mut fused: Vec<FusedCandidate> = by_doc
		.into_values()
		.map(|mut candidate| {
			candidate.final_score =
				weights.bm25 * candidate.bm25_norm + weights.semantic * candidate.semantic_norm;

			candidate
		})
		.collect();

	fused.sort_by(|left, right| {
		cmp_f32_desc(left.final_score, right.final_score)
			.then_with(|| cmp_ids(index, left.doc, right.doc))
	});

	for (position, candidate) in fused.iter_mut().enumerate() {
		candidate.final_rank = position as u32 + 1;
	}

	fused
}

/// Sorts retriever hits by score descending, pattern id ascending.
pub fn sort_scored(index: &PatternIndex, hits: &mut [ScoredDoc]) {
	hits.sort_by(|left, right| {
		cmp_f32_desc(left.score, right.score).then_with(|| cmp_ids(index, left.doc, right.doc))
	});
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

fn cmp_ids(index: &PatternIndex, left: usize, right: usize) -> Ordering {
	let left_id = index.pattern(left).map(|pattern| pattern.id.as_str());
	let right_id = index.pattern(right).map(|pattern| pattern.id.as_str());

	left_id.cmp(&right_id).then_with(|| left.cmp(&right))
}
