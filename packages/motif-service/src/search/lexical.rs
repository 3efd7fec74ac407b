use std::collections::HashMap;

use super::fusion::{self, ScoredDoc};
use motif_config::RankingBm25;
use motif_index::PatternIndex;

/// Scores every pattern that shares at least one term with the query.
///
/// Walks the postings of each query term only. Patterns with no matching term are absent from
/// the result rather than scored zero.
pub fn rank(index: &PatternIndex, terms: &[String], params: &RankingBm25) -> Vec<ScoredDoc> {
	let lexical = index.lexical();
	let doc_count = lexical.doc_count() as f32;
	let avg_doc_length = lexical.avg_doc_length();
	let mut scores: HashMap<u32, f32> = HashMap::new();

	for term in terms {
		let postings = lexical.postings(term);

		if postings.is_empty() {
			continue;
		}

		let df = postings.len() as f32;
		let idf = (1.0 + (doc_count - df + 0.5) / (df + 0.5)).ln();

		for posting in postings {
			let length_ratio = if avg_doc_length > 0.0 {
				lexical.doc_length(posting.doc) / avg_doc_length
			} else {
				1.0
			};
			let norm = 1.0 - params.b + params.b * length_ratio;
			let tf = posting.tf;
			let term_score = idf * (tf * (params.k1 + 1.0)) / (tf + params.k1 * norm);

			*scores.entry(posting.doc).or_insert(0.0) += term_score;
		}
	}

	let mut hits: Vec<ScoredDoc> = scores
		.into_iter()
		.filter(|(_, score)| score.is_finite() && *score > 0.0)
		.map(|(doc, score)| ScoredDoc { doc: doc as usize, score })
		.collect();

	fusion::sort_scored(index, &mut hits);

	hits
}
