use std::collections::HashMap;

use time::OffsetDateTime;

use crate::{EmbeddingMatrix, Error, LexicalIndex, Result, corpus};
use motif_config::Bm25FieldWeights;
use motif_domain::Pattern;

pub struct IndexBuild<'a> {
	pub version: u64,
	pub patterns: Vec<Pattern>,
	/// One vector per pattern, in the same order.
	pub embeddings: Vec<Vec<f32>>,
	pub dimensions: usize,
	pub field_weights: &'a Bm25FieldWeights,
}

/// Read-only view of the pattern corpus used to serve queries.
///
/// Built once, never mutated. A rebuild produces a new snapshot that replaces this one through
/// [`crate::IndexHandle`].
#[derive(Debug)]
pub struct PatternIndex {
	version: u64,
	fingerprint: String,
	loaded_at: OffsetDateTime,
	patterns: Vec<Pattern>,
	by_id: HashMap<String, usize>,
	lexical: LexicalIndex,
	vectors: EmbeddingMatrix,
}
impl PatternIndex {
	pub fn build(args: IndexBuild<'_>) -> Result<Self> {
		let IndexBuild { version, patterns, embeddings, dimensions, field_weights } = args;

		if embeddings.len() != patterns.len() {
			return Err(Error::InvalidPattern {
				message: format!(
					"Got {} embeddings for {} patterns.",
					embeddings.len(),
					patterns.len()
				),
			});
		}

		let mut by_id = HashMap::with_capacity(patterns.len());

		for (doc, pattern) in patterns.iter().enumerate() {
			if by_id.insert(pattern.id.clone(), doc).is_some() {
				return Err(Error::DuplicatePatternId { id: pattern.id.clone() });
			}
		}

		let ids: Vec<&str> = patterns.iter().map(|pattern| pattern.id.as_str()).collect();
		let vectors = EmbeddingMatrix::build(&ids, embeddings, dimensions)?;
		let lexical = LexicalIndex::build(&patterns, field_weights);
		let fingerprint = corpus::fingerprint(&patterns);

		tracing::debug!(
			version,
			patterns = patterns.len(),
			terms = lexical.term_count(),
			dimensions,
			"Pattern index built."
		);

		Ok(Self {
			version,
			fingerprint,
			loaded_at: OffsetDateTime::now_utc(),
			patterns,
			by_id,
			lexical,
			vectors,
		})
	}

	pub fn version(&self) -> u64 {
		self.version
	}

	pub fn fingerprint(&self) -> &str {
		&self.fingerprint
	}

	pub fn loaded_at(&self) -> OffsetDateTime {
		self.loaded_at
	}

	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}

	pub fn patterns(&self) -> &[Pattern] {
		&self.patterns
	}

	pub fn pattern(&self, doc: usize) -> Option<&Pattern> {
		self.patterns.get(doc)
	}

	pub fn get(&self, id: &str) -> Option<&Pattern> {
		self.by_id.get(id).and_then(|doc| self.patterns.get(*doc))
	}

	pub fn lexical(&self) -> &LexicalIndex {
		&self.lexical
	}

	pub fn vectors(&self) -> &EmbeddingMatrix {
		&self.vectors
	}
}
