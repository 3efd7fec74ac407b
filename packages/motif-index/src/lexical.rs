use std::collections::HashMap;

use motif_config::Bm25FieldWeights;
use motif_domain::{Pattern, text};

/// A document's weighted term frequency for one term.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Posting {
	pub doc: u32,
	pub tf: f32,
}

/// Inverted index with field-weighted (BM25F style) term statistics.
///
/// Each field contributes `weight * count` to a term's frequency and `weight * length` to the
/// document length, so a hit in the name counts for more than a hit in the description.
#[derive(Clone, Debug, Default)]
pub struct LexicalIndex {
	postings: HashMap<String, Vec<Posting>>,
	doc_lengths: Vec<f32>,
	avg_doc_length: f32,
}
impl LexicalIndex {
	pub fn build(patterns: &[Pattern], weights: &Bm25FieldWeights) -> Self {
		let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
		let mut doc_lengths = Vec::with_capacity(patterns.len());

		for (doc, pattern) in patterns.iter().enumerate() {
			let mut tf: HashMap<String, f32> = HashMap::new();
			let mut length = 0.0_f32;

			for (weight, words) in field_words(pattern, weights) {
				if weight <= 0.0 {
					continue;
				}

				length += weight * words.len() as f32;

				for word in words {
					*tf.entry(word).or_insert(0.0) += weight;
				}
			}

			doc_lengths.push(length);

			for (term, freq) in tf {
				postings.entry(term).or_default().push(Posting { doc: doc as u32, tf: freq });
			}
		}

		let total: f32 = doc_lengths.iter().sum();
		let avg_doc_length =
			if doc_lengths.is_empty() { 0.0 } else { total / doc_lengths.len() as f32 };

		Self { postings, doc_lengths, avg_doc_length }
	}

	pub fn postings(&self, term: &str) -> &[Posting] {
		self.postings.get(term).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn doc_count(&self) -> usize {
		self.doc_lengths.len()
	}

	pub fn doc_length(&self, doc: u32) -> f32 {
		self.doc_lengths.get(doc as usize).copied().unwrap_or(0.0)
	}

	pub fn avg_doc_length(&self) -> f32 {
		self.avg_doc_length
	}

	pub fn term_count(&self) -> usize {
		self.postings.len()
	}
}

fn field_words(pattern: &Pattern, weights: &Bm25FieldWeights) -> [(f32, Vec<String>); 7] {
	let list_words =
		|terms: &[String]| -> Vec<String> { terms.iter().flat_map(|term| text::words(term)).collect() };
	let tags = format!("{} {}", pattern.framework, pattern.library);

	[
		(weights.name, text::words(&pattern.name)),
		(weights.category, text::words(&pattern.category)),
		(weights.description, text::words(pattern.description())),
		(weights.props, list_words(pattern.props())),
		(weights.variants, list_words(pattern.variants())),
		(weights.a11y, list_words(pattern.a11y())),
		(weights.tags, text::words(&tags)),
	]
}
