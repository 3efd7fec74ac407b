use crate::{Error, Result};

/// Row-major matrix of unit-length pattern embeddings. Cosine similarity against a unit query
/// vector is a plain dot product.
#[derive(Clone, Debug, Default)]
pub struct EmbeddingMatrix {
	dimensions: usize,
	rows: usize,
	data: Vec<f32>,
}
impl EmbeddingMatrix {
	/// `ids` label the rows for error reporting and must line up with `vectors`.
	pub fn build(ids: &[&str], vectors: Vec<Vec<f32>>, dimensions: usize) -> Result<Self> {
		let mut data = Vec::with_capacity(vectors.len() * dimensions);

		for (row, vector) in vectors.iter().enumerate() {
			if vector.len() != dimensions {
				return Err(Error::DimensionMismatch {
					pattern_id: ids.get(row).map(|id| id.to_string()).unwrap_or_default(),
					expected: dimensions,
					actual: vector.len(),
				});
			}

			match normalize(vector) {
				Some(unit) => data.extend(unit),
				None => data.extend(std::iter::repeat_n(0.0, dimensions)),
			}
		}

		Ok(Self { dimensions, rows: vectors.len(), data })
	}

	pub fn dimensions(&self) -> usize {
		self.dimensions
	}

	pub fn rows(&self) -> usize {
		self.rows
	}

	pub fn row(&self, row: usize) -> &[f32] {
		let start = row * self.dimensions;

		self.data.get(start..start + self.dimensions).unwrap_or_default()
	}

	/// Cosine similarity of every row against `query`, in row order.
	///
	/// Zero-length vectors on either side score 0.
	pub fn cosine_all(&self, query: &[f32]) -> Vec<f32> {
		let Some(unit) = normalize(query) else { return vec![0.0; self.rows] };

		(0..self.rows).map(|row| dot(self.row(row), &unit).clamp(-1.0, 1.0)).collect()
	}
}

pub fn normalize(vector: &[f32]) -> Option<Vec<f32>> {
	let norm = vector.iter().map(|value| value * value).sum::<f32>().sqrt();

	if !norm.is_finite() || norm <= f32::EPSILON {
		return None;
	}

	Some(vector.iter().map(|value| value / norm).collect())
}

fn dot(lhs: &[f32], rhs: &[f32]) -> f32 {
	lhs.iter().zip(rhs).map(|(l, r)| l * r).sum()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cosine_matches_angle() {
		let vectors = vec![vec![2.0, 0.0], vec![0.0, 3.0], vec![-1.0, 0.0]];
		let matrix = EmbeddingMatrix::build(&["a", "b", "c"], vectors, 2).expect("build failed");
		let scores = matrix.cosine_all(&[1.0, 0.0]);

		assert!((scores[0] - 1.0).abs() < 1e-6);
		assert!(scores[1].abs() < 1e-6);
		assert!((scores[2] + 1.0).abs() < 1e-6);
	}

	#[test]
	fn zero_vectors_score_zero() {
		let matrix = EmbeddingMatrix::build(&["a"], vec![vec![0.0, 0.0]], 2).expect("build failed");

		assert_eq!(matrix.cosine_all(&[1.0, 1.0]), vec![0.0]);
		assert_eq!(matrix.cosine_all(&[0.0, 0.0]), vec![0.0]);
	}

	#[test]
	fn dimension_mismatch_names_the_pattern() {
		let err = EmbeddingMatrix::build(&["a", "b"], vec![vec![1.0, 0.0], vec![1.0]], 2)
			.expect_err("expected mismatch");

		assert!(matches!(
			err,
			Error::DimensionMismatch { pattern_id, actual: 1, .. } if pattern_id == "b"
		));
	}
}
