use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;

use crate::{Error, MotifService, Result};
use motif_index::{IndexBuild, PatternIndex, PatternRecord, corpus};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReloadReport {
	pub version: u64,
	pub pattern_count: usize,
	/// Records embedded during this build.
	pub embedded_count: usize,
	/// Records that carried a precomputed vector.
	pub reused_count: usize,
	pub fingerprint: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexStatus {
	pub ready: bool,
	pub version: Option<u64>,
	pub pattern_count: usize,
	pub fingerprint: Option<String>,
	pub loaded_at: Option<String>,
}

impl MotifService {
	/// Reads the corpus at `library.path` and swaps in a freshly built index.
	///
	/// On any failure the previous snapshot stays live.
	pub async fn reload_index(&self) -> Result<ReloadReport> {
		let records = corpus::load(&self.cfg.library.path)?;

		self.load_patterns(records).await
	}

	/// Builds and installs an index from `records`, embedding those without a vector.
	pub async fn load_patterns(&self, records: Vec<PatternRecord>) -> Result<ReloadReport> {
		corpus::validate(&records)?;

		if records.is_empty() {
			tracing::warn!("Pattern corpus is empty. Searches will fail until it is reloaded.");
		}

		let version = self.index().next_version();
		let reused_count = records.iter().filter(|record| record.embedding.is_some()).count();
		let embeddings = self.embed_records(&records).await?;
		let patterns = records.into_iter().map(|record| record.pattern).collect();
		let dimensions = self.cfg.providers.embedding.dimensions as usize;
		let field_weights = self.cfg.ranking.bm25.fields.clone();
		let index = tokio::task::spawn_blocking(move || {
			PatternIndex::build(IndexBuild {
				version,
				patterns,
				embeddings,
				dimensions,
				field_weights: &field_weights,
			})
		})
		.await
		.map_err(|err| Error::Index { message: format!("Index build task failed: {err}") })??;
		let report = ReloadReport {
			version,
			pattern_count: index.len(),
			embedded_count: index.len() - reused_count,
			reused_count,
			fingerprint: index.fingerprint().to_string(),
		};

		self.index().install(index)?;

		tracing::info!(
			version,
			patterns = report.pattern_count,
			embedded = report.embedded_count,
			reused = report.reused_count,
			"Pattern library loaded."
		);

		Ok(report)
	}

	pub fn index_status(&self) -> IndexStatus {
		let Some(index) = self.index().snapshot() else {
			return IndexStatus {
				ready: false,
				version: None,
				pattern_count: 0,
				fingerprint: None,
				loaded_at: None,
			};
		};

		IndexStatus {
			ready: true,
			version: Some(index.version()),
			pattern_count: index.len(),
			fingerprint: Some(index.fingerprint().to_string()),
			loaded_at: index.loaded_at().format(&Rfc3339).ok(),
		}
	}

	/// One vector per record, in record order. Missing vectors are requested in batches of
	/// `library.embed_batch_size`, each batch under the provider timeout.
	async fn embed_records(&self, records: &[PatternRecord]) -> Result<Vec<Vec<f32>>> {
		let cfg = &self.cfg.providers.embedding;
		let batch_size = self.cfg.library.embed_batch_size.max(1) as usize;
		let timeout = Duration::from_millis(cfg.timeout_ms);
		let pending: Vec<(usize, String)> = records
			.iter()
			.enumerate()
			.filter(|(_, record)| record.embedding.is_none())
			.map(|(position, record)| (position, record.pattern.embedding_text()))
			.collect();
		let mut out: Vec<Vec<f32>> =
			records.iter().map(|record| record.embedding.clone().unwrap_or_default()).collect();

		for batch in pending.chunks(batch_size) {
			let texts: Vec<String> = batch.iter().map(|(_, text)| text.clone()).collect();
			let vectors =
				match tokio::time::timeout(timeout, self.providers.embedding.embed(cfg, &texts))
					.await
				{
					Ok(result) => result?,
					Err(_) =>
						return Err(Error::Provider {
							message: format!(
								"Embedding provider timed out after {} ms.",
								cfg.timeout_ms
							),
						}),
				};

			if vectors.len() != batch.len() {
				return Err(Error::Provider {
					message: format!(
						"Embedding provider returned {} vectors for {} texts.",
						vectors.len(),
						batch.len()
					),
				});
			}

			for ((position, _), vector) in batch.iter().zip(vectors) {
				out[*position] = vector;
			}
		}

		Ok(out)
	}
}
