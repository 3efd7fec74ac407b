use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};
use motif_domain::Pattern;

/// One entry of the pattern library as handed over by the external loader.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatternRecord {
	#[serde(flatten)]
	pub pattern: Pattern,
	/// Precomputed vector. Records without one are embedded during the build.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub embedding: Option<Vec<f32>>,
}
impl From<Pattern> for PatternRecord {
	fn from(pattern: Pattern) -> Self {
		Self { pattern, embedding: None }
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
	List(Vec<PatternRecord>),
	Wrapped { patterns: Vec<PatternRecord> },
}

pub fn load(path: &Path) -> Result<Vec<PatternRecord>> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadCorpus { path: path.to_path_buf(), source: err })?;
	let file: CorpusFile = serde_json::from_str(&raw)
		.map_err(|err| Error::ParseCorpus { path: path.to_path_buf(), source: err })?;
	let records = match file {
		CorpusFile::List(records) => records,
		CorpusFile::Wrapped { patterns } => patterns,
	};

	validate(&records)?;

	Ok(records)
}

pub fn validate(records: &[PatternRecord]) -> Result<()> {
	let mut seen = HashSet::with_capacity(records.len());

	for record in records {
		let pattern = &record.pattern;

		if pattern.id.trim().is_empty() {
			return Err(Error::InvalidPattern { message: "Pattern id must be non-empty.".to_string() });
		}
		if pattern.name.trim().is_empty() {
			return Err(Error::InvalidPattern {
				message: format!("Pattern {:?} must have a non-empty name.", pattern.id),
			});
		}
		if !seen.insert(pattern.id.as_str()) {
			return Err(Error::DuplicatePatternId { id: pattern.id.clone() });
		}
	}

	Ok(())
}

/// Content hash of the corpus. Stable for identical pattern content in identical order.
pub fn fingerprint(patterns: &[Pattern]) -> String {
	let mut hasher = blake3::Hasher::new();

	for pattern in patterns {
		for field in [
			&pattern.id,
			&pattern.name,
			&pattern.category,
			&pattern.framework,
			&pattern.library,
			&pattern.code,
		] {
			hash_str(&mut hasher, field);
		}

		match pattern.metadata.as_ref() {
			Some(meta) => {
				hasher.update(&[1]);

				for list in [&meta.props, &meta.variants, &meta.a11y] {
					hasher.update(&(list.len() as u64).to_le_bytes());

					for term in list {
						hash_str(&mut hasher, term);
					}
				}

				hash_str(&mut hasher, &meta.description);
			},
			None => {
				hasher.update(&[0]);
			},
		}
	}

	hasher.finalize().to_hex().to_string()
}

fn hash_str(hasher: &mut blake3::Hasher, value: &str) {
	hasher.update(&(value.len() as u64).to_le_bytes());
	hasher.update(value.as_bytes());
}
