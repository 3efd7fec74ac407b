pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read pattern corpus at {path:?}.")]
	ReadCorpus { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to parse pattern corpus at {path:?}.")]
	ParseCorpus { path: std::path::PathBuf, source: serde_json::Error },
	#[error("Invalid pattern record: {message}")]
	InvalidPattern { message: String },
	#[error("Duplicate pattern id {id:?}.")]
	DuplicatePatternId { id: String },
	#[error("Embedding for pattern {pattern_id:?} has {actual} dimensions; expected {expected}.")]
	DimensionMismatch { pattern_id: String, expected: usize, actual: usize },
	#[error("Index snapshot version {version} is older than the live version {live_version}.")]
	StaleSnapshot { version: u64, live_version: u64 },
}
