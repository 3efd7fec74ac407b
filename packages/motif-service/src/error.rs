pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	Validation { message: String },
	#[error("The {retriever} retriever timed out after {timeout_ms} ms.")]
	RetrieverTimeout { retriever: &'static str, timeout_ms: u64 },
	#[error("Retrieval unavailable: {message}")]
	RetrievalUnavailable { message: String },
	#[error("Pattern index is not ready.")]
	IndexNotReady,
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Index error: {message}")]
	Index { message: String },
}
impl From<motif_domain::Error> for Error {
	fn from(err: motif_domain::Error) -> Self {
		Self::Validation { message: err.to_string() }
	}
}

impl From<motif_index::Error> for Error {
	fn from(err: motif_index::Error) -> Self {
		Self::Index { message: err.to_string() }
	}
}

impl From<motif_providers::Error> for Error {
	fn from(err: motif_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
