pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid requirements at {field}: {message}")]
	InvalidRequirements { field: String, message: String },
}
impl Error {
	pub(crate) fn requirements(field: &str, message: impl Into<String>) -> Self {
		Self::InvalidRequirements { field: field.to_string(), message: message.into() }
	}
}
