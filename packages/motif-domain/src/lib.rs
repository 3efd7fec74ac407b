pub mod pattern;
pub mod requirements;
pub mod text;

mod error;

pub use error::{Error, Result};
pub use pattern::{Pattern, PatternMetadata};
pub use requirements::Requirements;
