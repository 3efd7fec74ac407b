pub mod corpus;
pub mod handle;
pub mod lexical;
pub mod snapshot;
pub mod vectors;

mod error;

pub use corpus::PatternRecord;
pub use error::{Error, Result};
pub use handle::IndexHandle;
pub use lexical::{LexicalIndex, Posting};
pub use snapshot::{IndexBuild, PatternIndex};
pub use vectors::EmbeddingMatrix;
