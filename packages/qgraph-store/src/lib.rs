pub mod corpus;
pub mod embedding;

mod error;

pub use corpus::Corpus;
pub use embedding::{Embeddings, EmbeddingsView};
pub use error::{Error, Result};
