use qgraph_store::{Embeddings, EmbeddingsView};

use crate::{Error, Result};

/// Item-by-query cosine similarity, `items * queries^T`.
///
/// Both inputs must already hold unit-length rows; nothing is re-normalized here.
pub fn project(items: EmbeddingsView<'_>, queries: EmbeddingsView<'_>) -> Result<Embeddings> {
	if items.ncols() != queries.ncols() {
		return Err(Error::Corpus {
			message: format!(
				"Query vectors have {} dimensions; the corpus uses {}.",
				queries.ncols(),
				items.ncols()
			),
		});
	}

	Ok(items.dot(&queries.t()))
}
