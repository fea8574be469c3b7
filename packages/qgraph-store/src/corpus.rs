use std::{fs::File, io::BufReader, path::Path};

use serde::Deserialize;

use crate::{
	Error, Result,
	embedding::{self, Embeddings},
};

#[derive(Debug, Deserialize)]
struct CorpusRecord {
	#[serde(alias = "path")]
	image_path: String,
	#[serde(alias = "embedding")]
	image_embedding: Vec<f32>,
}

/// The embedding store: unit-length item embeddings paired with their display paths.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Corpus {
	embeddings: Embeddings,
	paths: Vec<String>,
}
impl Corpus {
	/// Reads a JSON array of `{ "image_path", "image_embedding" }` records.
	pub fn load(path: &Path) -> Result<Self> {
		let file =
			File::open(path).map_err(|err| Error::ReadCorpus { path: path.to_path_buf(), source: err })?;
		let records: Vec<CorpusRecord> = serde_json::from_reader(BufReader::new(file))
			.map_err(|err| Error::ParseCorpus { path: path.to_path_buf(), source: err })?;
		let mut paths = Vec::with_capacity(records.len());
		let mut rows = Vec::with_capacity(records.len());

		for record in records {
			paths.push(record.image_path);
			rows.push(record.image_embedding);
		}

		let corpus = Self::new(embedding::from_rows(rows)?, paths)?;

		tracing::info!(
			path = %path.display(),
			items = corpus.len(),
			dim = corpus.dim(),
			"Corpus loaded."
		);

		Ok(corpus)
	}

	/// Validates the pairing and L2-normalizes every embedding row.
	pub fn new(mut embeddings: Embeddings, paths: Vec<String>) -> Result<Self> {
		if embeddings.nrows() != paths.len() {
			return Err(Error::InvalidCorpus {
				message: format!(
					"Corpus has {} embeddings but {} paths.",
					embeddings.nrows(),
					paths.len()
				),
			});
		}
		if embeddings.nrows() == 0 {
			return Err(Error::InvalidCorpus {
				message: "Corpus must contain at least one item.".to_string(),
			});
		}
		if embeddings.ncols() == 0 {
			return Err(Error::InvalidCorpus {
				message: "Corpus embeddings must have at least one dimension.".to_string(),
			});
		}
		if !embedding::all_finite(&embeddings) {
			return Err(Error::InvalidCorpus {
				message: "Corpus embeddings must be finite numbers.".to_string(),
			});
		}

		embedding::normalize_rows(&mut embeddings);

		Ok(Self { embeddings, paths })
	}

	pub fn len(&self) -> usize {
		self.paths.len()
	}

	pub fn is_empty(&self) -> bool {
		self.paths.is_empty()
	}

	pub fn dim(&self) -> usize {
		self.embeddings.ncols()
	}

	pub fn embeddings(&self) -> &Embeddings {
		&self.embeddings
	}

	pub fn path(&self, index: usize) -> &str {
		&self.paths[index]
	}

	pub fn ensure_dim(&self, expected: usize) -> Result<()> {
		if self.dim() != expected {
			return Err(Error::DimensionMismatch { expected, actual: self.dim() });
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use ndarray::{Array2, array};

	use super::*;

	#[test]
	fn new_normalizes_rows() {
		let corpus = Corpus::new(
			array![[2.0, 0.0], [1.0, 1.0]],
			vec!["a.jpg".to_string(), "b.jpg".to_string()],
		)
		.expect("Corpus must build.");

		assert_eq!(corpus.embeddings().row(0).to_vec(), vec![1.0, 0.0]);
		assert!((corpus.embeddings()[[1, 0]] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
		assert_eq!(corpus.path(1), "b.jpg");
	}

	#[test]
	fn new_rejects_mismatched_paths() {
		let err = Corpus::new(array![[1.0]], Vec::new()).expect_err("Expected pairing error.");

		assert!(err.to_string().contains("1 embeddings but 0 paths"), "Unexpected error: {err}");
	}

	#[test]
	fn new_rejects_empty_corpus() {
		let err =
			Corpus::new(Array2::zeros((0, 0)), Vec::new()).expect_err("Expected empty error.");

		assert!(err.to_string().contains("at least one item"), "Unexpected error: {err}");
	}

	#[test]
	fn new_rejects_non_finite_values() {
		assert!(Corpus::new(array![[f32::NAN, 1.0]], vec!["a.jpg".to_string()]).is_err());
	}
}
