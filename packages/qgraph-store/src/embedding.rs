//! Dense embedding matrices: one row per item or query, one column per dimension.

use ndarray::{Array2, ArrayView2};

use crate::{Error, Result};

/// Floor applied to norms and standard deviations before dividing by them.
pub const NORM_EPSILON: f32 = 1e-12;

/// Row-major `[items, dim]` matrix.
pub type Embeddings = Array2<f32>;

pub type EmbeddingsView<'a> = ArrayView2<'a, f32>;

/// Stacks equally sized rows. An empty input yields a `0 x 0` matrix.
pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Embeddings> {
	let n_rows = rows.len();
	let cols = rows.first().map(Vec::len).unwrap_or(0);
	let mut data = Vec::with_capacity(n_rows * cols);

	for row in rows {
		if row.len() != cols {
			return Err(Error::DimensionMismatch { expected: cols, actual: row.len() });
		}

		data.extend(row);
	}

	Ok(Array2::from_shape_vec((n_rows, cols), data)?)
}

pub fn all_finite(matrix: &Embeddings) -> bool {
	matrix.iter().all(|value| value.is_finite())
}

/// Scales every row to unit length. Norms below [`NORM_EPSILON`] are floored, so all-zero rows
/// stay zero.
pub fn normalize_rows(matrix: &mut Embeddings) {
	for mut row in matrix.rows_mut() {
		let norm = row.dot(&row).sqrt().max(NORM_EPSILON);

		row /= norm;
	}
}
