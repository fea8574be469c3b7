use ndarray::{Array2, Axis};

use qgraph_config::ProfileNormalization;
use qgraph_store::{
	Embeddings, EmbeddingsView,
	embedding::{self, NORM_EPSILON},
};

/// Candidate rows of the similarity matrix: how each candidate responds to every query.
pub fn profile_rows(sim: EmbeddingsView<'_>, candidates: &[usize]) -> Embeddings {
	if candidates.is_empty() {
		return Array2::zeros((0, sim.ncols()));
	}

	sim.select(Axis(0), candidates)
}

/// Projects profiles into the space used for neighbor search. Rows of the result are unit
/// length, or zero for degenerate profiles.
pub fn project_profiles(
	profiles: EmbeddingsView<'_>,
	normalization: ProfileNormalization,
) -> Embeddings {
	let mut projected = match normalization {
		ProfileNormalization::L2 => profiles.to_owned(),
		ProfileNormalization::Standardized => standardize_columns(profiles),
	};

	embedding::normalize_rows(&mut projected);

	projected
}

/// Population z-score per query column over the candidate set.
fn standardize_columns(profiles: EmbeddingsView<'_>) -> Embeddings {
	// f64 keeps constant columns at exactly zero.
	let values = profiles.mapv(f64::from);
	let Some(mean) = values.mean_axis(Axis(0)) else {
		return profiles.to_owned();
	};
	let scale = values.std_axis(Axis(0), 0.0) + f64::from(NORM_EPSILON);

	((values - &mean) / &scale).mapv(|value| value as f32)
}
