use std::{cmp::Ordering, collections::BTreeSet};

use ndarray::{Array1, ArrayView1, Axis};

use qgraph_store::EmbeddingsView;

/// How the full item set is reduced to the candidates that become graph nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
	/// Keep the `top_n` items with the best score over all queries.
	GlobalTop { top_n: i64 },
	/// Union of every query's `per_query_n` best items, capped at `top_n` when `top_n > 0`.
	PerQueryUnion { per_query_n: i64, top_n: i64 },
}
impl SelectionPolicy {
	pub fn from_knobs(top_n: i64, per_query_n: i64) -> Self {
		if per_query_n > 0 {
			Self::PerQueryUnion { per_query_n, top_n }
		} else {
			Self::GlobalTop { top_n }
		}
	}
}

/// Selects candidate rows of `sim` (items by queries) and returns them sorted by item index.
///
/// Ties at a selection boundary go to the lower item index.
pub fn select_candidates(sim: EmbeddingsView<'_>, policy: SelectionPolicy) -> Vec<usize> {
	let n_items = sim.nrows();

	if n_items == 0 {
		return Vec::new();
	}

	let mut chosen = match policy {
		SelectionPolicy::GlobalTop { top_n } => {
			let scores = sim.map_axis(Axis(1), best_score);

			top_k_indices(scores.view(), clamp_count(top_n, n_items))
		},
		SelectionPolicy::PerQueryUnion { per_query_n, top_n } => {
			let per_query_n = clamp_count(per_query_n, n_items);
			let mut union = BTreeSet::new();

			for column in sim.columns() {
				union.extend(top_k_indices(column, per_query_n));
			}

			let union: Vec<usize> = union.into_iter().collect();
			let cap = usize::try_from(top_n).unwrap_or(0);

			if cap > 0 && union.len() > cap {
				// Positions follow ascending item index, so position ties match index ties.
				let scores: Array1<f32> =
					union.iter().map(|&item| best_score(sim.row(item))).collect();

				top_k_indices(scores.view(), cap).into_iter().map(|pos| union[pos]).collect()
			} else {
				union
			}
		},
	};

	chosen.sort_unstable();

	chosen
}

/// Clamps a requested count into `[1, available]`. Returns zero only when nothing is available.
pub fn clamp_count(requested: i64, available: usize) -> usize {
	if available == 0 {
		return 0;
	}

	usize::try_from(requested).unwrap_or(0).clamp(1, available)
}

pub(crate) fn best_score(scores: ArrayView1<'_, f32>) -> f32 {
	scores.fold(f32::NEG_INFINITY, |best, &score| best.max(score))
}

/// Indices of the `k` highest scores, in unspecified order.
pub(crate) fn top_k_indices(scores: ArrayView1<'_, f32>, k: usize) -> Vec<usize> {
	let k = k.min(scores.len());

	if k == 0 {
		return Vec::new();
	}

	let mut order: Vec<usize> = (0..scores.len()).collect();

	if k < order.len() {
		order.select_nth_unstable_by(k - 1, |&a, &b| rank_order(scores, a, b));
		order.truncate(k);
	}

	order
}

/// Score descending, then index ascending. Total over distinct indices, so partial selection is
/// deterministic.
pub(crate) fn rank_order(scores: ArrayView1<'_, f32>, a: usize, b: usize) -> Ordering {
	scores[b].total_cmp(&scores[a]).then(a.cmp(&b))
}
