use std::collections::HashSet;

use qgraph_store::{Embeddings, EmbeddingsView};

use crate::graph::selection::{clamp_count, rank_order, top_k_indices};

/// Undirected edge between two items, keyed by item index with `source < target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborEdge {
	pub source: usize,
	pub target: usize,
	pub weight: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighborGraph {
	pub edges: Vec<NeighborEdge>,
	/// Neighbors actually sought per candidate after clamping.
	pub k_neighbors: usize,
}

/// Clamps `k` into `[1, candidates - 1]`; zero when there is no possible partner.
pub fn effective_k(requested: i64, candidates: usize) -> usize {
	if candidates <= 1 {
		return 0;
	}

	clamp_count(requested, candidates - 1)
}

/// `projected * projected^T` with the diagonal set to negative infinity.
pub fn pairwise_similarity(projected: EmbeddingsView<'_>) -> Embeddings {
	let mut similarity = projected.dot(&projected.t());

	similarity.diag_mut().fill(f32::NEG_INFINITY);

	similarity
}

/// Builds the thresholded k-NN edge set over `candidates`.
///
/// `projected` row `r` belongs to item `candidates[r]`. Edges come out in discovery order: rows
/// in candidate order, each row's partners by descending similarity. A pair reached again from
/// the other endpoint is dropped.
pub fn build_neighbor_graph(
	projected: EmbeddingsView<'_>,
	candidates: &[usize],
	k_neighbors: i64,
	min_similarity: f32,
) -> NeighborGraph {
	let k = effective_k(k_neighbors, candidates.len());

	if k == 0 {
		return NeighborGraph { edges: Vec::new(), k_neighbors: 0 };
	}

	let similarity = pairwise_similarity(projected);
	let mut seen: HashSet<(usize, usize)> = HashSet::new();
	let mut edges = Vec::new();

	for (a, &item_a) in candidates.iter().enumerate() {
		let row = similarity.row(a);
		let mut partners = top_k_indices(row, k);

		partners.sort_unstable_by(|&x, &y| rank_order(row, x, y));

		for b in partners {
			let weight = row[b];

			if b == a || weight < min_similarity {
				continue;
			}

			let item_b = candidates[b];
			let pair = if item_a < item_b { (item_a, item_b) } else { (item_b, item_a) };

			if !seen.insert(pair) {
				continue;
			}

			edges.push(NeighborEdge { source: pair.0, target: pair.1, weight });
		}
	}

	NeighborGraph { edges, k_neighbors: k }
}
