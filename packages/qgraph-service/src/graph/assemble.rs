use std::collections::BTreeMap;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use qgraph_store::{Corpus, EmbeddingsView};

use crate::graph::neighbors::NeighborGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
	Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: NodeKind,
	pub path: String,
	/// Index into the request's query list.
	pub winner: usize,
	pub max_similarity: f32,
	/// Raw item-query similarity keyed by query string.
	pub scores: BTreeMap<String, f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	pub source: String,
	pub target: String,
	pub weight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMeta {
	pub total_images: usize,
	pub returned_images: usize,
	pub returned_edges: usize,
	pub k_neighbors: usize,
	pub min_img_sim: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphResponse {
	pub queries: Vec<String>,
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	pub meta: GraphMeta,
}

pub fn node_id(item: usize) -> String {
	format!("img_{item}")
}

/// Highest-scoring query and its score. Ties go to the lowest query index.
pub fn winning_query(scores: ArrayView1<'_, f32>) -> (usize, f32) {
	let mut winner = 0;
	let mut best = f32::NEG_INFINITY;

	for (index, &score) in scores.iter().enumerate() {
		if index == 0 || score > best {
			winner = index;
			best = score;
		}
	}

	(winner, best)
}

/// Packages candidates, their raw profiles, and the neighbor edges into the response payload.
pub fn assemble(
	corpus: &Corpus,
	queries: Vec<String>,
	candidates: &[usize],
	profiles: EmbeddingsView<'_>,
	neighbors: NeighborGraph,
	min_img_sim: f32,
) -> GraphResponse {
	let nodes: Vec<Node> = candidates
		.iter()
		.enumerate()
		.map(|(row, &item)| {
			let scores = profiles.row(row);
			let (winner, max_similarity) = winning_query(scores);

			Node {
				id: node_id(item),
				kind: NodeKind::Image,
				path: corpus.path(item).to_string(),
				winner,
				max_similarity,
				scores: queries.iter().cloned().zip(scores.iter().copied()).collect(),
			}
		})
		.collect();
	let edges: Vec<Edge> = neighbors
		.edges
		.iter()
		.map(|edge| Edge {
			source: node_id(edge.source),
			target: node_id(edge.target),
			weight: edge.weight,
		})
		.collect();
	let meta = GraphMeta {
		total_images: corpus.len(),
		returned_images: nodes.len(),
		returned_edges: edges.len(),
		k_neighbors: neighbors.k_neighbors,
		min_img_sim,
	};

	GraphResponse { queries, nodes, edges, meta }
}
