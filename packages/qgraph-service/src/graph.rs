pub mod assemble;
pub mod neighbors;
pub mod profile;
pub mod selection;
pub mod similarity;

pub use assemble::{Edge, GraphMeta, GraphResponse, Node, NodeKind};

use std::collections::HashSet;

use serde::Deserialize;

use qgraph_config::ProfileNormalization;
use qgraph_store::{Corpus, Embeddings, EmbeddingsView, embedding};

use crate::{Error, GraphService, Result, graph::selection::SelectionPolicy};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphRequest {
	#[serde(default, deserialize_with = "crate::request_serde::queries")]
	pub queries: Vec<String>,
	#[serde(default, deserialize_with = "crate::request_serde::int_knob")]
	pub top_n: Option<i64>,
	#[serde(default, deserialize_with = "crate::request_serde::int_knob")]
	pub per_query_n: Option<i64>,
	#[serde(default, deserialize_with = "crate::request_serde::float_knob")]
	pub min_img_sim: Option<f32>,
	#[serde(default, deserialize_with = "crate::request_serde::int_knob")]
	pub k_neighbors: Option<i64>,
}

/// Tuning knobs for one graph build, after request values and config defaults are merged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphParams {
	pub top_n: i64,
	pub per_query_n: i64,
	pub min_img_sim: f32,
	pub k_neighbors: i64,
	pub normalization: ProfileNormalization,
}
impl GraphParams {
	pub fn resolve(req: &GraphRequest, cfg: &qgraph_config::Graph) -> Self {
		Self {
			top_n: req.top_n.unwrap_or(i64::from(cfg.default_top_n)),
			per_query_n: req.per_query_n.unwrap_or(i64::from(cfg.default_per_query_n)),
			min_img_sim: req.min_img_sim.unwrap_or(cfg.default_min_img_sim),
			k_neighbors: req.k_neighbors.unwrap_or(i64::from(cfg.default_k_neighbors)),
			normalization: cfg.profile_normalization,
		}
	}
}

impl GraphService {
	pub async fn graph(&self, req: GraphRequest) -> Result<GraphResponse> {
		validate_queries(&req.queries, self.cfg.graph.max_queries as usize)?;

		let params = GraphParams::resolve(&req, &self.cfg.graph);

		if !params.min_img_sim.is_finite() {
			return Err(Error::InvalidRequest {
				message: "min_img_sim must be a finite number".to_string(),
			});
		}

		let query_vectors = self.encode_queries(&req.queries).await?;
		let response = build_graph(&self.corpus, req.queries, query_vectors.view(), &params)?;

		tracing::info!(
			queries = response.queries.len(),
			returned_images = response.meta.returned_images,
			returned_edges = response.meta.returned_edges,
			k_neighbors = response.meta.k_neighbors,
			"Graph built."
		);

		Ok(response)
	}

	async fn encode_queries(&self, queries: &[String]) -> Result<Embeddings> {
		let vectors = self
			.encoder
			.encode(&self.cfg.providers.encoder, queries)
			.await
			.inspect_err(|err| tracing::warn!(error = %err, "Query encoding failed."))?;

		if vectors.len() != queries.len() {
			return Err(Error::Provider {
				message: format!(
					"Encoder returned {} vectors for {} queries.",
					vectors.len(),
					queries.len()
				),
			});
		}
		if let Some(vector) = vectors.iter().find(|vector| vector.len() != self.corpus.dim()) {
			return Err(Error::Provider {
				message: format!(
					"Encoder returned a {}-dimensional vector; the corpus uses {}.",
					vector.len(),
					self.corpus.dim()
				),
			});
		}

		let mut matrix = embedding::from_rows(vectors)
			.map_err(|err| Error::Provider { message: err.to_string() })?;

		if !embedding::all_finite(&matrix) {
			return Err(Error::Provider {
				message: "Encoder returned non-finite values.".to_string(),
			});
		}

		embedding::normalize_rows(&mut matrix);

		Ok(matrix)
	}
}

/// Runs the full pipeline over an already encoded query set.
///
/// `query_vectors` must hold one unit-length row per query, in the same space as the corpus.
pub fn build_graph(
	corpus: &Corpus,
	queries: Vec<String>,
	query_vectors: EmbeddingsView<'_>,
	params: &GraphParams,
) -> Result<GraphResponse> {
	let sim = similarity::project(corpus.embeddings().view(), query_vectors)?;
	let policy = SelectionPolicy::from_knobs(params.top_n, params.per_query_n);
	let candidates = selection::select_candidates(sim.view(), policy);
	let profiles = profile::profile_rows(sim.view(), &candidates);
	let projected = profile::project_profiles(profiles.view(), params.normalization);
	let neighbors = neighbors::build_neighbor_graph(
		projected.view(),
		&candidates,
		params.k_neighbors,
		params.min_img_sim,
	);

	Ok(assemble::assemble(
		corpus,
		queries,
		&candidates,
		profiles.view(),
		neighbors,
		params.min_img_sim,
	))
}

fn validate_queries(queries: &[String], max_queries: usize) -> Result<()> {
	if queries.is_empty() {
		return Err(Error::InvalidRequest { message: "queries required".to_string() });
	}
	if queries.len() > max_queries {
		return Err(Error::InvalidRequest {
			message: format!("queries must contain at most {max_queries} entries"),
		});
	}
	if let Some(index) = queries.iter().position(|query| query.is_empty()) {
		return Err(Error::InvalidRequest {
			message: format!("queries[{index}] must be a non-empty string"),
		});
	}

	let mut seen = HashSet::with_capacity(queries.len());

	if let Some(duplicate) = queries.iter().find(|query| !seen.insert(query.as_str())) {
		return Err(Error::InvalidRequest {
			message: format!("queries must be unique; {duplicate:?} appears more than once"),
		});
	}

	Ok(())
}
