use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub security: Security,
	pub corpus: Corpus,
	pub providers: Providers,
	pub graph: Graph,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	#[serde(default)]
	pub cors_allow_any_origin: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Corpus {
	/// JSON array of `{ "image_path", "image_embedding" }` records.
	pub path: PathBuf,
	pub vector_dim: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub encoder: EncoderProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncoderProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// Empty disables the Authorization header, for local encoders.
	#[serde(default)]
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Graph {
	#[serde(default = "default_top_n")]
	pub default_top_n: u32,
	#[serde(default)]
	pub default_per_query_n: u32,
	#[serde(default = "default_min_img_sim")]
	pub default_min_img_sim: f32,
	#[serde(default = "default_k_neighbors")]
	pub default_k_neighbors: u32,
	#[serde(default)]
	pub profile_normalization: ProfileNormalization,
	#[serde(default = "default_max_queries")]
	pub max_queries: u32,
}
impl Default for Graph {
	fn default() -> Self {
		Self {
			default_top_n: default_top_n(),
			default_per_query_n: 0,
			default_min_img_sim: default_min_img_sim(),
			default_k_neighbors: default_k_neighbors(),
			profile_normalization: ProfileNormalization::default(),
			max_queries: default_max_queries(),
		}
	}
}

/// How candidate query-score profiles are projected before neighbor search.
///
/// `L2` divides each profile by its Euclidean norm. `Standardized` first z-scores every query
/// column over the candidate set, so queries with a higher baseline similarity stop dominating
/// the neighbor metric, and then L2-normalizes the rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileNormalization {
	#[default]
	L2,
	Standardized,
}

fn default_top_n() -> u32 {
	400
}

fn default_min_img_sim() -> f32 {
	0.2
}

fn default_k_neighbors() -> u32 {
	6
}

fn default_max_queries() -> u32 {
	64
}
