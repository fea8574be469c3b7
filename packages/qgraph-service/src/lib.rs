pub mod graph;
pub mod request_serde;

mod error;

pub use error::{Error, Result};
pub use graph::{
	Edge, GraphMeta, GraphParams, GraphRequest, GraphResponse, Node, NodeKind, build_graph,
};

use std::{future::Future, pin::Pin, sync::Arc};

use qgraph_config::{Config, EncoderProviderConfig};
use qgraph_providers::encoder;
use qgraph_store::Corpus;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Turns query strings into vectors in the corpus embedding space.
///
/// Implementations own their concurrency discipline; the service calls `encode` once per
/// request and never retries.
pub trait TextEncoder
where
	Self: Send + Sync,
{
	fn encode<'a>(
		&'a self,
		cfg: &'a EncoderProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub struct GraphService {
	pub cfg: Config,
	pub corpus: Arc<Corpus>,
	pub encoder: Arc<dyn TextEncoder>,
}
impl GraphService {
	pub fn new(cfg: Config, corpus: Arc<Corpus>) -> Self {
		Self::with_encoder(cfg, corpus, Arc::new(HttpEncoder))
	}

	pub fn with_encoder(cfg: Config, corpus: Arc<Corpus>, encoder: Arc<dyn TextEncoder>) -> Self {
		Self { cfg, corpus, encoder }
	}
}

struct HttpEncoder;
impl TextEncoder for HttpEncoder {
	fn encode<'a>(
		&'a self,
		cfg: &'a EncoderProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(encoder::encode(cfg, texts).await?) })
	}
}
