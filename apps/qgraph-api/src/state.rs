use std::sync::Arc;

use color_eyre::eyre;

use qgraph_service::GraphService;
use qgraph_store::Corpus;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<GraphService>,
}
impl AppState {
	/// Loads the corpus named by the config and wires the HTTP text encoder.
	pub fn new(config: qgraph_config::Config) -> color_eyre::Result<Self> {
		let corpus = Corpus::load(&config.corpus.path)?;

		corpus.ensure_dim(config.corpus.vector_dim as usize).map_err(|err| {
			eyre::eyre!("Corpus at {:?} does not match corpus.vector_dim: {err}", config.corpus.path)
		})?;

		Ok(Self::from_service(GraphService::new(config, Arc::new(corpus))))
	}

	pub fn from_service(service: GraphService) -> Self {
		Self { service: Arc::new(service) }
	}

	pub fn cors_allow_any_origin(&self) -> bool {
		self.service.cfg.security.cors_allow_any_origin
	}
}
