mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Corpus, EncoderProviderConfig, Graph, ProfileNormalization, Providers, Security,
	Service,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.corpus.path.as_os_str().is_empty() {
		return Err(Error::Validation { message: "corpus.path must be non-empty.".to_string() });
	}
	if cfg.corpus.vector_dim == 0 {
		return Err(Error::Validation {
			message: "corpus.vector_dim must be greater than zero.".to_string(),
		});
	}

	let encoder = &cfg.providers.encoder;

	if encoder.dimensions != cfg.corpus.vector_dim {
		return Err(Error::Validation {
			message: "providers.encoder.dimensions must match corpus.vector_dim.".to_string(),
		});
	}
	if encoder.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.encoder.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if encoder.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.encoder.api_base must be non-empty.".to_string(),
		});
	}
	if encoder.default_headers.values().any(|value| !value.is_string()) {
		return Err(Error::Validation {
			message: "providers.encoder.default_headers values must be strings.".to_string(),
		});
	}

	let graph = &cfg.graph;

	if graph.default_top_n == 0 {
		return Err(Error::Validation {
			message: "graph.default_top_n must be greater than zero.".to_string(),
		});
	}
	if graph.default_k_neighbors == 0 {
		return Err(Error::Validation {
			message: "graph.default_k_neighbors must be greater than zero.".to_string(),
		});
	}
	if !graph.default_min_img_sim.is_finite() {
		return Err(Error::Validation {
			message: "graph.default_min_img_sim must be a finite number.".to_string(),
		});
	}
	if graph.max_queries == 0 {
		return Err(Error::Validation {
			message: "graph.max_queries must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.providers.encoder.api_key.trim().is_empty() {
		cfg.providers.encoder.api_key.clear();
	}
}
