pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Corpus error: {message}")]
	Corpus { message: String },
}
impl From<qgraph_providers::Error> for Error {
	fn from(err: qgraph_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<qgraph_store::Error> for Error {
	fn from(err: qgraph_store::Error) -> Self {
		Self::Corpus { message: err.to_string() }
	}
}
