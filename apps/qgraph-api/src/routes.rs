use axum::{
	Json, Router,
	body::Bytes,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use qgraph_service::{Error, GraphRequest, GraphResponse};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	let cors = state.cors_allow_any_origin();
	let router = Router::new()
		.route("/health", get(health))
		.route("/graph", post(graph))
		.with_state(state);

	if cors { router.layer(CorsLayer::permissive()) } else { router }
}

async fn health() -> StatusCode {
	StatusCode::OK
}

// The body is parsed as JSON whatever the Content-Type header says.
async fn graph(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<GraphResponse>, ApiError> {
	let payload: GraphRequest = serde_json::from_slice(&body)?;
	let response = state.service.graph(payload).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			Error::Provider { message } => {
				tracing::error!(%message, "Encoder failed.");

				ApiError::new(StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", message)
			},
			Error::Corpus { message } => {
				tracing::error!(%message, "Corpus error.");

				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "CORPUS_ERROR", message)
			},
		}
	}
}

impl From<serde_json::Error> for ApiError {
	fn from(err: serde_json::Error) -> Self {
		ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.to_string())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
