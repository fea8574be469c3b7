use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Encodes query strings through an OpenAI-compatible `/embeddings` endpoint.
///
/// The request is bounded by `timeout_ms`; a timeout surfaces as [`Error::Reqwest`].
pub async fn encode(
	cfg: &qgraph_config::EncoderProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_encoding_response(json, &cfg.model, texts.len())
}

/// Reads an `{ "data": [{ "index", "embedding" }] }` body, one embedding per input text.
fn parse_encoding_response(json: Value, model: &str, expected: usize) -> Result<Vec<Vec<f32>>> {
	let data = json.get("data").and_then(|v| v.as_array()).ok_or_else(|| {
		Error::InvalidResponse {
			message: format!("Encoder {model:?} response is missing data array."),
		}
	})?;

	if data.len() != expected {
		return Err(Error::InvalidResponse {
			message: format!(
				"Encoder {model:?} returned {} embeddings for {expected} queries.",
				data.len()
			),
		});
	}

	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());

	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let embedding = item.get("embedding").and_then(|v| v.as_array()).ok_or_else(|| {
			Error::InvalidResponse {
				message: format!("Encoder {model:?} item {index} is missing its embedding array."),
			}
		})?;
		let mut vec = Vec::with_capacity(embedding.len());

		for value in embedding {
			let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
				message: format!("Encoder {model:?} item {index} has a non-numeric value."),
			})?;

			vec.push(number as f32);
		}

		indexed.push((index, vec));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}
