//! Lenient request parsing: `queries` is strict, numeric knobs degrade to the configured
//! defaults when they cannot be read as numbers.

use serde::{Deserialize as _, Deserializer, de::Error as _};
use serde_json::Value;

pub const QUERIES_TYPE_MESSAGE: &str = "queries must be a list of strings";

pub fn queries<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<Value>::deserialize(deserializer)? {
		None | Some(Value::Null) => Ok(Vec::new()),
		Some(Value::Array(items)) => items
			.into_iter()
			.map(|item| match item {
				Value::String(query) => Ok(query),
				_ => Err(D::Error::custom(QUERIES_TYPE_MESSAGE)),
			})
			.collect(),
		Some(_) => Err(D::Error::custom(QUERIES_TYPE_MESSAGE)),
	}
}

/// Integers pass through, finite floats truncate toward zero, numeric strings are parsed.
pub fn int_knob<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<Value>::deserialize(deserializer)?.as_ref().and_then(number_from_value).and_then(
		|number| match number {
			Number::Int(value) => Some(value),
			Number::Float(value) if value.is_finite() => Some(value.trunc() as i64),
			Number::Float(_) => None,
		},
	))
}

pub fn float_knob<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<Value>::deserialize(deserializer)?
		.as_ref()
		.and_then(number_from_value)
		.map(|number| match number {
			Number::Int(value) => value as f32,
			Number::Float(value) => value as f32,
		})
		.filter(|value| value.is_finite()))
}

enum Number {
	Int(i64),
	Float(f64),
}

fn number_from_value(value: &Value) -> Option<Number> {
	match value {
		Value::Number(number) => number
			.as_i64()
			.map(Number::Int)
			.or_else(|| number.as_f64().map(Number::Float)),
		Value::String(raw) => {
			let raw = raw.trim();

			raw.parse::<i64>()
				.map(Number::Int)
				.ok()
				.or_else(|| raw.parse::<f64>().ok().map(Number::Float))
		},
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use serde::Deserialize;

	#[derive(Debug, Deserialize)]
	struct Probe {
		#[serde(default, deserialize_with = "super::queries")]
		queries: Vec<String>,
		#[serde(default, deserialize_with = "super::int_knob")]
		top_n: Option<i64>,
		#[serde(default, deserialize_with = "super::float_knob")]
		min_img_sim: Option<f32>,
	}

	fn probe(json: serde_json::Value) -> serde_json::Result<Probe> {
		serde_json::from_value(json)
	}

	#[test]
	fn queries_accept_string_lists_only() {
		let parsed = probe(serde_json::json!({ "queries": ["a dog", "a cat"] })).expect("ok");

		assert_eq!(parsed.queries, vec!["a dog".to_string(), "a cat".to_string()]);
		assert!(probe(serde_json::json!({})).expect("ok").queries.is_empty());
		assert!(probe(serde_json::json!({ "queries": null })).expect("ok").queries.is_empty());

		for bad in [serde_json::json!({ "queries": ["a", 1] }), serde_json::json!({ "queries": "a" })]
		{
			let err = probe(bad).expect_err("Expected type error.");

			assert!(err.to_string().contains(super::QUERIES_TYPE_MESSAGE), "Unexpected: {err}");
		}
	}

	#[test]
	fn int_knobs_are_lenient() {
		let read = |value: serde_json::Value| {
			probe(serde_json::json!({ "top_n": value })).expect("ok").top_n
		};

		assert_eq!(read(serde_json::json!(12)), Some(12));
		assert_eq!(read(serde_json::json!(-3)), Some(-3));
		assert_eq!(read(serde_json::json!(7.9)), Some(7));
		assert_eq!(read(serde_json::json!("40")), Some(40));
		assert_eq!(read(serde_json::json!("many")), None);
		assert_eq!(read(serde_json::json!(null)), None);
		assert_eq!(read(serde_json::json!([1])), None);
	}

	#[test]
	fn float_knobs_are_lenient() {
		let read = |value: serde_json::Value| {
			probe(serde_json::json!({ "min_img_sim": value })).expect("ok").min_img_sim
		};

		assert_eq!(read(serde_json::json!(0.5)), Some(0.5));
		assert_eq!(read(serde_json::json!(1)), Some(1.0));
		assert_eq!(read(serde_json::json!("0.25")), Some(0.25));
		assert_eq!(read(serde_json::json!("NaN")), None);
		assert_eq!(read(serde_json::json!(true)), None);
	}
}
