use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use qgraph_config::{Config, Error, ProfileNormalization};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let mut table = root.as_table_mut().expect("Sample config must be a table.");

	for part in section.split('.') {
		table = table
			.get_mut(part)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Sample config must include [{section}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("qgraph_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> qgraph_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = qgraph_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse test config.")
}

#[test]
fn sample_config_loads_and_normalizes_blank_api_key() {
	let cfg = load_payload(SAMPLE_CONFIG_TOML.to_string()).expect("Sample config must load.");

	assert!(cfg.providers.encoder.api_key.is_empty());
	assert_eq!(cfg.graph.default_top_n, 400);
	assert_eq!(cfg.graph.default_k_neighbors, 6);
	assert_eq!(cfg.graph.profile_normalization, ProfileNormalization::L2);
	assert_eq!(cfg.corpus.vector_dim, 512);
}

#[test]
fn graph_section_defaults_apply_when_omitted() {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");

	root.as_table_mut().expect("Sample config must be a table.").insert(
		"graph".to_string(),
		Value::Table(Default::default()),
	);

	let payload = toml::to_string(&root).expect("Failed to render sample config.");
	let cfg = load_payload(payload).expect("Config with empty [graph] must load.");

	assert_eq!(cfg.graph.default_top_n, 400);
	assert_eq!(cfg.graph.default_per_query_n, 0);
	assert_eq!(cfg.graph.default_k_neighbors, 6);
	assert!((cfg.graph.default_min_img_sim - 0.2).abs() < f32::EPSILON);
	assert_eq!(cfg.graph.max_queries, 64);
}

#[test]
fn standardized_profile_normalization_parses() {
	let payload = sample_toml_with(
		"graph",
		"profile_normalization",
		Value::String("standardized".to_string()),
	);
	let cfg = load_payload(payload).expect("Config must load.");

	assert_eq!(cfg.graph.profile_normalization, ProfileNormalization::Standardized);
}

#[test]
fn unknown_profile_normalization_is_a_parse_error() {
	let payload =
		sample_toml_with("graph", "profile_normalization", Value::String("zscore".to_string()));
	let err = load_payload(payload).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn encoder_dimensions_must_match_corpus() {
	let payload = sample_toml_with("providers.encoder", "dimensions", Value::Integer(768));
	let err = load_payload(payload).expect_err("Expected dimension validation error.");

	assert!(
		err.to_string().contains("providers.encoder.dimensions must match corpus.vector_dim."),
		"Unexpected error: {err}"
	);
}

#[test]
fn missing_file_is_a_read_error() {
	let mut path = env::temp_dir();

	path.push("qgraph_config_test_missing_file.toml");

	let err = qgraph_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn vector_dim_must_be_positive() {
	let mut cfg = base_config();

	cfg.corpus.vector_dim = 0;
	cfg.providers.encoder.dimensions = 0;

	let err = qgraph_config::validate(&cfg).expect_err("Expected vector_dim validation error.");

	assert!(
		err.to_string().contains("corpus.vector_dim must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn timeout_must_be_positive() {
	let mut cfg = base_config();

	cfg.providers.encoder.timeout_ms = 0;

	let err = qgraph_config::validate(&cfg).expect_err("Expected timeout validation error.");

	assert!(
		err.to_string().contains("providers.encoder.timeout_ms must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn graph_defaults_must_be_usable() {
	let mut cfg = base_config();

	cfg.graph.default_top_n = 0;

	assert!(
		qgraph_config::validate(&cfg)
			.expect_err("Expected default_top_n validation error.")
			.to_string()
			.contains("graph.default_top_n must be greater than zero.")
	);

	let mut cfg = base_config();

	cfg.graph.default_k_neighbors = 0;

	assert!(
		qgraph_config::validate(&cfg)
			.expect_err("Expected default_k_neighbors validation error.")
			.to_string()
			.contains("graph.default_k_neighbors must be greater than zero.")
	);

	let mut cfg = base_config();

	cfg.graph.default_min_img_sim = f32::NAN;

	assert!(
		qgraph_config::validate(&cfg)
			.expect_err("Expected default_min_img_sim validation error.")
			.to_string()
			.contains("graph.default_min_img_sim must be a finite number.")
	);
}

#[test]
fn default_header_values_must_be_strings() {
	let mut cfg = base_config();

	cfg.providers.encoder.default_headers.insert("x-retries".to_string(), serde_json::json!(3));

	let err = qgraph_config::validate(&cfg).expect_err("Expected header validation error.");

	assert!(
		err.to_string().contains("providers.encoder.default_headers values must be strings."),
		"Unexpected error: {err}"
	);
}
