use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "FUSION_BENCH";
const DEFAULT_CONFIG_FILE: &str = "fusion-bench";

pub const MIN_BENCHMARK_CYCLES: u32 = 1;
pub const MAX_BENCHMARK_CYCLES: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Directory holding the benchmark source and target media
    pub assets_dir: PathBuf,
    pub benchmark_runs: Vec<String>,
    pub benchmark_cycles: u32,
    /// Memory ceiling in GiB, 0 disables the limit
    pub system_memory_limit: u64,
    pub processors: Vec<String>,
    pub keep_temp: bool,
    pub simulated_latency_ms: u64,
    pub simulated_jitter_ms: u64,
    pub log_level: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from(".assets/examples"),
            benchmark_runs: vec!["240p".to_string()],
            benchmark_cycles: 5,
            system_memory_limit: 0,
            processors: vec!["face_swapper".to_string()],
            keep_temp: false,
            simulated_latency_ms: 250,
            simulated_jitter_ms: 0,
            log_level: "info".to_string(),
        }
    }
}

impl Configuration {
    /// Loads the configuration from an optional file layered under
    /// `FUSION_BENCH_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let configuration: Configuration = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("benchmark_runs")
                    .with_list_parse_key("processors"),
            )
            .build()?
            .try_deserialize()?;

        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BENCHMARK_CYCLES..=MAX_BENCHMARK_CYCLES).contains(&self.benchmark_cycles) {
            return Err(ConfigError::Invalid(format!(
                "benchmark_cycles must be within {}..={}, got {}",
                MIN_BENCHMARK_CYCLES, MAX_BENCHMARK_CYCLES, self.benchmark_cycles
            )));
        }
        if self.processors.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one frame processor is required".to_string(),
            ));
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        Ok(())
    }
}
