use std::path::PathBuf;
use thiserror::Error;

// Main Benchmark Error Type

#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("State Error: {0}")]
    State(#[from] StateError),
    #[error("Probe Error: {0}")]
    Probe(#[from] ProbeError),
    #[error("Pipeline Error: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("Resource Error: {0}")]
    Resource(#[from] ResourceError),
    #[error("Statistics Error: {0}")]
    Statistics(#[from] StatisticsError),
    #[error("Benchmark cycles must be at least 1, got {0}")]
    InvalidCycleCount(u32),
}

// State Store Error Type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("Required state key '{0}' is not set")]
    Missing(String),
    #[error("State key '{key}' holds {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to spawn ffprobe for {1}: {0}")]
    SpawnError(std::io::Error, PathBuf),
    #[error("ffprobe exited with {status} for {path}: {stderr}")]
    ExitError {
        path: PathBuf,
        status: String,
        stderr: String,
    },
    #[error("Malformed probe output for {1}: {0}")]
    MalformedOutput(String, PathBuf),
    #[error("No video stream found in {0}")]
    NoVideoStream(PathBuf),
    #[error("Target is not a video: {0}")]
    NotAVideo(PathBuf),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Pipeline failed: {0}")]
    Failed(String),
    #[error("Pipeline was stopped before completion")]
    Stopped,
    #[error("Pipeline could not read its parameters: {0}")]
    State(#[from] StateError),
}

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Failed to limit system memory to {0} bytes: {1}")]
    MemoryLimit(u64, String),
    #[error("Unknown frame processor: {0}")]
    UnknownProcessor(String),
    #[error("Failed to warm up frame processor {0}: {1}")]
    WarmUp(String, String),
    #[error("Failed to clear temp directory {1}: {0}")]
    TempCleanup(std::io::Error, PathBuf),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatisticsError {
    #[error("No benchmark cycles were recorded")]
    NoSamples,
    #[error("Total duration across {cycles} cycles is {total_secs}s, relative fps is undefined")]
    DegenerateTiming { cycles: usize, total_secs: f64 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("{0} not set")]
    MissingCollaborator(&'static str),
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),
}

// Binary entry point error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),
    #[error("Build Error: {0}")]
    Build(#[from] BuildError),
    #[error("Benchmark Error: {0}")]
    Benchmark(#[from] BenchmarkError),
}
