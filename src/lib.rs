pub mod benchmark;
pub mod config;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod resources;
pub mod state;

pub use error::{AppError, BenchmarkError, BuildError, ConfigError};

pub use benchmark::{Benchmark, BenchmarkBuilder, Catalog, ResultTable, RunRecord};
pub use config::Configuration;
pub use state::{ProcessManager, ProcessState, StateStore};
