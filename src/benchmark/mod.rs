pub mod catalog;
pub mod harness;
pub mod lifecycle;
pub mod orchestrator;
pub mod record;

pub use catalog::{Catalog, BENCHMARK_LABELS};
pub use harness::TimingHarness;
pub use lifecycle::ResourceLifecycle;
pub use orchestrator::{Benchmark, BenchmarkBuilder};
pub use record::{ResultTable, RunRecord, RESULT_HEADERS};
