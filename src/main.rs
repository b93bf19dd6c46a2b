use fusion_bench::config::Configuration;
use fusion_bench::error::AppError;
use fusion_bench::media::FfprobeProbe;
use fusion_bench::pipeline::{SimulatedPipeline, SimulatedProcessor};
use fusion_bench::resources::{FaceCache, LocalResources, TempWorkspace};
use fusion_bench::Benchmark;
use futures::{pin_mut, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};

const PROCESSOR_WARM_UP: Duration = Duration::from_millis(500);

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let configuration = Configuration::load(config_path.as_deref())?;
    init_logging(configuration.log_level.parse().unwrap_or(Level::INFO));

    let face_cache = Arc::new(FaceCache::new());
    let workspace = TempWorkspace::default().keep_temp(configuration.keep_temp);
    let resources = configuration.processors.iter().fold(
        LocalResources::new(face_cache.clone(), workspace.clone()),
        |resources, name| {
            resources.with_processor(Arc::new(SimulatedProcessor::new(
                name.clone(),
                PROCESSOR_WARM_UP,
            )))
        },
    );
    let pipeline = SimulatedPipeline::new(Duration::from_millis(configuration.simulated_latency_ms))
        .with_jitter(Duration::from_millis(configuration.simulated_jitter_ms))
        .with_face_cache(face_cache)
        .with_workspace(workspace);

    let runs = configuration.benchmark_runs.clone();
    let cycles = configuration.benchmark_cycles;
    let mut benchmark = Benchmark::builder(configuration)
        .probe(Arc::new(FfprobeProbe::new()))
        .pipeline(Arc::new(pipeline))
        .resources(Arc::new(resources))
        .build()?;

    info!("Benchmarking {:?} with {} cycle(s)", runs, cycles);
    {
        let results = benchmark.start(&runs, cycles);
        pin_mut!(results);
        while let Some(table) = results.next().await {
            println!("{}", table?);
        }
    }

    benchmark.clear().await;
    Ok(())
}
