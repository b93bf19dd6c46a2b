use super::catalog::Catalog;
use super::harness::TimingHarness;
use super::lifecycle::ResourceLifecycle;
use super::record::{ResultTable, RunRecord};
use crate::config::Configuration;
use crate::error::{BenchmarkError, BuildError, ProbeError};
use crate::media::{suggest_output_path, MediaProbe};
use crate::pipeline::Pipeline;
use crate::resources::Resources;
use crate::state::{keys, ProcessManager, StateStore};
use futures::stream::{self, Stream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Runs benchmark batches over the catalog and owns the state they share.
pub struct Benchmark {
    catalog: Catalog,
    assets_dir: PathBuf,
    state: StateStore,
    process: ProcessManager,
    probe: Arc<dyn MediaProbe>,
    pipeline: Arc<dyn Pipeline>,
    resources: Arc<dyn Resources>,
}

impl Benchmark {
    pub fn builder(configuration: Configuration) -> BenchmarkBuilder {
        BenchmarkBuilder::new(configuration)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn process(&self) -> &ProcessManager {
        &self.process
    }

    /// Benchmarks every selected catalog label for `cycles` cycles.
    ///
    /// The returned stream yields the full result table after each target
    /// and is lazy: nothing runs until it is polled. Unknown labels are
    /// skipped; a selection with no known label yields nothing and leaves the
    /// state and resources untouched. The first error ends the stream.
    pub fn start<'a, S: AsRef<str>>(
        &'a mut self,
        runs: &[S],
        cycles: u32,
    ) -> impl Stream<Item = Result<ResultTable, BenchmarkError>> + 'a {
        let targets = self.catalog.resolve(runs);
        stream::unfold(
            Progress::Pending {
                benchmark: self,
                targets,
                cycles,
            },
            Progress::advance,
        )
    }

    /// Waits for any in-flight pipeline work to finish, removes the temp
    /// directory of the current target and returns an empty table.
    pub async fn clear(&mut self) -> ResultTable {
        if self.process.is_active() {
            info!(
                "Waiting for {} pipeline to finish before clearing",
                self.process.state().as_str()
            );
        }
        self.process.wait_until_idle().await;

        match self.state.get_path(keys::TARGET_PATH) {
            Ok(Some(target_path)) => {
                if let Err(e) = self.resources.cleanup_temp(target_path).await {
                    warn!("Failed to clean up after {}: {}", target_path.display(), e);
                }
            }
            Ok(None) => debug!("No target configured, nothing to clean up"),
            Err(e) => warn!("Skipping temp cleanup: {}", e),
        }
        ResultTable::new()
    }

    async fn prepare(&mut self, cycles: u32) -> Result<(), BenchmarkError> {
        if cycles < 1 {
            return Err(BenchmarkError::InvalidCycleCount(cycles));
        }
        self.apply_baseline();
        ResourceLifecycle::new(self.resources.as_ref())
            .pre_process(&self.state)
            .await
    }

    /// Fixes inputs that affect throughput but not the pipeline under test.
    fn apply_baseline(&mut self) {
        self.state.set(
            keys::SOURCE_PATHS,
            vec![
                self.assets_dir.join("source.jpg"),
                self.assets_dir.join("source.mp3"),
            ],
        );
        self.state.set(keys::FACE_LANDMARKER_SCORE, 0.0);
        self.state.set(keys::TEMP_FRAME_FORMAT, "bmp");
        self.state.set(keys::OUTPUT_VIDEO_PRESET, "ultrafast");
    }

    async fn measure(&mut self, target_path: &Path, cycles: u32) -> Result<RunRecord, BenchmarkError> {
        let output_path = suggest_output_path(target_path)
            .ok_or_else(|| ProbeError::NotAVideo(target_path.to_path_buf()))?;
        self.state.set(keys::TARGET_PATH, target_path);
        self.state.set(keys::OUTPUT_PATH, output_path);

        TimingHarness::new(self.probe.as_ref(), self.pipeline.as_ref(), &self.process)
            .run(&mut self.state, target_path, cycles)
            .await
    }

    async fn finish(&self) -> Result<(), BenchmarkError> {
        ResourceLifecycle::new(self.resources.as_ref())
            .post_process()
            .await
    }
}

enum Progress<'a> {
    Pending {
        benchmark: &'a mut Benchmark,
        targets: Vec<PathBuf>,
        cycles: u32,
    },
    Running {
        benchmark: &'a mut Benchmark,
        targets: std::vec::IntoIter<PathBuf>,
        cycles: u32,
        table: ResultTable,
    },
    Done,
}

impl<'a> Progress<'a> {
    async fn advance(self) -> Option<(Result<ResultTable, BenchmarkError>, Progress<'a>)> {
        let mut progress = self;
        loop {
            progress = match progress {
                Progress::Done => return None,
                Progress::Pending {
                    benchmark,
                    targets,
                    cycles,
                } => {
                    if targets.is_empty() {
                        debug!("No known benchmark targets selected");
                        return None;
                    }
                    info!(
                        "Starting benchmark of {} target(s), {} cycle(s) each",
                        targets.len(),
                        cycles
                    );
                    if let Err(e) = benchmark.prepare(cycles).await {
                        error!("Benchmark setup failed: {}", e);
                        return Some((Err(e), Progress::Done));
                    }
                    Progress::Running {
                        benchmark,
                        targets: targets.into_iter(),
                        cycles,
                        table: ResultTable::new(),
                    }
                }
                Progress::Running {
                    benchmark,
                    mut targets,
                    cycles,
                    mut table,
                } => match targets.next() {
                    Some(target_path) => {
                        return match benchmark.measure(&target_path, cycles).await {
                            Ok(record) => {
                                table.push(record);
                                let snapshot = table.clone();
                                Some((
                                    Ok(snapshot),
                                    Progress::Running {
                                        benchmark,
                                        targets,
                                        cycles,
                                        table,
                                    },
                                ))
                            }
                            Err(e) => {
                                error!("Benchmark of {} failed: {}", target_path.display(), e);
                                Some((Err(e), Progress::Done))
                            }
                        };
                    }
                    None => {
                        return match benchmark.finish().await {
                            Ok(()) => {
                                info!("Benchmark finished with {} result(s)", table.len());
                                None
                            }
                            Err(e) => {
                                error!("Benchmark teardown failed: {}", e);
                                Some((Err(e), Progress::Done))
                            }
                        };
                    }
                },
            };
        }
    }
}

pub struct BenchmarkBuilder {
    configuration: Configuration,
    catalog: Option<Catalog>,
    process: Option<ProcessManager>,
    probe: Option<Arc<dyn MediaProbe>>,
    pipeline: Option<Arc<dyn Pipeline>>,
    resources: Option<Arc<dyn Resources>>,
}

impl BenchmarkBuilder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            catalog: None,
            process: None,
            probe: None,
            pipeline: None,
            resources: None,
        }
    }

    // Replaces the standard seven-target catalog.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    // Shares an existing lifecycle flag instead of creating a fresh one.
    pub fn process(mut self, process: ProcessManager) -> Self {
        self.process = Some(process);
        self
    }

    pub fn probe(mut self, probe: Arc<dyn MediaProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn pipeline(mut self, pipeline: Arc<dyn Pipeline>) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    pub fn resources(mut self, resources: Arc<dyn Resources>) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn build(self) -> Result<Benchmark, BuildError> {
        self.configuration.validate()?;
        let probe = self.probe.ok_or(BuildError::MissingCollaborator("Media probe"))?;
        let pipeline = self.pipeline.ok_or(BuildError::MissingCollaborator("Pipeline"))?;
        let resources = self
            .resources
            .ok_or(BuildError::MissingCollaborator("Resources"))?;

        let configuration = self.configuration;
        let mut state = StateStore::new();
        state.set(
            keys::SYSTEM_MEMORY_LIMIT,
            i64::try_from(configuration.system_memory_limit).unwrap_or(i64::MAX),
        );
        state.set(keys::PROCESSORS, configuration.processors.clone());

        Ok(Benchmark {
            catalog: self
                .catalog
                .unwrap_or_else(|| Catalog::new(&configuration.assets_dir)),
            assets_dir: configuration.assets_dir,
            state,
            process: self.process.unwrap_or_default(),
            probe,
            pipeline,
            resources,
        })
    }
}
