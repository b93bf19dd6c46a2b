use super::record::RunRecord;
use crate::error::BenchmarkError;
use crate::media::{pack_resolution, MediaProbe, VideoStreamInfo};
use crate::pipeline::Pipeline;
use crate::state::{keys, ProcessManager, StateStore};
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// Times repeated pipeline invocations against a single target.
pub struct TimingHarness<'a> {
    probe: &'a dyn MediaProbe,
    pipeline: &'a dyn Pipeline,
    process: &'a ProcessManager,
}

impl<'a> TimingHarness<'a> {
    pub fn new(
        probe: &'a dyn MediaProbe,
        pipeline: &'a dyn Pipeline,
        process: &'a ProcessManager,
    ) -> Self {
        Self {
            probe,
            pipeline,
            process,
        }
    }

    /// Probes the target, publishes its output resolution and fps to the
    /// state store, then runs `cycles` timed pipeline invocations.
    #[instrument(skip(self, state), fields(target = %target_path.display(), pipeline = self.pipeline.name()))]
    pub async fn run(
        &self,
        state: &mut StateStore,
        target_path: &Path,
        cycles: u32,
    ) -> Result<RunRecord, BenchmarkError> {
        if cycles < 1 {
            return Err(BenchmarkError::InvalidCycleCount(cycles));
        }

        let VideoStreamInfo {
            frame_total,
            resolution,
            fps,
        } = self.probe.stream_info(target_path).await?;
        state.set(keys::OUTPUT_VIDEO_RESOLUTION, pack_resolution(resolution));
        state.set(keys::OUTPUT_VIDEO_FPS, fps);
        debug!(
            "Target has {} frames at {} and {:.2} fps",
            frame_total, resolution, fps
        );

        let mut durations: Vec<Duration> = Vec::with_capacity(cycles as usize);
        for cycle in 1..=cycles {
            let start = Instant::now();
            self.pipeline.invoke(state, self.process).await?;
            let elapsed = start.elapsed();
            debug!("Cycle {}/{} took {}ms", cycle, cycles, elapsed.as_millis());
            durations.push(elapsed);
        }

        let record = RunRecord::from_durations(target_path.to_path_buf(), frame_total, &durations)?;
        info!(
            "Benchmarked {} over {} cycles: average {:.2}s, {:.2} fps",
            target_path.display(),
            cycles,
            record.average_run,
            record.relative_fps
        );
        Ok(record)
    }
}
