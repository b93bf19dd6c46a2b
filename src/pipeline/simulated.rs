use super::{FrameProcessor, Pipeline};
use crate::error::{PipelineError, ResourceError};
use crate::resources::{FaceCache, TempWorkspace};
use crate::state::{keys, ProcessGuard, ProcessManager, StateStore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Stand-in pipeline that spends a configurable amount of wall time per
/// invocation. Used by the binary when no inference backend is linked.
pub struct SimulatedPipeline {
    latency: Duration,
    jitter: Duration,
    face_cache: Option<Arc<FaceCache>>,
    workspace: Option<TempWorkspace>,
    invocations: AtomicUsize,
}

impl SimulatedPipeline {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            jitter: Duration::ZERO,
            face_cache: None,
            workspace: None,
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_face_cache(mut self, face_cache: Arc<FaceCache>) -> Self {
        self.face_cache = Some(face_cache);
        self
    }

    pub fn with_workspace(mut self, workspace: TempWorkspace) -> Self {
        self.workspace = Some(workspace);
        self
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    fn cycle_latency(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.latency;
        }
        let jitter_us = rand::random_range(0..=self.jitter.as_micros() as u64);
        self.latency + Duration::from_micros(jitter_us)
    }
}

#[async_trait]
impl Pipeline for SimulatedPipeline {
    async fn invoke(
        &self,
        state: &StateStore,
        process: &ProcessManager,
    ) -> Result<(), PipelineError> {
        let target_path = state.require_path(keys::TARGET_PATH)?;
        let output_path = state.require_path(keys::OUTPUT_PATH)?;
        let _guard = ProcessGuard::new(process);
        self.invocations.fetch_add(1, Ordering::SeqCst);

        if let Some(workspace) = &self.workspace {
            workspace
                .create(target_path)
                .await
                .map_err(|e| PipelineError::Failed(format!("temp directory: {}", e)))?;
        }

        let latency = self.cycle_latency();
        debug!(
            "Simulating {} -> {} in {}ms",
            target_path.display(),
            output_path.display(),
            latency.as_millis()
        );

        tokio::select! {
            _ = tokio::time::sleep(latency) => {}
            _ = process.stop_requested() => return Err(PipelineError::Stopped),
        }

        if let Some(face_cache) = &self.face_cache {
            face_cache.insert(target_path.display().to_string(), 1);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

/// Frame processor that pays a one-off warm-up cost.
pub struct SimulatedProcessor {
    name: String,
    warm_up_latency: Duration,
    warm: AtomicBool,
}

impl SimulatedProcessor {
    pub fn new(name: impl Into<String>, warm_up_latency: Duration) -> Self {
        Self {
            name: name.into(),
            warm_up_latency,
            warm: AtomicBool::new(false),
        }
    }

    pub fn is_warm(&self) -> bool {
        self.warm.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FrameProcessor for SimulatedProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn warm_up(&self) -> Result<(), ResourceError> {
        if self.is_warm() {
            return Ok(());
        }
        tokio::time::sleep(self.warm_up_latency).await;
        self.warm.store(true, Ordering::SeqCst);
        debug!("Frame processor {} is warm", self.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;
    use std::path::PathBuf;

    fn state() -> StateStore {
        let mut state = StateStore::new();
        state.set(keys::TARGET_PATH, PathBuf::from("target-240p.mp4"));
        state.set(keys::OUTPUT_PATH, PathBuf::from("/tmp/abcd1234.mp4"));
        state
    }

    #[tokio::test(start_paused = true)]
    async fn invocation_takes_configured_latency() {
        let face_cache = Arc::new(FaceCache::new());
        let pipeline =
            SimulatedPipeline::new(Duration::from_millis(100)).with_face_cache(face_cache.clone());
        let process = ProcessManager::new();

        let started = tokio::time::Instant::now();
        pipeline.invoke(&state(), &process).await.unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(100) && elapsed < Duration::from_millis(101));
        assert_eq!(pipeline.invocations(), 1);
        assert_eq!(face_cache.get("target-240p.mp4"), Some(1));
        assert!(!process.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn marks_process_active_while_running() {
        let pipeline = Arc::new(SimulatedPipeline::new(Duration::from_secs(1)));
        let process = ProcessManager::new();

        let task = {
            let pipeline = pipeline.clone();
            let process = process.clone();
            tokio::spawn(async move {
                let state = state();
                pipeline.invoke(&state, &process).await
            })
        };
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(process.is_processing());

        task.await.unwrap().unwrap();
        assert!(!process.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_request_aborts_invocation() {
        let pipeline = Arc::new(SimulatedPipeline::new(Duration::from_secs(10)));
        let process = ProcessManager::new();

        let task = {
            let pipeline = pipeline.clone();
            let process = process.clone();
            tokio::spawn(async move {
                let state = state();
                pipeline.invoke(&state, &process).await
            })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        process.stop();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(PipelineError::Stopped)));
        assert!(!process.is_active());
    }

    #[tokio::test]
    async fn missing_target_is_reported() {
        let pipeline = SimulatedPipeline::new(Duration::ZERO);
        let result = pipeline
            .invoke(&StateStore::new(), &ProcessManager::new())
            .await;
        assert!(matches!(
            result,
            Err(PipelineError::State(StateError::Missing(key))) if key == keys::TARGET_PATH
        ));
    }

    #[tokio::test]
    async fn processor_warms_once() {
        let processor = SimulatedProcessor::new("face_swapper", Duration::ZERO);
        assert!(!processor.is_warm());
        processor.warm_up().await.unwrap();
        processor.warm_up().await.unwrap();
        assert!(processor.is_warm());
    }
}
