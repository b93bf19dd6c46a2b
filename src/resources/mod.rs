pub mod face_cache;
pub mod memory;
pub mod temp;

pub use face_cache::FaceCache;
pub use temp::TempWorkspace;

use crate::error::ResourceError;
use crate::pipeline::FrameProcessor;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Process resources acquired before a benchmark batch and released after it.
#[async_trait]
pub trait Resources: Send + Sync {
    async fn apply_memory_limit(&self, bytes: u64) -> Result<(), ResourceError>;
    async fn warm_up(&self, module: &str) -> Result<(), ResourceError>;
    async fn invalidate_face_cache(&self) -> Result<(), ResourceError>;
    async fn cleanup_temp(&self, target_path: &Path) -> Result<(), ResourceError>;
}

/// `Resources` for the current process: rlimit based memory ceiling, a
/// registry of frame processors, the shared face cache and the temp workspace.
pub struct LocalResources {
    processors: IndexMap<String, Arc<dyn FrameProcessor>>,
    face_cache: Arc<FaceCache>,
    workspace: TempWorkspace,
}

impl LocalResources {
    pub fn new(face_cache: Arc<FaceCache>, workspace: TempWorkspace) -> Self {
        Self {
            processors: IndexMap::new(),
            face_cache,
            workspace,
        }
    }

    pub fn with_processor(mut self, processor: Arc<dyn FrameProcessor>) -> Self {
        self.processors.insert(processor.name().to_string(), processor);
        self
    }

    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }
}

#[async_trait]
impl Resources for LocalResources {
    async fn apply_memory_limit(&self, bytes: u64) -> Result<(), ResourceError> {
        memory::limit_system_memory(bytes)?;
        info!("Limited system memory to {} bytes", bytes);
        Ok(())
    }

    async fn warm_up(&self, module: &str) -> Result<(), ResourceError> {
        let processor = self
            .processors
            .get(module)
            .ok_or_else(|| ResourceError::UnknownProcessor(module.to_string()))?;
        debug!("Warming up frame processor {}", module);
        processor.warm_up().await
    }

    async fn invalidate_face_cache(&self) -> Result<(), ResourceError> {
        debug!("Clearing {} cached face entries", self.face_cache.len());
        self.face_cache.clear();
        Ok(())
    }

    async fn cleanup_temp(&self, target_path: &Path) -> Result<(), ResourceError> {
        self.workspace.clear(target_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SimulatedProcessor;
    use std::time::Duration;

    fn resources(root: &Path) -> (LocalResources, Arc<FaceCache>, Arc<SimulatedProcessor>) {
        let face_cache = Arc::new(FaceCache::new());
        let processor = Arc::new(SimulatedProcessor::new("face_swapper", Duration::ZERO));
        let resources = LocalResources::new(face_cache.clone(), TempWorkspace::new(root))
            .with_processor(processor.clone());
        (resources, face_cache, processor)
    }

    #[tokio::test]
    async fn warms_registered_processor() {
        let root = tempfile::tempdir().unwrap();
        let (resources, _, processor) = resources(root.path());

        resources.warm_up("face_swapper").await.unwrap();
        assert!(processor.is_warm());
        assert_eq!(resources.processor_count(), 1);
    }

    #[tokio::test]
    async fn unknown_processor_is_fatal() {
        let root = tempfile::tempdir().unwrap();
        let (resources, _, _) = resources(root.path());

        let result = resources.warm_up("face_enhancer").await;
        assert!(matches!(result, Err(ResourceError::UnknownProcessor(name)) if name == "face_enhancer"));
    }

    #[tokio::test]
    async fn invalidates_face_cache() {
        let root = tempfile::tempdir().unwrap();
        let (resources, face_cache, _) = resources(root.path());
        face_cache.insert("target-240p.mp4", 1);

        resources.invalidate_face_cache().await.unwrap();
        assert!(face_cache.is_empty());
    }
}
