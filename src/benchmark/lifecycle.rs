use crate::error::BenchmarkError;
use crate::resources::Resources;
use crate::state::{keys, StateStore};
use tracing::{debug, info};

const BYTES_PER_GIB: u64 = 1024 * 1024 * 1024;

/// Acquires process resources before a batch and releases them after it.
pub struct ResourceLifecycle<'a> {
    resources: &'a dyn Resources,
}

impl<'a> ResourceLifecycle<'a> {
    pub fn new(resources: &'a dyn Resources) -> Self {
        Self { resources }
    }

    /// Applies the configured memory ceiling, then warms every configured
    /// frame processor so the first cycle does not pay for lazy loading.
    pub async fn pre_process(&self, state: &StateStore) -> Result<(), BenchmarkError> {
        if let Some(limit) = state
            .get_integer(keys::SYSTEM_MEMORY_LIMIT)?
            .filter(|limit| *limit > 0)
        {
            let bytes = (limit as u64).saturating_mul(BYTES_PER_GIB);
            self.resources.apply_memory_limit(bytes).await?;
        }

        let processors = state.require_list(keys::PROCESSORS)?;
        for processor in processors {
            self.resources.warm_up(processor).await?;
        }
        info!("Warmed up {} frame processor(s)", processors.len());
        Ok(())
    }

    pub async fn post_process(&self) -> Result<(), BenchmarkError> {
        self.resources.invalidate_face_cache().await?;
        debug!("Invalidated face cache");
        Ok(())
    }
}
