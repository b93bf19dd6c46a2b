pub mod simulated;

pub use simulated::{SimulatedPipeline, SimulatedProcessor};

use crate::error::{PipelineError, ResourceError};
use crate::state::{ProcessManager, StateStore};
use async_trait::async_trait;

/// The frame-processing chain being measured. Every parameter is read from
/// the state store; the process flag is marked while work is in flight.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn invoke(&self, state: &StateStore, process: &ProcessManager)
        -> Result<(), PipelineError>;
    fn name(&self) -> &str;
}

/// A processing module whose models are loaded lazily on first use.
#[async_trait]
pub trait FrameProcessor: Send + Sync {
    fn name(&self) -> &str;
    async fn warm_up(&self) -> Result<(), ResourceError>;
}
