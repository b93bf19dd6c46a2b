use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessState {
    #[default]
    Idle,
    Processing,
    Stopping,
}

impl ProcessState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessState::Idle => "idle",
            ProcessState::Processing => "processing",
            ProcessState::Stopping => "stopping",
        }
    }
}

/// Shared lifecycle flag for long running pipeline work.
///
/// Clones observe and mutate the same state. Waiters are woken through the
/// underlying watch channel rather than by polling.
#[derive(Debug, Clone)]
pub struct ProcessManager {
    state: Arc<watch::Sender<ProcessState>>,
}

impl Default for ProcessManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessManager {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ProcessState::Idle);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> ProcessState {
        *self.state.borrow()
    }

    pub fn start(&self) {
        self.transition(ProcessState::Processing);
    }

    /// Requests a stop. Has no effect when nothing is processing.
    pub fn stop(&self) {
        let changed = self.state.send_if_modified(|state| {
            if *state == ProcessState::Processing {
                *state = ProcessState::Stopping;
                true
            } else {
                false
            }
        });
        if changed {
            debug!("Process state -> {}", ProcessState::Stopping.as_str());
        }
    }

    pub fn end(&self) {
        self.transition(ProcessState::Idle);
    }

    pub fn is_active(&self) -> bool {
        self.state() != ProcessState::Idle
    }

    pub fn is_processing(&self) -> bool {
        self.state() == ProcessState::Processing
    }

    pub fn is_stopping(&self) -> bool {
        self.state() == ProcessState::Stopping
    }

    /// Resolves once the flag reports idle.
    pub async fn wait_until_idle(&self) {
        let mut receiver = self.state.subscribe();
        if receiver
            .wait_for(|state| *state == ProcessState::Idle)
            .await
            .is_err()
        {
            debug!("Process state channel closed while waiting for idle");
        }
    }

    /// Resolves once a stop has been requested.
    pub async fn stop_requested(&self) {
        let mut receiver = self.state.subscribe();
        if receiver
            .wait_for(|state| *state == ProcessState::Stopping)
            .await
            .is_err()
        {
            debug!("Process state channel closed while waiting for stop");
        }
    }

    fn transition(&self, next: ProcessState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            debug!("Process state {} -> {}", previous.as_str(), next.as_str());
        }
    }
}

/// Marks the flag as processing until dropped.
pub struct ProcessGuard<'a> {
    manager: &'a ProcessManager,
}

impl<'a> ProcessGuard<'a> {
    pub fn new(manager: &'a ProcessManager) -> Self {
        manager.start();
        Self { manager }
    }
}

impl Drop for ProcessGuard<'_> {
    fn drop(&mut self) {
        self.manager.end();
    }
}
