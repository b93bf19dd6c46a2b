pub mod process;
pub mod store;

pub use process::{ProcessGuard, ProcessManager, ProcessState};
pub use store::{keys, StateStore, StateValue};
