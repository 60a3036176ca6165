//! Task definition accepted by the service and forwarded to the workloads.
//!
//! Field names are snake_case on the wire, matching the task API documents.
mod state;
pub use state::TesState;

mod definition;
pub use definition::{TesExecutor, TesFileType, TesInput, TesOutput, TesResources, TesTask};
