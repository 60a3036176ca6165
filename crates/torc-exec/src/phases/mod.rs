//! The three phase variants of a task pipeline.
//!
//! Each one only decides its arguments, mounts and extra bindings; posture, environment and
//! submission come from [`crate::JobBuilder`].
mod texam;
pub use texam::TaskExecution;

mod tif;
pub use tif::InputStaging;

mod tof;
pub use tof::OutputStaging;

use torc_core::CoreError;
use torc_model::{TaskId, TesTask};

fn require_id(task: &TesTask) -> Result<TaskId, CoreError> {
    task.task_id().ok_or(CoreError::MissingIdentity)
}
