mod builder;
pub use builder::{JobBuilder, JobRequest, TtlSetting, resolve_ttl};

mod utils;
pub use utils::*;

pub mod phases;
pub use phases::{InputStaging, OutputStaging, TaskExecution};

mod pipeline;
pub use pipeline::Torc;
