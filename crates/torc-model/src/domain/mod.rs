mod var;
pub use var::{EnvSource, EnvVar, KeySelector, ValueFrom};

mod env;
pub use env::Env;

mod labels;
pub use labels::Labels;

mod identity;
pub use identity::{PhaseId, PhaseRole, TaskId};

mod constants;
pub use constants::{LABEL_NAME, LABEL_PARENT, LABEL_SERVICE, PARENT_PREFIX};
