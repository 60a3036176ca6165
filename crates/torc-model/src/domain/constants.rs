//! Well-known label keys and name prefixes stamped on every submitted job.
//!
//! Downstream log scrapers select on these keys, so they are part of the job contract.

/// Label carrying the phase role prefix (`tif`, `texam`, `tof`).
pub const LABEL_SERVICE: &str = "service";

/// Label carrying the orchestrator identity (`torc-<task>`).
pub const LABEL_PARENT: &str = "parent";

/// Label carrying the job's own name.
pub const LABEL_NAME: &str = "name";

/// Prefix of the orchestrator identity used in the `parent` label.
pub const PARENT_PREFIX: &str = "torc";
