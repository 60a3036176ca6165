//! In-process adapters for the collaborator ports.
//!
//! They keep every call in order so behaviour can be asserted without a cluster,
//! a broker or a database.
mod channel;
pub use channel::MemoryChannel;

mod scheduler;
pub use scheduler::MemoryScheduler;

mod store;
pub use store::{MemoryStore, StoreOp};
