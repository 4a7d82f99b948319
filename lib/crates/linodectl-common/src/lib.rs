pub mod job;
pub mod types;

pub use job::{InstanceStatus, JobHandle, JobKind, JobState};
pub use types::*;
