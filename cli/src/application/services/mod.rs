//! Application services: use-case orchestration.
//!
//! Each service module implements one piece of the provisioning workflow by
//! composing domain logic with port trait calls. Services import only from
//! `crate::domain` and `crate::application::ports`, never from
//! `crate::infra`, `crate::commands`, or `crate::output`.

pub mod gate;
pub mod job_poller;
pub mod readiness;
pub mod registry_sync;
pub mod workflow;
