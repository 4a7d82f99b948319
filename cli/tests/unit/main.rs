//! Unit tests for linodectl
//!
//! These tests drive the workflow services through stubbed ports and run
//! fast without network or filesystem access.

mod architecture;
mod destroy_workflow;
mod job_poller;
