//! Integration tests for linodectl
//!
//! These tests spawn the actual binary with a temporary state directory.
//! None of them reach the real Linode API.

mod workflow_commands;
