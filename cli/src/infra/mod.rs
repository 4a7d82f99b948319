//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the Linode HTTP client,
//! registry and config files, and terminal prompts.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod config;
pub mod linode;
pub mod password;
pub mod prompt;
pub mod registry;
