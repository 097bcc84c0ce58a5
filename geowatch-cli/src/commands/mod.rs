//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`check`] - Validate a config file and list its regions
//! - [`rank`] - Show the selection and expansion region for one location
//! - [`simulate`] - Replay a location track through the engine
//! - [`track`] - Track file parsing

pub mod check;
pub mod common;
pub mod rank;
pub mod simulate;
pub mod track;
