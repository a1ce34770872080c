//! Command handlers for the `rawdrop` binary.

pub mod config;
pub mod convert;
pub mod options;
pub mod types;
pub mod watch;
