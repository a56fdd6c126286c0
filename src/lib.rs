//! `nass-quickstats` library crate.
//!
//! The binary (`nass`) is a thin wrapper around this library so that:
//!
//! - fetch/report logic is testable without spawning processes
//! - the same calls can be scripted from other Rust code

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
