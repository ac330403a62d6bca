// src/cli/mod.rs
//! Command-line interface definitions

/// Argument parser
pub mod commands;

pub use commands::Commands;
