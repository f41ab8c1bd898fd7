//! Clemens CLI library
//!
//! The `clemens` binary is a thin wrapper over these modules: argument
//! definitions, logging setup, table output and one module per command.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
