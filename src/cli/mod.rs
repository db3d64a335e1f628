//! CLI command handlers

pub mod commands;

pub use commands::{calculate, evaluate_file, init_logging, CalculateOptions};
