//! CLI module for the matscout command-line interface.
//!
//! Command handlers run the materials agent in-process and print either
//! JSON or human-readable tables.

mod commands;
mod output;

pub use commands::*;
