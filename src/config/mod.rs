//! Configuration for matscout.

mod settings;

pub use settings::*;
