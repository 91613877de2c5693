//! MCP server module for matscout.

mod server;
mod tools;
mod transport;

pub use server::*;
pub use tools::*;
pub use transport::*;
