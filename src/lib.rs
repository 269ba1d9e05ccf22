//! Gumroad MCP Server
//!
//! Exposes Gumroad store management (list, inspect, create, update and delete
//! products) as MCP tools over streamable HTTP or stdio.

pub mod config;
pub mod credentials;
pub mod error;
pub mod gumroad_client;
pub mod listings;
pub mod registry;
pub mod server;
pub mod tools;

pub use config::{Args, Config, Transport};
pub use error::{GumroadError, Result};
pub use gumroad_client::GumroadClient;
pub use tools::GumroadToolHandler;
