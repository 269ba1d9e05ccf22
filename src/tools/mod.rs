//! Gumroad MCP tools module
//!
//! A single tool handler exposes the store-management tools through the
//! RMCP 0.3.2 router; `registry::ToolFilter` trims it after registration.

pub mod gumroad_tools;
pub mod types;

pub use gumroad_tools::*;
pub use types::*;
