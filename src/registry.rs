//! Tool enablement
//!
//! Every tool is registered through the `#[tool_router]` macro; disabled tools
//! are removed from the router afterwards. Two filters apply: an explicit
//! enabled-tools list and read-only mode, which drops tools that modify the store.

use rmcp::handler::server::router::tool::ToolRouter;
use std::collections::{BTreeSet, HashSet};
use tracing::{info, warn};

use crate::config::Config;

/// Tools that create, change or delete store data
pub const WRITE_TOOLS: &[&str] = &["create_product", "update_product", "delete_product"];

#[derive(Debug, Clone, Default)]
pub struct ToolFilter {
    enabled: Option<HashSet<String>>,
    read_only: bool,
}

impl ToolFilter {
    pub fn new(enabled: Option<HashSet<String>>, read_only: bool) -> Self {
        Self { enabled, read_only }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.enabled_tools.clone(), config.read_only)
    }

    /// Whether the enabled-tools list allows `name` (all tools when unset)
    pub fn is_tool_enabled(&self, name: &str) -> bool {
        match &self.enabled {
            None => true,
            Some(set) => set.contains(name),
        }
    }

    /// Names from `registered` that should not be exposed, sorted
    pub fn tools_to_remove<'a>(&self, registered: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
        registered
            .into_iter()
            .filter(|name| {
                if !self.is_tool_enabled(name) {
                    return true;
                }
                if self.read_only && WRITE_TOOLS.iter().any(|w| w == name) {
                    info!("Read-only mode: disabling tool '{}'", name);
                    return true;
                }
                false
            })
            .map(str::to_string)
            .collect()
    }

    /// Remove disabled tools from a router after registration
    pub fn apply<S>(&self, router: &mut ToolRouter<S>)
    where
        S: Send + Sync + 'static,
    {
        if self.enabled.is_none() && !self.read_only {
            return;
        }

        let registered: Vec<String> = router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();

        if let Some(enabled) = &self.enabled {
            for name in enabled {
                if !registered.iter().any(|r| r == name) {
                    warn!("Enabled tool '{}' is not provided by this server", name);
                }
            }
        }

        let to_remove = self.tools_to_remove(registered.iter().map(String::as_str));
        for name in &to_remove {
            router.remove_route::<(), ()>(name);
        }

        if !to_remove.is_empty() {
            let enabled_count = self
                .enabled
                .as_ref()
                .map(|set| set.len().to_string())
                .unwrap_or_else(|| "all".to_string());
            let mode = if self.read_only { "Read-Only" } else { "Full" };
            info!(
                "Tool filtering: removed {} tools, {} enabled. Mode: {}",
                to_remove.len(),
                enabled_count,
                mode
            );
        }
    }
}
