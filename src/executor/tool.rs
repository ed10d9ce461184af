// Tool trait and tool description loading

use crate::executor::{Result, ToolDefinition, ToolOutput};
use async_trait::async_trait;
use tracing::debug;

/// Internal trait for tool implementations
#[async_trait]
pub trait ToolImpl: Send + Sync {
    /// Get the tool definition (name, description, input_schema)
    fn definition(&self) -> ToolDefinition;

    /// Run the tool with JSON input
    async fn run(&self, input: serde_json::Value) -> Result<ToolOutput>;

    /// Score a finished invocation; tools without a heuristic score nothing
    fn calculate_reward(&self, _input: &serde_json::Value, _result: &str) -> f64 {
        0.0
    }

    /// Get tool name
    fn name(&self) -> String {
        self.definition().name.clone()
    }
}

/// Load tool descriptions from TOML config file
pub fn load_tool_descriptions(
    path: &std::path::Path,
) -> Result<std::collections::HashMap<String, String>> {
    use std::collections::HashMap;

    if !path.exists() {
        debug!(path = %path.display(), "tools.toml not found, using default descriptions");
        return Ok(HashMap::new());
    }

    let content = std::fs::read_to_string(path)?;
    let config: toml::Table = content.parse()?;

    let mut descriptions = HashMap::new();
    for (key, value) in &config {
        if let Some(desc) = value.get("description").and_then(|d| d.as_str()) {
            descriptions.insert(key.clone(), desc.to_string());
        }
    }

    debug!(path = %path.display(), tool_count = descriptions.len(), "loaded tool descriptions from config");
    Ok(descriptions)
}
