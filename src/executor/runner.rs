// Main Executor implementation

use crate::executor::config::ExecutorConfig;
use crate::executor::error::{ExecutorError, Result};
use crate::executor::python::{PythonExecutorTool, TOOL_NAME, default_python_description};
use crate::executor::tool::{ToolImpl, load_tool_descriptions};
use crate::executor::types::{ToolDefinition, ToolOutput};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Name-keyed registry of the available tools
pub struct Executor {
    config: ExecutorConfig,
    tools: RwLock<HashMap<String, Arc<dyn ToolImpl>>>,
}

impl Executor {
    /// Create a new Executor instance
    pub fn new(config: ExecutorConfig) -> Self {
        Self::init(config)
    }

    /// Initialize with registered tools
    pub fn init(config: ExecutorConfig) -> Self {
        debug!(
            recursion_limit = config.recursion_limit,
            stack_bytes = config.stack_bytes,
            tools_toml = %config.tools_toml_path.display(),
            "initializing executor"
        );

        // Load tool descriptions from config file
        let descriptions = match load_tool_descriptions(&config.tools_toml_path) {
            Ok(descriptions) => descriptions,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable tool descriptions");
                HashMap::new()
            }
        };

        let python_desc = descriptions
            .get(TOOL_NAME)
            .cloned()
            .unwrap_or_else(default_python_description);
        let python_tool = Arc::new(PythonExecutorTool::from_config(&config, python_desc));

        let executor = Self {
            config,
            tools: RwLock::new(HashMap::new()),
        };
        executor.register(python_tool);

        info!(
            tool_count = executor.tool_definitions().len(),
            "executor initialized with tools"
        );
        executor
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Add or replace a tool under its own name
    pub fn register(&self, tool: Arc<dyn ToolImpl>) {
        let name = tool.name();
        debug!(tool_name = %name, "registering tool");
        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        tools.insert(name, tool);
    }

    /// Get all tool definitions
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        let mut defs: Vec<ToolDefinition> = tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    fn lookup(&self, tool_name: &str) -> Result<Arc<dyn ToolImpl>> {
        debug!(tool_name = %tool_name, "looking up tool");
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools
            .get(tool_name)
            .cloned()
            .ok_or_else(|| ExecutorError::UnknownTool(tool_name.to_string()))
    }

    /// Execute a tool by name with JSON input
    pub async fn execute(&self, tool_name: &str, input: serde_json::Value) -> Result<ToolOutput> {
        let tool = self.lookup(tool_name)?;

        info!(tool_name = %tool_name, "executing tool");
        tool.run(input).await
    }

    /// Reward for a finished invocation of `tool_name`
    pub fn calculate_reward(
        &self,
        tool_name: &str,
        input: &serde_json::Value,
        result: &str,
    ) -> Result<f64> {
        let tool = self.lookup(tool_name)?;
        let reward = tool.calculate_reward(input, result);
        debug!(tool_name = %tool_name, reward = reward, "calculated reward");
        Ok(reward)
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::init(ExecutorConfig::default())
    }
}
