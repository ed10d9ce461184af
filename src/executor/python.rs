// Python executor tool implementation

use crate::executor::config::ExecutorConfig;
use crate::executor::reward::RewardScorer;
use crate::executor::sandbox::{self, RunError};
use crate::executor::types::ExecutionResult;
use crate::executor::{ExecutorError, Result, ToolDefinition, ToolImpl, ToolOutput};
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const TOOL_NAME: &str = "python_executor";

/// Result text for empty or whitespace-only code
pub const NO_CODE_MESSAGE: &str = "No code provided.";

pub fn default_python_description() -> String {
    "Execute Python code in a safe environment and return the output.".to_string()
}

/// Pull `code` out of the invocation arguments; absent means empty
fn code_arg(input: &serde_json::Value) -> Result<String> {
    match input.get("code") {
        None | Some(serde_json::Value::Null) => Ok(String::new()),
        Some(serde_json::Value::String(code)) => Ok(code.clone()),
        Some(other) => Err(ExecutorError::InvalidInput(
            TOOL_NAME.to_string(),
            format!("'code' must be a string, got {}", other),
        )),
    }
}

/// Runs submitted code in a fresh RustPython interpreter that only knows
/// the allow-listed built-ins
#[derive(Debug, Clone)]
pub struct PythonExecutorTool {
    description: String,
    recursion_limit: usize,
    stack_bytes: usize,
}

impl PythonExecutorTool {
    pub fn new(description: impl Into<String>, recursion_limit: usize, stack_bytes: usize) -> Self {
        Self {
            description: description.into(),
            recursion_limit,
            stack_bytes,
        }
    }

    pub fn from_config(config: &ExecutorConfig, description: impl Into<String>) -> Self {
        Self::new(description, config.recursion_limit, config.stack_bytes)
    }

    /// Run one code block to completion on a dedicated interpreter thread
    pub fn execute(&self, code: &str) -> ExecutionResult {
        let code = code.trim();
        if code.is_empty() {
            return ExecutionResult::Error(NO_CODE_MESSAGE.to_string());
        }

        let source = code.to_string();
        let recursion_limit = self.recursion_limit;
        let spawned = std::thread::Builder::new()
            .name("pyexec-interp".to_string())
            .stack_size(self.stack_bytes)
            .spawn(move || sandbox::run(&source, recursion_limit));

        let worker = match spawned {
            Ok(worker) => worker,
            Err(e) => {
                warn!(error = %e, stack_bytes = self.stack_bytes, "failed to spawn interpreter thread");
                return ExecutionResult::Error(format!("can't start new thread: {}", e));
            }
        };

        match worker.join() {
            Ok(Ok(output)) => ExecutionResult::Output(output),
            Ok(Err(RunError::Raised(message))) => {
                debug!(message = %message, "code raised");
                ExecutionResult::Error(message)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "interpreter could not be prepared");
                ExecutionResult::Error(e.to_string())
            }
            Err(_) => {
                warn!("interpreter thread panicked");
                ExecutionResult::Error("internal interpreter error".to_string())
            }
        }
    }
}

#[async_trait]
impl ToolImpl for PythonExecutorTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: TOOL_NAME.to_string(),
            description: self.description.clone(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "code": {
                        "type": "string",
                        "description": "Python code to execute. Must be a valid Python code block."
                    }
                },
                "required": ["code"]
            }),
        }
    }

    async fn run(&self, input: serde_json::Value) -> Result<ToolOutput> {
        let start = Instant::now();

        let code = code_arg(&input)?;
        debug!(code_bytes = code.len(), "executing python code");

        let tool = self.clone();
        let result = tokio::task::spawn_blocking(move || tool.execute(&code))
            .await
            .map_err(|e| ExecutorError::TaskFailed(TOOL_NAME.to_string(), e.to_string()))?;

        let duration_ms = start.elapsed().as_millis() as u64;
        let output = ToolOutput::from(result);

        info!(
            duration_ms = duration_ms,
            output_bytes = output.content.len(),
            is_error = output.is_error,
            "python execution completed"
        );

        Ok(output)
    }

    fn calculate_reward(&self, input: &serde_json::Value, result: &str) -> f64 {
        RewardScorer::calculate_reward(input, result)
    }
}
