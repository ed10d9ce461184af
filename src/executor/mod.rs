// Executor module - Tool registry and the python_executor tool
#![allow(unused_imports)]

pub mod config;
pub mod error;
pub mod python;
pub mod reward;
pub mod runner;
pub mod sandbox;
pub mod tool;
pub mod types;

pub use config::ExecutorConfig;
pub use error::{ExecutorError, Result};
pub use python::{NO_CODE_MESSAGE, PythonExecutorTool, TOOL_NAME};
pub use reward::RewardScorer;
pub use runner::Executor;
pub use tool::ToolImpl;
pub use types::{ExecutionResult, ToolDefinition, ToolOutput};
