// Executor configuration

use std::path::PathBuf;
use tracing::{Level, warn};

/// Executor configuration
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Path to tools.toml configuration file
    pub tools_toml_path: PathBuf,
    /// Nested call depth at which submitted code gets a RecursionError
    pub recursion_limit: usize,
    /// Stack size of the interpreter thread, in bytes
    pub stack_bytes: usize,
    /// Maximum level for the log subscriber
    pub log_level: Level,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            tools_toml_path: PathBuf::from("tools.toml"),
            recursion_limit: 1000,
            stack_bytes: 256 * 1024 * 1024,
            log_level: Level::INFO,
        }
    }
}

/// Parse an environment variable, logging a warning if the value is present but invalid.
fn parse_env_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(v) => match v.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(var = name, value = %v, "Invalid env var value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

impl ExecutorConfig {
    /// Load from environment variables (and `.env` if present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = ExecutorConfig::default();

        config.tools_toml_path = parse_env_var("PYEXEC_TOOLS_TOML", config.tools_toml_path);
        config.recursion_limit = parse_env_var("PYEXEC_RECURSION_LIMIT", config.recursion_limit);
        config.stack_bytes = parse_env_var("PYEXEC_STACK_BYTES", config.stack_bytes);
        config.log_level = parse_env_var("PYEXEC_LOG_LEVEL", config.log_level);

        config
    }
}
