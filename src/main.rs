mod executor;

use clap::Parser;
use executor::{Executor, ExecutorConfig, TOOL_NAME};
use std::io::Read;
use std::path::PathBuf;
use std::process;
use tracing::{debug, error, info};
use tracing_subscriber::fmt;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "pyexec")]
#[command(about = "Run Python code against the python_executor tool")]
struct Cli {
    /// Code to execute
    #[arg(short, long, conflicts_with = "file")]
    code: Option<String>,

    /// Read the code from a file instead (stdin when neither is given)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Also print the reward for the run
    #[arg(short, long)]
    reward: bool,

    /// Print the tool definition and exit
    #[arg(long)]
    schema: bool,
}

fn read_code(cli: &Cli) -> std::io::Result<String> {
    if let Some(code) = &cli.code {
        return Ok(code.clone());
    }
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path);
    }
    let mut code = String::new();
    std::io::stdin().read_to_string(&mut code)?;
    Ok(code)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = ExecutorConfig::from_env();

    // Results go to stdout, logs to stderr
    fmt()
        .with_writer(std::io::stderr)
        .with_max_level(config.log_level)
        .with_target(true)
        .init();

    let executor = Executor::new(config);
    debug!(config = ?executor.config(), "configuration loaded");

    if cli.schema {
        let defs = executor.tool_definitions();
        println!("{}", serde_json::to_string_pretty(&defs)?);
        return Ok(());
    }

    let code = match read_code(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "failed to read code");
            process::exit(1);
        }
    };

    let input = serde_json::json!({ "code": code });
    let output = match executor.execute(TOOL_NAME, input.clone()).await {
        Ok(output) => output,
        Err(e) => {
            error!(error = %e, "execution failed");
            process::exit(1);
        }
    };

    println!("{}", output.content);

    if cli.reward {
        let reward = executor.calculate_reward(TOOL_NAME, &input, &output.content)?;
        info!(reward = reward, "reward calculated");
        println!("reward: {}", reward);
    }

    Ok(())
}
