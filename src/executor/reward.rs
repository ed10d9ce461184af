// Reward heuristic for python_executor invocations

use serde_json::Value;

/// Characters counted as operations by the complexity measure
const OPERATOR_CHARS: &str = "+-*/()[]{}:";

const BASE_REWARD: f64 = 0.4;
const MAX_REWARD: f64 = 0.5;
const ERROR_REWARD: f64 = 0.05;
const COMPLEXITY_WEIGHT: f64 = 0.02;
const COMPLEXITY_CAP: f64 = 0.1;

/// Scores an invocation from its arguments and encoded result.
///
/// The result is matched by substring, so a successful run whose output
/// contains the word `error` scores as a failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewardScorer;

impl RewardScorer {
    /// Lines of `code` plus its operator characters
    pub fn complexity(code: &str) -> usize {
        let lines = code.split('\n').count();
        let operators = code.chars().filter(|c| OPERATOR_CHARS.contains(*c)).count();
        lines + operators
    }

    pub fn calculate_reward(args: &Value, result: &str) -> f64 {
        if result.contains("No code provided") {
            return 0.0;
        }
        if result.contains("error") {
            return ERROR_REWARD;
        }

        let code = args.get("code").and_then(Value::as_str).unwrap_or("");
        let bonus = (COMPLEXITY_WEIGHT * Self::complexity(code) as f64).min(COMPLEXITY_CAP);
        (BASE_REWARD + bonus).min(MAX_REWARD)
    }
}
