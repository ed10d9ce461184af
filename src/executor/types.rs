// Data types for Executor module

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use std::io;

/// Tool definition handed to whatever agent framework drives the tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "input_schema")]
    pub input_schema: serde_json::Value,
}

/// Output from a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// The encoded result text
    pub content: String,
    /// Whether the execution resulted in an error
    #[serde(default)]
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// JSON layout of Python's `json.dumps` defaults: `", "` and `": "`
/// separators, and every character outside printable ASCII escaped.
struct DumpsFormatter;

impl Formatter for DumpsFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if (' '..='~').contains(&c) {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Outcome of running one code block.
///
/// Serializes as `{"output": "..."}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionResult {
    Output(String),
    Error(String),
}

impl ExecutionResult {
    pub fn is_error(&self) -> bool {
        matches!(self, ExecutionResult::Error(_))
    }

    /// Encoded JSON object, the form callers and the reward scorer see
    pub fn encode(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, DumpsFormatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf).map_err(serde::ser::Error::custom)
    }
}

impl From<ExecutionResult> for ToolOutput {
    fn from(result: ExecutionResult) -> Self {
        let is_error = result.is_error();
        let content = match result.encode() {
            Ok(content) => content,
            Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
        };
        if is_error {
            ToolOutput::error(content)
        } else {
            ToolOutput::success(content)
        }
    }
}
