//! Replay runner backed by canned command output.

use std::future::Future;
use std::path::Path;

use indexmap::IndexMap;
use log::debug;

use super::CommandRunner;
use crate::error::{Result, RunnerError};

/// Header prefix that opens a command section in a transcript.
const TRANSCRIPT_HEADER: &str = "### ";

/// A [`CommandRunner`] that answers from a fixed command → output table.
///
/// Used for offline collection from captured output and in tests. Every
/// issued command is recorded so callers can assert which follow-up
/// commands were sent.
///
/// # Transcript format
///
/// ```text
/// ### show version
/// Cisco IOS Software, ...
/// ### show inventory
/// NAME: "Chassis", DESCR: "..."
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    outputs: IndexMap<String, String>,
    fallback: String,
    issued: Vec<String>,
}

impl ScriptedRunner {
    /// Create an empty runner. Unknown commands return an empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the output for a command.
    pub fn with_output(mut self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.outputs.insert(command.into(), output.into());
        self
    }

    /// Set the output returned for commands with no canned entry.
    pub fn with_fallback(mut self, output: impl Into<String>) -> Self {
        self.fallback = output.into();
        self
    }

    /// Parse a transcript into a runner.
    pub fn from_transcript(text: &str) -> Result<Self> {
        let mut outputs: IndexMap<String, String> = IndexMap::new();
        let mut current: Option<String> = None;

        for (idx, line) in text.lines().enumerate() {
            if let Some(command) = line.strip_prefix(TRANSCRIPT_HEADER) {
                let command = command.trim();
                if command.is_empty() {
                    return Err(RunnerError::Transcript {
                        line: idx + 1,
                        message: "empty command header".to_string(),
                    }
                    .into());
                }
                outputs.insert(command.to_string(), String::new());
                current = Some(command.to_string());
                continue;
            }

            match current.as_ref().and_then(|c| outputs.get_mut(c)) {
                Some(output) => {
                    if !output.is_empty() {
                        output.push('\n');
                    }
                    output.push_str(line);
                }
                None if line.trim().is_empty() => {}
                None => {
                    return Err(RunnerError::Transcript {
                        line: idx + 1,
                        message: "output before first command header".to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(Self {
            outputs,
            ..Self::default()
        })
    }

    /// Load a transcript from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(RunnerError::Io)?;
        Self::from_transcript(&text)
    }

    /// Commands issued so far, in order.
    pub fn issued(&self) -> &[String] {
        &self.issued
    }

    /// Check if a command has been issued.
    pub fn was_issued(&self, command: &str) -> bool {
        self.issued.iter().any(|c| c == command)
    }

    /// Number of canned outputs.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Check if no outputs are loaded.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&mut self, commands: &[&str]) -> impl Future<Output = Result<Vec<String>>> + Send {
        let outputs = commands
            .iter()
            .map(|cmd| {
                self.issued.push(cmd.to_string());
                match self.outputs.get(*cmd) {
                    Some(output) => output.clone(),
                    None => {
                        debug!("no canned output for '{}'", cmd);
                        self.fallback.clone()
                    }
                }
            })
            .collect();
        std::future::ready(Ok(outputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_outputs_are_positional() {
        let mut runner = ScriptedRunner::new()
            .with_output("show version", "version text")
            .with_output("dir", "dir text");

        let outputs = tokio_test::block_on(runner.run(&["dir", "show clock", "show version"]))
            .unwrap();
        assert_eq!(outputs, vec!["dir text", "", "version text"]);
        assert_eq!(runner.issued(), &["dir", "show clock", "show version"]);
        assert!(runner.was_issued("show clock"));
    }

    #[test]
    fn test_fallback_output() {
        let mut runner = ScriptedRunner::new()
            .with_fallback("% Invalid input detected at '^' marker.");
        let output = tokio_test::block_on(runner.run_one("show lldp")).unwrap();
        assert!(output.contains("Invalid input"));
    }

    #[test]
    fn test_transcript_parsing() {
        let text = "\n### show version\nCisco IOS Software\n\nuptime is 1 day\n### dir\nDirectory of flash:/\n";
        let runner = ScriptedRunner::from_transcript(text).unwrap();
        assert_eq!(runner.len(), 2);
        assert_eq!(
            runner.outputs.get("show version").unwrap(),
            "Cisco IOS Software\n\nuptime is 1 day"
        );
        assert_eq!(runner.outputs.get("dir").unwrap(), "Directory of flash:/");
    }

    #[test]
    fn test_transcript_rejects_leading_output() {
        let err = ScriptedRunner::from_transcript("stray\n### dir\n").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Runner(RunnerError::Transcript { line: 1, .. })
        ));
    }

    #[test]
    fn test_transcript_rejects_empty_header() {
        let err = ScriptedRunner::from_transcript("### show version\nx\n###  \n").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Runner(RunnerError::Transcript { line: 3, .. })
        ));
    }
}
