//! Shared extractor contract.

use std::future::Future;

use log::{debug, warn};
use regex::Regex;

use super::tree::Facts;
use crate::error::{FactsError, Result};
use crate::runner::CommandRunner;

/// Accumulates facts and warnings across extractors.
///
/// Owned by the collector and lent to one extractor at a time.
#[derive(Debug, Default)]
pub struct FactsBuilder {
    facts: Facts,
    warnings: Vec<String>,
}

impl FactsBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable access to the facts under construction.
    pub fn facts_mut(&mut self) -> &mut Facts {
        &mut self.facts
    }

    /// The facts collected so far.
    pub fn facts(&self) -> &Facts {
        &self.facts
    }

    /// Record a human-readable warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Consume the builder.
    pub fn finish(self) -> GatheredFacts {
        GatheredFacts {
            facts: self.facts,
            warnings: self.warnings,
        }
    }
}

/// Result of a collection run.
#[derive(Debug, Clone, PartialEq)]
pub struct GatheredFacts {
    /// The facts tree.
    pub facts: Facts,

    /// Notices about facts that could not be gathered.
    pub warnings: Vec<String>,
}

/// One facts extractor: a fixed command batch and a parser for its output.
pub trait FactsModule: Sync {
    /// Subset name this module is gathered under; also reported in
    /// `gather_subset`.
    const NAME: &'static str;

    /// Commands issued as the initial batch, in response order.
    const COMMANDS: &'static [&'static str];

    /// Issue the command batch and write the parsed facts.
    fn populate<R: CommandRunner>(
        &self,
        runner: &mut R,
        facts: &mut FactsBuilder,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Run a module's command batch, checking the response count.
pub(crate) async fn run_batch<R: CommandRunner>(
    runner: &mut R,
    commands: &[&str],
) -> Result<Vec<String>> {
    debug!("running {:?}", commands);
    let responses = runner.run(commands).await?;
    if responses.len() != commands.len() {
        return Err(FactsError::ResponseMismatch {
            expected: commands.len(),
            actual: responses.len(),
        }
        .into());
    }
    Ok(responses)
}

/// Check that command output is present and free of the given error markers.
pub(crate) fn usable(output: &str, errors: &[&str]) -> bool {
    !output.is_empty() && !errors.iter().any(|e| output.contains(e))
}

/// First capture group of the first match.
pub(crate) fn first_group(re: &Regex, data: &str) -> Option<String> {
    re.captures(data).map(|c| c[1].to_string())
}

/// First capture group of every match, in order.
pub(crate) fn collect_first_group(re: &Regex, data: &str) -> Vec<String> {
    re.captures_iter(data).map(|c| c[1].to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ShortRunner;

    impl CommandRunner for ShortRunner {
        fn run(&mut self, _commands: &[&str]) -> impl Future<Output = Result<Vec<String>>> + Send {
            std::future::ready(Ok(vec![String::new()]))
        }
    }

    #[tokio::test]
    async fn test_response_count_mismatch() {
        let err = run_batch(&mut ShortRunner, &["dir", "show memory statistics"])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Facts(FactsError::ResponseMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_usable() {
        assert!(usable("LLDP neighbors", &["Invalid input"]));
        assert!(!usable("", &["Invalid input"]));
        assert!(!usable("% Invalid input detected", &["Invalid input"]));
    }

    #[test]
    fn test_warnings_accumulate() {
        let mut builder = FactsBuilder::new();
        builder.warn("first");
        builder.warn("second");
        let gathered = builder.finish();
        assert_eq!(gathered.warnings, vec!["first", "second"]);
    }
}
