//! Running configuration.

use once_cell::sync::Lazy;
use regex::Regex;

use super::base::{FactsBuilder, FactsModule, run_batch};
use crate::error::Result;
use crate::runner::CommandRunner;

static BANNER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\ABuilding configuration\.{3}\s+Current configuration : \d+ bytes\n").unwrap()
});

/// Running configuration extractor.
pub struct ConfigModule;

impl ConfigModule {
    /// Remove the leading `Building configuration...` banner.
    ///
    /// Banner text further down (e.g. inside `banner motd`) is kept.
    pub fn strip_banner(data: &str) -> String {
        BANNER.replacen(data, 1, "").into_owned()
    }
}

impl FactsModule for ConfigModule {
    const NAME: &'static str = "config";
    const COMMANDS: &'static [&'static str] = &["show running-config"];

    async fn populate<R: CommandRunner>(
        &self,
        runner: &mut R,
        facts: &mut FactsBuilder,
    ) -> Result<()> {
        let responses = run_batch(runner, Self::COMMANDS).await?;
        if !responses[0].is_empty() {
            facts.facts_mut().config = Some(Self::strip_banner(&responses[0]));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScriptedRunner;

    #[test]
    fn test_strip_banner() {
        let data = "Building configuration...\n\nCurrent configuration : 1234 bytes\n!\nversion 15.2\n\nhostname sw1\n";
        assert_eq!(
            ConfigModule::strip_banner(data),
            "!\nversion 15.2\n\nhostname sw1\n"
        );
    }

    #[test]
    fn test_strip_banner_once() {
        let data = "Building configuration...\nCurrent configuration : 10 bytes\nbanner motd ^C\nBuilding configuration...\nCurrent configuration : 10 bytes\n^C\n";
        assert_eq!(
            ConfigModule::strip_banner(data),
            "banner motd ^C\nBuilding configuration...\nCurrent configuration : 10 bytes\n^C\n"
        );
    }

    #[test]
    fn test_banner_text_inside_config_kept() {
        let data = "!\nbanner motd ^C\nBuilding configuration...\nCurrent configuration : 10 bytes\n^C\nend\n";
        assert_eq!(ConfigModule::strip_banner(data), data);
    }

    #[test]
    fn test_no_banner() {
        assert_eq!(ConfigModule::strip_banner("!\nend\n"), "!\nend\n");
    }

    #[tokio::test]
    async fn test_populate() {
        let mut runner = ScriptedRunner::new().with_output(
            "show running-config",
            "Building configuration...\n\nCurrent configuration : 42 bytes\nhostname r1\nend",
        );
        let mut builder = FactsBuilder::new();
        ConfigModule.populate(&mut runner, &mut builder).await.unwrap();
        assert_eq!(builder.facts().config.as_deref(), Some("hostname r1\nend"));
    }

    #[tokio::test]
    async fn test_populate_empty() {
        let mut runner = ScriptedRunner::new();
        let mut builder = FactsBuilder::new();
        ConfigModule.populate(&mut runner, &mut builder).await.unwrap();
        assert_eq!(builder.facts().config, None);
    }
}
