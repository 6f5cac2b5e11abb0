//! Device capability discovery.
//!
//! Capabilities identify the device before any facts are parsed: network OS,
//! model, image, software version and hostname. The default extractor copies
//! them into the facts tree.

use std::future::Future;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::runner::CommandRunner;

static VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"Version (\S+)").unwrap());
static MODEL: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"(?m)^[Cc]isco (.+) \(revision").unwrap(),
        Regex::new(r"(?m)^[Cc]isco (\S+).+bytes of .*memory").unwrap(),
    ]
});
static HOSTNAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(.+) uptime").unwrap());
static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"image file is "(.+)""#).unwrap());

/// Identity record returned by capability discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Network OS family (e.g. "ios").
    pub network_os: String,

    /// Hardware model.
    pub network_os_model: Option<String>,

    /// Boot image path.
    pub network_os_image: Option<String>,

    /// Software version.
    pub network_os_version: Option<String>,

    /// Platform string.
    pub network_os_platform: Option<String>,

    /// Device hostname.
    pub network_os_hostname: Option<String>,

    /// Management API channel label (e.g. "cliconf").
    pub network_api: String,
}

impl Capabilities {
    /// Create capabilities with only the required fields set.
    pub fn new(network_os: impl Into<String>, network_api: impl Into<String>) -> Self {
        Self {
            network_os: network_os.into(),
            network_api: network_api.into(),
            ..Self::default()
        }
    }

    /// Derive capabilities from `show version` output.
    pub fn from_show_version(data: &str) -> Self {
        let data = data.trim();
        let mut caps = Self::new("ios", "cliconf");

        caps.network_os_version = VERSION
            .captures(data)
            .map(|c| c[1].trim_end_matches(',').to_string());

        caps.network_os_model = MODEL.iter().find_map(|re| {
            re.captures(data)
                .and_then(|c| c[1].split(' ').next().map(str::to_string))
        });

        caps.network_os_hostname = HOSTNAME.captures(data).map(|c| c[1].to_string());
        caps.network_os_image = IMAGE.captures(data).map(|c| c[1].to_string());

        caps
    }
}

/// Trait for capability discovery.
pub trait CapabilityProvider: Send {
    /// Discover the device identity.
    fn discover(&mut self) -> impl Future<Output = Result<Capabilities>> + Send;
}

/// Pre-computed capabilities act as their own provider.
impl CapabilityProvider for Capabilities {
    fn discover(&mut self) -> impl Future<Output = Result<Capabilities>> + Send {
        std::future::ready(Ok(self.clone()))
    }
}

/// Discovers capabilities by running `show version` on the device.
pub struct CliCapabilities<'r, R> {
    runner: &'r mut R,
}

impl<'r, R: CommandRunner> CliCapabilities<'r, R> {
    /// Wrap a runner.
    pub fn new(runner: &'r mut R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> CapabilityProvider for CliCapabilities<'_, R> {
    async fn discover(&mut self) -> Result<Capabilities> {
        let output = self.runner.run_one("show version").await?;
        Ok(Capabilities::from_show_version(&output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScriptedRunner;

    const SHOW_VERSION: &str = r#"Cisco IOS XE Software, Version 16.09.03
Cisco IOS Software [Fuji], Catalyst L3 Switch Software (CAT3K_CAA-UNIVERSALK9-M), Version 16.9.3, RELEASE SOFTWARE (fc2)
ROM: IOS-XE ROMMON
BOOTLDR: CAT3K_CAA Boot Loader (CAT3K_CAA-HBOOT-M) Version 4.313, RELEASE SOFTWARE (P)

sw-core-01 uptime is 2 weeks, 3 days, 4 hours, 12 minutes
Uptime for this control processor is 2 weeks, 3 days, 4 hours, 14 minutes
System returned to ROM by reload
System image file is "flash:packages.conf"

cisco WS-C3850-24P (MIPS) processor (revision AB0) with 795686K/6147K bytes of memory.
Processor board ID FOC1234X0AB
"#;

    #[test]
    fn test_from_show_version() {
        let caps = Capabilities::from_show_version(SHOW_VERSION);
        assert_eq!(caps.network_os, "ios");
        assert_eq!(caps.network_api, "cliconf");
        assert_eq!(caps.network_os_version.as_deref(), Some("16.09.03"));
        assert_eq!(caps.network_os_model.as_deref(), Some("WS-C3850-24P"));
        assert_eq!(caps.network_os_hostname.as_deref(), Some("sw-core-01"));
        assert_eq!(caps.network_os_image.as_deref(), Some("flash:packages.conf"));
        assert_eq!(caps.network_os_platform, None);
    }

    #[test]
    fn test_version_trailing_comma_stripped() {
        let caps = Capabilities::from_show_version(
            "Cisco IOS Software, C2960 Software (C2960-LANBASEK9-M), Version 12.2(55)SE5, RELEASE SOFTWARE (fc1)",
        );
        assert_eq!(caps.network_os_version.as_deref(), Some("12.2(55)SE5"));
    }

    #[test]
    fn test_empty_output() {
        let caps = Capabilities::from_show_version("");
        assert_eq!(caps, Capabilities::new("ios", "cliconf"));
    }

    #[tokio::test]
    async fn test_cli_discovery() {
        let mut runner = ScriptedRunner::new().with_output("show version", SHOW_VERSION);
        let caps = CliCapabilities::new(&mut runner).discover().await.unwrap();
        assert_eq!(caps.network_os_hostname.as_deref(), Some("sw-core-01"));
        assert!(runner.was_issued("show version"));
    }

    #[tokio::test]
    async fn test_static_capabilities() {
        let mut caps = Capabilities::new("ios", "cliconf");
        caps.network_os_platform = Some("C3850".to_string());
        let discovered = caps.discover().await.unwrap();
        assert_eq!(discovered, caps);
    }
}
