//! Device identity facts: software family, serial numbers, stacking and VSS.

use once_cell::sync::Lazy;
use regex::Regex;

use super::base::{FactsBuilder, FactsModule, collect_first_group, first_group, run_batch, usable};
use super::tree::{DeviceFacts, IosType, OperatingMode, VirtualSwitch};
use crate::capabilities::Capabilities;
use crate::error::Result;
use crate::runner::{CommandRunner, INVALID_INPUT};

static IOS_XE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\sIOS-XE\s").unwrap());
static OPERATING_MODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Router\soperating\smode: (\S+)").unwrap());
static SERIALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"board ID (\S+)").unwrap());
static STACKED_MODEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Model [Nn]umber\s+: (\S+)").unwrap());
static STACKED_SERIALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^System [Ss]erial [Nn]umber\s+: (\S+)").unwrap());
static VSS_DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Virtual switch domain number : ([0-9]+)").unwrap());
static VSS_SERIALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)System".*?SN:\s*(\S+)"#).unwrap());

/// `show switch virtual` markers meaning there is no VSS to report.
const VSS_ERRORS: &[&str] = &[INVALID_INPUT, "Switch Mode : Standalone"];

/// Identity extractor.
///
/// Combines the capability record with what `show version`,
/// `show switch virtual` and `show inventory` reveal.
pub struct DefaultModule {
    capabilities: Capabilities,
}

impl DefaultModule {
    /// Create the extractor with already discovered capabilities.
    pub fn new(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    /// Copy capability fields into the facts.
    pub fn apply_capabilities(&self, facts: &mut DeviceFacts) {
        let caps = &self.capabilities;
        facts.system = Some(caps.network_os.clone());
        facts.model = caps.network_os_model.clone().filter(|v| !v.is_empty());
        facts.image = caps.network_os_image.clone().filter(|v| !v.is_empty());
        facts.version = caps.network_os_version.clone().filter(|v| !v.is_empty());
        facts.platform = caps.network_os_platform.clone().filter(|v| !v.is_empty());
        facts.hostname = caps.network_os_hostname.clone().filter(|v| !v.is_empty());
        facts.api = Some(caps.network_api.clone());
        facts.collector_version = Some(env!("CARGO_PKG_VERSION").to_string());
    }

    /// Parse `show version` output.
    pub fn parse_version(data: &str, facts: &mut DeviceFacts) {
        let iostype = parse_iostype(data);
        facts.iostype = Some(iostype);
        facts.operatingmode = Some(parse_operatingmode(data, iostype));
        facts.serialnum = first_group(&SERIALNUM, data);
        parse_stacks(data, facts);
    }

    /// Parse concatenated `show switch virtual` and `show inventory` output.
    pub fn parse_virtual_switch(data: &str, facts: &mut DeviceFacts) {
        if let Some(caps) = VSS_DOMAIN.captures(data) {
            facts.virtual_switch = Some(VirtualSwitch::Vss);
            facts.virtual_switch_domain = Some(caps[1].to_string());
        }

        let serials = collect_first_group(&VSS_SERIALNUM, data);
        if !serials.is_empty() {
            facts.virtual_switch_serialnums = serials;
        }
    }
}

impl FactsModule for DefaultModule {
    const NAME: &'static str = "default";
    const COMMANDS: &'static [&'static str] =
        &["show version", "show switch virtual", "show inventory"];

    async fn populate<R: CommandRunner>(
        &self,
        runner: &mut R,
        facts: &mut FactsBuilder,
    ) -> Result<()> {
        let responses = run_batch(runner, Self::COMMANDS).await?;
        let device = &mut facts.facts_mut().device;

        self.apply_capabilities(device);

        if !responses[0].is_empty() {
            Self::parse_version(&responses[0], device);
        }

        let data = format!("{}{}", responses[1], responses[2]);
        if usable(&data, VSS_ERRORS) {
            Self::parse_virtual_switch(&data, device);
        }

        Ok(())
    }
}

fn parse_iostype(data: &str) -> IosType {
    if IOS_XE.is_match(data) {
        IosType::IosXe
    } else {
        IosType::Ios
    }
}

// Releases predating the operating mode line are always autonomous.
fn parse_operatingmode(data: &str, iostype: IosType) -> OperatingMode {
    let autonomous = OPERATING_MODE
        .captures(data)
        .is_some_and(|c| c[1].to_lowercase().contains("autonomous"));

    if autonomous || iostype == IosType::Ios {
        OperatingMode::Autonomous
    } else {
        OperatingMode::Controller
    }
}

fn parse_stacks(data: &str, facts: &mut DeviceFacts) {
    let models = collect_first_group(&STACKED_MODEL, data);
    let serials = collect_first_group(&STACKED_SERIALNUM, data);

    if !models.is_empty() {
        facts.stacked_models = models;
        facts.virtual_switch = Some(VirtualSwitch::Stack);
    }
    if !serials.is_empty() {
        facts.stacked_serialnums = serials;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScriptedRunner;

    const IOS_XE_VERSION: &str = "Cisco IOS XE Software, Version 16.12.04\n\
Cisco IOS Software [Gibraltar], Catalyst L3 Switch Software (CAT9K_IOSXE), Version 16.12.4, RELEASE SOFTWARE (fc5)\n\
Router operating mode: Autonomous\n\
Processor board ID FCW2233A0AB\n\
Model Number                       : C9300-48P\n\
System Serial Number               : FCW2233A0AB\n\
Model Number                       : C9300-24T\n\
System Serial Number               : FCW2233B0CD\n";

    const VSS_OUTPUT: &str = "Executing the command on VSS member switch role = VSS Active, id = 1\n\
\n\
Switch mode                  : Virtual Switch\n\
Virtual switch domain number : 100\n\
Local switch number          : 1\n";

    const INVENTORY: &str = "NAME: \"Switch 1 System\", DESCR: \"Cisco Systems, Inc. WS-C6509-E 9 slot switch\"\n\
PID: WS-C6509-E        , VID: V05, SN: SMC1111A0AA\n\
\n\
NAME: \"Switch 2 System\", DESCR: \"Cisco Systems, Inc. WS-C6509-E 9 slot switch\"\n\
PID: WS-C6509-E        , VID: V05, SN: SMC2222B0BB\n";

    #[test]
    fn test_iostype() {
        assert_eq!(parse_iostype("IOS-XE software"), IosType::Ios);
        assert_eq!(parse_iostype("Cisco IOS-XE, Version"), IosType::Ios);
        assert_eq!(parse_iostype("Cisco IOS XE Software"), IosType::Ios);
        assert_eq!(parse_iostype("running IOS-XE software"), IosType::IosXe);
        assert_eq!(parse_iostype("Cisco IOS-XE\n"), IosType::IosXe);
        assert_eq!(parse_iostype("ROM: IOS-XE ROMMON"), IosType::IosXe);
        assert_eq!(parse_iostype("Cisco IOS Software"), IosType::Ios);
    }

    #[test]
    fn test_operatingmode() {
        assert_eq!(
            parse_operatingmode("Router operating mode: Controller-Managed", IosType::Ios),
            OperatingMode::Autonomous
        );
        assert_eq!(
            parse_operatingmode("no mode line", IosType::Ios),
            OperatingMode::Autonomous
        );
        assert_eq!(
            parse_operatingmode("Router operating mode: Autonomous", IosType::IosXe),
            OperatingMode::Autonomous
        );
        assert_eq!(
            parse_operatingmode("Router operating mode: Controller-Managed", IosType::IosXe),
            OperatingMode::Controller
        );
        assert_eq!(
            parse_operatingmode("no mode line", IosType::IosXe),
            OperatingMode::Controller
        );
    }

    #[test]
    fn test_serial_and_stack() {
        let mut facts = DeviceFacts::default();
        DefaultModule::parse_version(
            "board ID FXS12345\nSystem Serial Number : ABC999\nModel Number : WS-C123",
            &mut facts,
        );
        assert_eq!(facts.serialnum.as_deref(), Some("FXS12345"));
        assert_eq!(facts.stacked_models, vec!["WS-C123"]);
        assert_eq!(facts.stacked_serialnums, vec!["ABC999"]);
        assert_eq!(facts.virtual_switch, Some(VirtualSwitch::Stack));
    }

    #[test]
    fn test_stack_members() {
        let mut facts = DeviceFacts::default();
        DefaultModule::parse_version(IOS_XE_VERSION, &mut facts);
        assert_eq!(facts.iostype, Some(IosType::Ios));
        assert_eq!(facts.operatingmode, Some(OperatingMode::Autonomous));
        assert_eq!(facts.serialnum.as_deref(), Some("FCW2233A0AB"));
        assert_eq!(facts.stacked_models, vec!["C9300-48P", "C9300-24T"]);
        assert_eq!(facts.stacked_serialnums, vec!["FCW2233A0AB", "FCW2233B0CD"]);
    }

    #[test]
    fn test_serials_without_models_do_not_mark_stack() {
        let mut facts = DeviceFacts::default();
        DefaultModule::parse_version("System serial number : ABC1\n", &mut facts);
        assert_eq!(facts.stacked_serialnums, vec!["ABC1"]);
        assert!(facts.stacked_models.is_empty());
        assert_eq!(facts.virtual_switch, None);
    }

    #[test]
    fn test_virtual_switch() {
        let mut facts = DeviceFacts::default();
        let data = format!("{}{}", VSS_OUTPUT, INVENTORY);
        DefaultModule::parse_virtual_switch(&data, &mut facts);
        assert_eq!(facts.virtual_switch, Some(VirtualSwitch::Vss));
        assert_eq!(facts.virtual_switch_domain.as_deref(), Some("100"));
        assert_eq!(
            facts.virtual_switch_serialnums,
            vec!["SMC1111A0AA", "SMC2222B0BB"]
        );
    }

    #[tokio::test]
    async fn test_populate_skips_standalone_vss() {
        let mut runner = ScriptedRunner::new()
            .with_output("show version", "Cisco IOS Software\nProcessor board ID FOC1\n")
            .with_output("show switch virtual", "Switch Mode : Standalone\n")
            .with_output("show inventory", INVENTORY);

        let mut builder = FactsBuilder::new();
        DefaultModule::new(Capabilities::new("ios", "cliconf"))
            .populate(&mut runner, &mut builder)
            .await
            .unwrap();

        let device = &builder.facts().device;
        assert_eq!(device.system.as_deref(), Some("ios"));
        assert_eq!(device.api.as_deref(), Some("cliconf"));
        assert_eq!(device.iostype, Some(IosType::Ios));
        assert_eq!(device.serialnum.as_deref(), Some("FOC1"));
        assert_eq!(device.virtual_switch, None);
        assert!(device.virtual_switch_serialnums.is_empty());
    }

    #[tokio::test]
    async fn test_populate_vss_overrides_stack() {
        let mut runner = ScriptedRunner::new()
            .with_output("show version", "Model Number : WS-C6509-E\n")
            .with_output("show switch virtual", VSS_OUTPUT)
            .with_output("show inventory", INVENTORY);

        let mut builder = FactsBuilder::new();
        DefaultModule::new(Capabilities::new("ios", "cliconf"))
            .populate(&mut runner, &mut builder)
            .await
            .unwrap();

        let device = &builder.facts().device;
        assert_eq!(device.stacked_models, vec!["WS-C6509-E"]);
        assert_eq!(device.virtual_switch, Some(VirtualSwitch::Vss));
        assert_eq!(device.virtual_switch_domain.as_deref(), Some("100"));
    }

    #[tokio::test]
    async fn test_populate_empty_version() {
        let mut runner = ScriptedRunner::new();
        let mut builder = FactsBuilder::new();
        DefaultModule::new(Capabilities::new("ios", "cliconf"))
            .populate(&mut runner, &mut builder)
            .await
            .unwrap();

        let device = &builder.facts().device;
        assert_eq!(device.iostype, None);
        assert_eq!(device.operatingmode, None);
        assert!(device.collector_version.is_some());
    }
}
