//! Resource facts: filesystems, memory and CPU load.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::base::{FactsBuilder, FactsModule, collect_first_group, run_batch};
use super::tree::{CpuUtilization, FilesystemInfo, HardwareFacts};
use crate::error::Result;
use crate::runner::CommandRunner;

static DIRECTORY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^Directory of (\S+)/").unwrap());
static SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+) bytes total \((\d+) bytes free\)").unwrap());
static PROCESSOR_POOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Processor\s+(\S+|\d+)\s+(?P<total>\d+)\s+\d+\s+(?P<free>\d+)").unwrap()
});
static CPU_UTILIZATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^(?:Core\s(?P<core>\d+)?:)?
        (?:^|\s)CPU\sutilization\sfor\sfive\sseconds:
        (?:\s(?P<f_sec>\d+)?%)?
        (?:\s(?P<f_se_nom>\d+)%/(?P<f_s_denom>\d+)%\)?)?
        ;\sone\sminute:\s(?P<a_min>\d+)?%
        ;\sfive\sminutes:\s(?P<f_min>\d+)?%
        ",
    )
    .unwrap()
});

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Marker in `show memory statistics` output on platforms without it.
const MEMORY_UNSUPPORTED: &str = "Invalid input detected";

/// Hardware resources extractor.
pub struct HardwareModule;

impl HardwareModule {
    /// Filesystem names from `dir` output.
    pub fn parse_filesystems(data: &str) -> Vec<String> {
        collect_first_group(&DIRECTORY, data)
    }

    /// Per-filesystem space from `dir` output.
    ///
    /// Each `Directory of` line opens a record; the next totals line fills
    /// it in. Totals seen before any directory header are ignored.
    pub fn parse_filesystems_info(data: &str) -> IndexMap<String, FilesystemInfo> {
        let mut info: IndexMap<String, FilesystemInfo> = IndexMap::new();
        let mut current: Option<String> = None;

        for line in data.lines() {
            if let Some(caps) = DIRECTORY.captures(line) {
                let fs = caps[1].to_string();
                info.insert(fs.clone(), FilesystemInfo::default());
                current = Some(fs);
                continue;
            }

            let Some(caps) = SPACE.captures(line) else {
                continue;
            };
            if let Some(record) = current.as_ref().and_then(|fs| info.get_mut(fs)) {
                record.spacetotal_kb = caps[1].parse::<u64>().ok().map(|b| b / KIB);
                record.spacefree_kb = caps[2].parse::<u64>().ok().map(|b| b / KIB);
            }
        }

        info
    }

    /// Total and free processor memory in MiB from `show memory statistics`.
    ///
    /// The last `Processor` pool line wins.
    pub fn parse_memory(data: &str) -> Option<(u64, u64)> {
        data.lines()
            .filter_map(|line| PROCESSOR_POOL.captures(line))
            .filter_map(|caps| {
                let total = caps["total"].parse::<u64>().ok()?;
                let free = caps["free"].parse::<u64>().ok()?;
                Some((total / MIB, free / MIB))
            })
            .last()
    }

    /// CPU load per core from `show processes cpu` output.
    pub fn parse_cpu_utilization(data: &str) -> IndexMap<String, CpuUtilization> {
        let mut cores = IndexMap::new();

        for line in data.lines() {
            let Some(caps) = CPU_UTILIZATION.captures(line) else {
                continue;
            };

            let key = match caps.name("core") {
                Some(core) => format!("core_{}", core.as_str()),
                None => "core".to_string(),
            };

            let number = |name: &str| caps.name(name).and_then(|m| m.as_str().parse::<u32>().ok());
            let (Some(five_seconds), Some(one_minute), Some(five_minutes)) = (
                number("f_se_nom").or_else(|| number("f_sec")),
                number("a_min"),
                number("f_min"),
            ) else {
                continue;
            };

            cores.insert(
                key,
                CpuUtilization {
                    five_seconds,
                    one_minute,
                    five_minutes,
                    five_seconds_interrupt: number("f_s_denom"),
                },
            );
        }

        cores
    }
}

impl FactsModule for HardwareModule {
    const NAME: &'static str = "hardware";
    const COMMANDS: &'static [&'static str] = &[
        "dir",
        "show memory statistics",
        "show processes cpu | include CPU utilization",
    ];

    async fn populate<R: CommandRunner>(
        &self,
        runner: &mut R,
        facts: &mut FactsBuilder,
    ) -> Result<()> {
        let responses = run_batch(runner, Self::COMMANDS).await?;
        let mut hardware = HardwareFacts::default();

        if !responses[0].is_empty() {
            hardware.filesystems = Some(Self::parse_filesystems(&responses[0]));
            hardware.filesystems_info = Some(Self::parse_filesystems_info(&responses[0]));
        }

        hardware.cpu_utilization = Some(Self::parse_cpu_utilization(&responses[2]));

        let memory = &responses[1];
        if memory.contains(MEMORY_UNSUPPORTED) {
            facts.warn("Unable to gather memory statistics");
        } else if let Some((total, free)) = Self::parse_memory(memory) {
            hardware.memtotal_mb = Some(total);
            hardware.memfree_mb = Some(free);
        }

        facts.facts_mut().hardware = hardware;
        Ok(())
    }
}
