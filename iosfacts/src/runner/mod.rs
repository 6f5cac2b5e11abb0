//! Command execution seam.
//!
//! The facts extractors never talk to a device directly. They hand a batch
//! of show-commands to a [`CommandRunner`] and get back one text blob per
//! command, in the same order. Any session driver (SSH, console server,
//! replayed capture) can sit behind this trait.

mod scripted;

pub use scripted::ScriptedRunner;

use std::future::Future;

use crate::error::Result;

/// Text returned by IOS when a command is not supported.
pub const INVALID_INPUT: &str = "Invalid input";

/// Trait for anything that can execute CLI commands on a device.
pub trait CommandRunner: Send {
    /// Execute a batch of commands.
    ///
    /// The returned vector holds exactly one entry per command, positionally
    /// aligned with `commands`. A command the device rejects still yields an
    /// entry: either empty or carrying the device's error text. `Err` is
    /// reserved for failures of the session itself.
    fn run(&mut self, commands: &[&str]) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Execute a single command.
    fn run_one(&mut self, command: &str) -> impl Future<Output = Result<String>> + Send {
        async move {
            let mut outputs = self.run(&[command]).await?;
            Ok(outputs.pop().unwrap_or_default())
        }
    }
}

impl<R: CommandRunner> CommandRunner for &mut R {
    fn run(&mut self, commands: &[&str]) -> impl Future<Output = Result<Vec<String>>> + Send {
        (**self).run(commands)
    }
}
