//! Replay example: gather facts from a captured session
//!
//! This example loads a transcript of show-command output and runs the
//! facts collector over it, printing the result as JSON.
//!
//! # Transcript format
//!
//! Each command starts with a `### <command>` line, followed by its output.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example replay -- --transcript examples/transcripts/catalyst.txt --subset all
//! ```
//!
//! Exclude subsets with a leading `!`:
//! ```bash
//! cargo run --example replay -- --transcript capture.txt --subset all --subset '!config'
//! ```

use std::env;
use std::path::PathBuf;

use iosfacts::{FactsCollector, ScriptedRunner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut runner = ScriptedRunner::from_file(&args.transcript)?;
    eprintln!(
        "Loaded {} command outputs from {}",
        runner.len(),
        args.transcript.display()
    );

    let collector = FactsCollector::builder()
        .gather_subset(args.subsets)
        .build()?;

    let gathered = collector.collect(&mut runner).await?;

    for warning in &gathered.warnings {
        eprintln!("warning: {}", warning);
    }

    println!("{}", serde_json::to_string_pretty(&gathered.facts)?);

    Ok(())
}

struct Args {
    transcript: PathBuf,
    subsets: Vec<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut transcript = PathBuf::from("examples/transcripts/catalyst.txt");
        let mut subsets = Vec::new();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--transcript" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        transcript = PathBuf::from(&args[i]);
                    }
                }
                "--subset" | "-s" => {
                    i += 1;
                    if i < args.len() {
                        subsets.push(args[i].clone());
                    }
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {}
            }
            i += 1;
        }

        if subsets.is_empty() {
            subsets.push("all".to_string());
        }

        Self {
            transcript,
            subsets,
        }
    }

    fn print_help() {
        println!("Usage: replay [OPTIONS]");
        println!();
        println!("Options:");
        println!("  -t, --transcript <PATH>  Transcript file [default: examples/transcripts/catalyst.txt]");
        println!("  -s, --subset <NAME>      Gather subset, repeatable [default: all]");
        println!("      --help               Print help");
    }
}
