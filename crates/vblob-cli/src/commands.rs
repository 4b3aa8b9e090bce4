use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::{debug, info};
use vblob_diff::SnapshotDiffer;
use vblob_ledger::{Ledger, ReplayEngine, VersionInfo};
use vblob_store::Blob;
use vblob_types::Replacement;

use crate::cli::*;
use crate::config::CliConfig;
use crate::script::EditScript;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Log(args) => cmd_log(&config, args, cli.format),
        Command::Show(args) => cmd_show(&config, args, cli.format),
        Command::Diff(args) => cmd_diff(&config, args, cli.format),
        Command::Script(args) => cmd_script(&config, args, cli.format),
    }
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

/// Seed a ledger with `seed` and append a snapshot diff per further file.
pub fn ledger_from_snapshots(
    config: &CliConfig,
    seed: &Path,
    snapshots: &[PathBuf],
) -> anyhow::Result<Ledger> {
    let mut ledger = Ledger::with_config(Blob::root(read_file(seed)?), config.ledger.clone());
    let differ = SnapshotDiffer::new(config.differ.clone());
    for path in snapshots {
        let after = read_file(path)?;
        let diff = differ
            .diff_against(&ledger.latest(), &after)
            .with_context(|| format!("diffing {}", path.display()))?;
        let version = ledger.append(diff)?;
        debug!(version, path = %path.display(), "appended snapshot");
    }
    Ok(ledger)
}

fn cmd_log(config: &CliConfig, args: LogArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = ledger_from_snapshots(config, &args.seed, &args.snapshots)?;
    print_history(&ledger.history()?, format)
}

#[derive(Serialize)]
struct ShownVersion {
    #[serde(flatten)]
    info: VersionInfo,
    content: String,
}

fn cmd_show(config: &CliConfig, args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let ledger = ledger_from_snapshots(config, &args.seed, &args.snapshots)?;
    let bytes = ledger.get(args.at)?.read_all();
    match format {
        OutputFormat::Text => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
        OutputFormat::Json => {
            let shown = ShownVersion {
                info: ledger.info(args.at)?,
                content: String::from_utf8_lossy(&bytes).into_owned(),
            };
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
    }
    Ok(())
}

fn cmd_diff(config: &CliConfig, args: DiffArgs, format: OutputFormat) -> anyhow::Result<()> {
    let before = read_file(&args.before)?;
    let after = read_file(&args.after)?;
    let diff = SnapshotDiffer::new(config.differ.clone()).diff(&before, &after)?;
    let replacements = diff.replacements().map(|set| set.as_slice()).unwrap_or(&[]);
    match format {
        OutputFormat::Text => {
            if replacements.is_empty() {
                println!("No changes.");
            }
            for entry in replacements {
                println!("{}", describe(entry));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(replacements)?),
    }
    Ok(())
}

fn cmd_script(config: &CliConfig, args: ScriptArgs, format: OutputFormat) -> anyhow::Result<()> {
    let script = fs::read_to_string(&args.script)
        .with_context(|| format!("reading {}", args.script.display()))?;
    let script = EditScript::parse(&script)?;
    let mut ledger = Ledger::with_config(Blob::root(read_file(&args.seed)?), config.ledger.clone());
    script.apply(&mut ledger)?;

    let report = ReplayEngine::verify(&ledger)?;
    if !report.is_valid() {
        anyhow::bail!(
            "replay diverged at {} of {} versions",
            report.mismatches.len(),
            report.versions
        );
    }
    info!(versions = report.versions, "replay verified");
    print_history(&ledger.history()?, format)
}

/// One-line rendering of a replacement, e.g. `@4 -3 +5 "hello"`.
pub fn describe(entry: &Replacement<u8>) -> String {
    format!(
        "{} {} {} {:?}",
        format!("@{}", entry.offset).yellow(),
        format!("-{}", entry.length).red(),
        format!("+{}", entry.payload.len()).green(),
        String::from_utf8_lossy(&entry.payload)
    )
}

fn print_history(history: &[VersionInfo], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!(
                "{:>7}  {:>8}  {:>5}  {:>8}  {}",
                "version".bold(),
                "size".bold(),
                "edits".bold(),
                "payload".bold(),
                "fingerprint".bold()
            );
            for info in history {
                println!(
                    "{:>7}  {:>8}  {:>5}  {:>8}  {}",
                    info.version.to_string().yellow(),
                    info.size,
                    info.edit_count,
                    info.payload_bytes,
                    info.fingerprint.short_hex().dimmed()
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(history)?),
    }
    Ok(())
}
