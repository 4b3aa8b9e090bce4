use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vblob", about = "vblob -- versioned blob ledger", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with `[ledger]` and `[differ]` settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a ledger from snapshot files and print its version table
    Log(LogArgs),
    /// Print the bytes of one version
    Show(ShowArgs),
    /// Print the replacements turning one file into another
    Diff(DiffArgs),
    /// Apply a JSON edit script, one ledger version per entry, and verify it
    Script(ScriptArgs),
}

#[derive(Args)]
pub struct LogArgs {
    /// Version 0 contents
    pub seed: PathBuf,
    /// Later snapshots, appended in order
    pub snapshots: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub seed: PathBuf,
    pub snapshots: Vec<PathBuf>,
    #[arg(short = 'n', long = "version", value_name = "N")]
    pub at: usize,
}

#[derive(Args)]
pub struct DiffArgs {
    pub before: PathBuf,
    pub after: PathBuf,
}

#[derive(Args)]
pub struct ScriptArgs {
    pub seed: PathBuf,
    /// JSON list of versions, each a list of `{offset, length, text}` edits
    pub script: PathBuf,
}
