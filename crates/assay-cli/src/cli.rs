//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use assay_domain::MetalCategory;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Assay CLI - Score contributions and allocate from the epoch ledger.
#[derive(Debug, Parser)]
#[command(name = "assay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (defaults to ~/.assay/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger database path
    #[arg(short, long, global = true, env = "ASSAY_DB")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (bare values)
    Quiet,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score a stored evaluator output (JSON)
    Score(ScoreArgs),

    /// Send text to the evaluator, then score the response
    Evaluate(EvaluateArgs),

    /// Allocate rewards for a stored score record
    Allocate(AllocateArgs),

    /// Manage the epoch ledger
    Ledger(LedgerArgs),

    /// Epoch administration
    Epoch(EpochArgs),

    /// Recompute a stored record's integrity hash
    Verify(VerifyArgs),
}

/// Arguments for the score command.
#[derive(Debug, Parser)]
pub struct ScoreArgs {
    /// Submission identifier
    pub submission_id: String,

    /// Evaluator output file (JSON); reads stdin when omitted or "-"
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Category hint for the metal heuristic
    #[arg(long)]
    pub hint: Option<String>,

    /// Persist the score record in the ledger database
    #[arg(short, long)]
    pub save: bool,
}

/// Arguments for the evaluate command.
#[derive(Debug, Parser)]
pub struct EvaluateArgs {
    /// Submission identifier
    pub submission_id: String,

    /// Submission text file; reads stdin when omitted or "-"
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Category hint passed to the evaluator
    #[arg(long)]
    pub hint: Option<String>,

    /// Override the evaluator model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Override the evaluator endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Persist the score record in the ledger database
    #[arg(short, long)]
    pub save: bool,
}

/// Arguments for the allocate command.
#[derive(Debug, Parser)]
pub struct AllocateArgs {
    /// Submission identifier of a stored score record
    pub submission_id: String,

    /// Contributor receiving the award
    #[arg(short = 'u', long)]
    pub contributor: String,

    /// Metal categories (defaults to the record's recommendation)
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub metals: Vec<MetalArg>,
}

/// Metal category options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MetalArg {
    /// Gold pool
    Gold,
    /// Silver pool
    Silver,
    /// Copper pool
    Copper,
}

impl From<MetalArg> for MetalCategory {
    fn from(arg: MetalArg) -> Self {
        match arg {
            MetalArg::Gold => MetalCategory::Gold,
            MetalArg::Silver => MetalCategory::Silver,
            MetalArg::Copper => MetalCategory::Copper,
        }
    }
}

/// Arguments for the ledger command.
#[derive(Debug, Parser)]
pub struct LedgerArgs {
    #[command(subcommand)]
    pub command: LedgerCommand,
}

/// Ledger subcommands.
#[derive(Debug, Subcommand)]
pub enum LedgerCommand {
    /// Seed every pool from genesis (no-op if already seeded)
    Init {
        /// Seed every pool with this balance instead of the supply split
        #[arg(long)]
        fixed_balance: Option<u64>,
    },

    /// Show every pool and the running totals
    Status,
}

/// Arguments for the epoch command.
#[derive(Debug, Parser)]
pub struct EpochArgs {
    #[command(subcommand)]
    pub command: EpochCommand,
}

/// Epoch subcommands.
#[derive(Debug, Subcommand)]
pub enum EpochCommand {
    /// Open the next epoch in order
    OpenNext,
}

/// Arguments for the verify command.
#[derive(Debug, Parser)]
pub struct VerifyArgs {
    /// Submission identifier of a stored score record
    pub submission_id: String,
}
