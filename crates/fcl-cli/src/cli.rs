use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fcl",
    about = "Fitness Club Ledger: membership, workout, and challenge records",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Path to a TOML config file
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
    /// Replay the canonical club scenario and print the resulting statistics
    Simulate(SimulateArgs),
    /// Interactive menu acting as one caller
    Console(ConsoleArgs),
    /// Execute a TOML script of caller/mutation steps
    Run(RunArgs),
    /// Print ledger counters and audit the invariants
    Verify(VerifyArgs),
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Show the address derived from a label
    Identity(IdentityArgs),
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Also print the event log
    #[arg(long)]
    pub events: bool,
}

#[derive(Args)]
pub struct ConsoleArgs {
    /// Caller identity: a 0x address or a label to derive one from
    #[arg(long = "as", default_value = "member-1")]
    pub caller: String,
}

#[derive(Args)]
pub struct RunArgs {
    pub script: PathBuf,
    /// Continue after rejected steps
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Replay a script before auditing
    #[arg(long)]
    pub script: Option<PathBuf>,
    /// Replay the canonical scenario before auditing
    #[arg(long, conflicts_with = "script")]
    pub scenario: bool,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Overrides `server.bind_addr`
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Attach a permissive CORS layer
    #[arg(long)]
    pub cors: bool,
}

#[derive(Args)]
pub struct IdentityArgs {
    pub label: String,
}
