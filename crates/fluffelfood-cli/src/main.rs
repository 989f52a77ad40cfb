use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fluffelfood::process::DEFAULT_BINARY;
use fluffelfood::protocol::DEFAULT_SOCKET;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod shutdown;
mod status_view;

#[derive(Parser)]
#[command(name = "fluffelfood")]
#[command(about = "Alien: Isolation autosplitter for the Fluffelwatch timer")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Options of the default `run` command
    #[command(flatten)]
    run: RunArgs,
}

/// How to find the game process
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Process ID of the running game (skips the process lookup)
    #[arg(short, long)]
    pub pid: Option<u32>,

    /// Path of the game binary used to find the process
    #[arg(short, long, default_value = DEFAULT_BINARY)]
    pub binary: String,

    /// Offsets file (JSON); the built-in table is used if omitted
    #[arg(short, long)]
    pub offsets: Option<PathBuf>,

    /// Keep following chains through null or unreadable pointers
    #[arg(long)]
    pub legacy_resolve: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Unix socket of the timer
    #[arg(short, long, env = "FLUFFELWATCH_SOCKET", default_value = DEFAULT_SOCKET)]
    pub socket: PathBuf,

    /// Run log file
    #[arg(short, long, default_value = fluffelfood::session::DEFAULT_RUN_LOG)]
    pub log: PathBuf,

    /// Do not write a run log
    #[arg(long, conflicts_with = "log")]
    pub no_log: bool,

    /// Polling interval in milliseconds
    #[arg(long, default_value = "25")]
    pub interval_ms: u64,

    /// Run even if the game binary does not match the offsets
    #[arg(long)]
    pub skip_verify: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the autosplitter (default)
    Run(RunArgs),
    /// Show the game state without talking to the timer
    Watch {
        #[command(flatten)]
        target: TargetArgs,

        /// Refresh interval in milliseconds
        #[arg(long, default_value = "100")]
        interval_ms: u64,
    },
    /// Resolve the pointer chains and print the addresses
    Addresses {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Write the built-in offsets to a file, or check an offsets file
    Offsets {
        /// Output file
        #[arg(short, long, default_value = "offsets.json")]
        output: PathBuf,

        /// Validate this file instead of writing
        #[arg(long)]
        check: Option<PathBuf>,
    },
    /// Print size and SHA-256 of a game binary
    Fingerprint {
        /// Binary to hash
        #[arg(default_value = DEFAULT_BINARY)]
        path: String,

        /// Offsets file to compare against; the built-in table if omitted
        #[arg(short, long)]
        offsets: Option<PathBuf>,
    },
    /// Send a scripted test sequence to the timer
    TimerTest {
        #[arg(short, long, env = "FLUFFELWATCH_SOCKET", default_value = DEFAULT_SOCKET)]
        socket: PathBuf,

        /// Scale all waits (0.1 runs ten times faster)
        #[arg(long, default_value = "1.0")]
        speed: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(format!("fluffelfood={}", level).parse()?),
        )
        .init();

    match cli.command {
        None => commands::run::run(cli.run),
        Some(Command::Run(args)) => commands::run::run(args),
        Some(Command::Watch {
            target,
            interval_ms,
        }) => commands::watch::run(&target, interval_ms),
        Some(Command::Addresses { target }) => commands::addresses::run(&target),
        Some(Command::Offsets { output, check }) => match check {
            Some(path) => commands::offsets::check(&path),
            None => commands::offsets::write(&output),
        },
        Some(Command::Fingerprint { path, offsets }) => {
            commands::fingerprint::run(&path, offsets.as_deref())
        }
        Some(Command::TimerTest { socket, speed }) => commands::timer_test::run(&socket, speed),
    }
}
