mod cmd;
mod input;
mod output;
mod root;

use atm_hooks_core::policy::Decision;
use clap::{Parser, Subcommand};
use cmd::session::SessionSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "atm-hook",
    about = "Agent team hooks: spawn policy gate and lifecycle event relay",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root holding .atm.toml (default: current directory)
    #[arg(long, global = true, env = "ATM_PROJECT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// PreToolUse hook for Task: exit 0 allows the spawn, exit 2 blocks it
    Gate,

    /// SessionStart hook: announce the session id and relay session_start
    SessionStart,

    /// SessionEnd hook: relay session_end
    SessionEnd,

    /// TeammateIdle hook: relay teammate_idle
    TeammateIdle,

    /// Recover the current session id after a context reset
    Session {
        #[command(subcommand)]
        subcommand: SessionSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    // stdout belongs to the hook protocol; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Gate => match cmd::gate::run(&root) {
            Ok(Decision::Block(block)) => {
                eprint!("{block}");
                std::process::exit(cmd::gate::BLOCK_EXIT_CODE);
            }
            Ok(Decision::Allow) => Ok(()),
            Err(e) => fail_open("gate", e),
        },
        Commands::SessionStart => {
            cmd::session_start::run(&root).or_else(|e| fail_open("session-start", e))
        }
        Commands::SessionEnd => {
            cmd::session_end::run(&root).or_else(|e| fail_open("session-end", e))
        }
        Commands::TeammateIdle => {
            cmd::teammate_idle::run(&root).or_else(|e| fail_open("teammate-idle", e))
        }
        Commands::Session { subcommand } => cmd::session::run(subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// Hooks never fail the agent's tool call on an internal error.
fn fail_open(hook: &str, err: anyhow::Error) -> anyhow::Result<()> {
    tracing::debug!(hook, "hook failed open: {err:#}");
    Ok(())
}
