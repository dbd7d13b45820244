use crate::output::print_json;
use atm_hooks_core::session::{resolve_session_id, SessionRegistrar, SESSION_ENV};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum SessionSubcommand {
    /// Print the current session id (flag, then CLAUDE_SESSION_ID, then the hook cache)
    Show {
        /// Use this session id instead of looking one up
        #[arg(long)]
        session_id: Option<String>,
    },
}

pub fn run(subcmd: SessionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        SessionSubcommand::Show { session_id } => show(session_id.as_deref(), json),
    }
}

fn show(explicit: Option<&str>, json: bool) -> anyhow::Result<()> {
    let registrar = SessionRegistrar::from_env();
    let env_value = std::env::var(SESSION_ENV).ok();

    let Some((id, source)) = resolve_session_id(explicit, env_value.as_deref(), &registrar)
    else {
        anyhow::bail!(
            "no session id available. Either:\n  \
             1. pass --session-id <uuid> (see the SESSION_ID line from the SessionStart hook)\n  \
             2. set {SESSION_ENV}\n  \
             3. make any tool call first so the gate hook records it to {}",
            registrar.path().display()
        );
    };

    if json {
        print_json(&serde_json::json!({
            "session_id": id,
            "source": source.as_str(),
        }))?;
    } else {
        println!("{id}");
    }
    Ok(())
}
