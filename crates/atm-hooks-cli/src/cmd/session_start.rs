use crate::input;
use atm_hooks_core::config::ProjectConfig;
use atm_hooks_core::event::{LifecycleEvent, StartSource};
use atm_hooks_core::session::SessionRegistrar;
use std::io::Write;
use std::path::Path;

/// Announce the session on stdout, remember it, and relay `session_start`.
///
/// The announcement is unconditional; the team lines and the relay only
/// happen for orchestrated projects.
pub fn run(root: &Path) -> anyhow::Result<()> {
    let payload = input::parse_payload(&input::read_stdin()?);
    let session_id = input::str_at(&payload, &["session_id"]).map(str::to_string);
    let source = StartSource::parse(input::str_at(&payload, &["source"]));

    let mut out = std::io::stdout().lock();
    if let Some(id) = &session_id {
        SessionRegistrar::from_env().record(id);
        match source {
            StartSource::Compact => writeln!(out, "SESSION_ID={id} (returning from compact)")?,
            StartSource::Init => writeln!(out, "SESSION_ID={id} (starting fresh)")?,
        }
    }

    let Some(config) = ProjectConfig::probe(root) else {
        return Ok(());
    };
    if let Some(team) = &config.required_team {
        writeln!(out, "ATM team: {team}")?;
    }
    if let Some(welcome) = &config.welcome_message {
        writeln!(out, "Welcome: {welcome}")?;
    }
    out.flush()?;
    drop(out);

    let Some(id) = session_id else {
        return Ok(());
    };
    let event = LifecycleEvent::session_start(id, source)
        .with_identity(
            config.identity().map(str::to_string),
            config.required_team.clone(),
        )
        .with_raw_payload(payload);
    super::relay(&config, &event);
    Ok(())
}
