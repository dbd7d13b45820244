use crate::input;
use atm_hooks_core::config::ProjectConfig;
use atm_hooks_core::event::LifecycleEvent;
use atm_hooks_core::session::SessionRegistrar;
use std::path::Path;

/// Relay `session_end` so the daemon can mark the session dead.
pub fn run(root: &Path) -> anyhow::Result<()> {
    let payload = input::parse_payload(&input::read_stdin()?);

    let Some(id) = input::str_at(&payload, &["session_id"]).map(str::to_string) else {
        return Ok(());
    };
    SessionRegistrar::from_env().record(&id);

    let Some(config) = ProjectConfig::probe(root) else {
        return Ok(());
    };

    let event = LifecycleEvent::session_end(id)
        .with_identity(
            config.identity().map(str::to_string),
            config.required_team.clone(),
        )
        .with_raw_payload(payload);
    super::relay(&config, &event);
    Ok(())
}
