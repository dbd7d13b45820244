use crate::input;
use atm_hooks_core::config::ProjectConfig;
use atm_hooks_core::event::LifecycleEvent;
use atm_hooks_core::session::SessionRegistrar;
use serde_json::Value;
use std::path::Path;

pub const TEAM_ENV: &str = "ATM_TEAM";
pub const IDENTITY_ENV: &str = "ATM_IDENTITY";

/// Relay `teammate_idle`, enriched with whichever team and agent names the
/// payload, environment or marker file provide.
pub fn run(root: &Path) -> anyhow::Result<()> {
    let payload = input::parse_payload(&input::read_stdin()?);

    let Some(id) = input::str_at(&payload, &["session_id"]).map(str::to_string) else {
        return Ok(());
    };
    SessionRegistrar::from_env().record(&id);

    let Some(config) = ProjectConfig::probe(root) else {
        return Ok(());
    };

    let env_team = std::env::var(TEAM_ENV).ok();
    let env_identity = std::env::var(IDENTITY_ENV).ok();
    let team = resolve_team(&payload, env_team.as_deref(), &config);
    let agent = resolve_agent(&payload, env_identity.as_deref(), &config);

    let event = LifecycleEvent::teammate_idle(id)
        .with_identity(agent, team)
        .with_raw_payload(payload);
    super::relay(&config, &event);
    Ok(())
}

fn first_non_empty<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn resolve_team(payload: &Value, env_team: Option<&str>, config: &ProjectConfig) -> Option<String> {
    first_non_empty([
        input::str_at(payload, &["team_name"]),
        input::str_at(payload, &["tool_input", "team_name"]),
        input::str_at(payload, &["team"]),
        env_team,
        config.required_team.as_deref(),
    ])
}

fn resolve_agent(
    payload: &Value,
    env_identity: Option<&str>,
    config: &ProjectConfig,
) -> Option<String> {
    first_non_empty([
        input::str_at(payload, &["name"]),
        input::str_at(payload, &["agent"]),
        input::str_at(payload, &["tool_input", "name"]),
        env_identity,
        config.identity(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> ProjectConfig {
        ProjectConfig {
            required_team: Some("atm-dev".to_string()),
            identity: "team-lead".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn payload_team_wins_over_env_and_config() {
        let payload = json!({"team_name": "from-payload", "team": "other"});
        assert_eq!(
            resolve_team(&payload, Some("from-env"), &config()).as_deref(),
            Some("from-payload")
        );
    }

    #[test]
    fn nested_tool_input_is_consulted() {
        let payload = json!({"tool_input": {"team_name": "nested", "name": "arch-ctm"}});
        assert_eq!(resolve_team(&payload, None, &config()).as_deref(), Some("nested"));
        assert_eq!(resolve_agent(&payload, None, &config()).as_deref(), Some("arch-ctm"));
    }

    #[test]
    fn env_then_config_fallbacks() {
        let payload = json!({"team_name": "  "});
        assert_eq!(
            resolve_team(&payload, Some("from-env"), &config()).as_deref(),
            Some("from-env")
        );
        assert_eq!(resolve_team(&payload, Some(""), &config()).as_deref(), Some("atm-dev"));
        assert_eq!(resolve_agent(&payload, None, &config()).as_deref(), Some("team-lead"));
    }

    #[test]
    fn nothing_resolves_to_none() {
        let payload = json!({});
        let bare = ProjectConfig::default();
        assert!(resolve_team(&payload, None, &bare).is_none());
        assert!(resolve_agent(&payload, None, &bare).is_none());
    }
}
