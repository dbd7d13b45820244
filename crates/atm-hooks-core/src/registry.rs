//! Team registry lookups.
//!
//! Each team owns `<home>/.claude/teams/<team>/config.json`, written by the
//! team tooling. This crate only ever reads `leadSessionId` from it.

use crate::config::non_empty;
use crate::error::{HookError, Outcome};
use crate::paths;
use serde::Deserialize;
use std::path::PathBuf;

/// The slice of a team's config that identifies its lead.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamRegistryEntry {
    #[serde(rename = "leadSessionId", default)]
    pub lead_session_id: Option<String>,
}

/// Resolves a team name to the session id of its lead.
pub trait LeadResolver {
    /// `None` means the team is unknown (not provisioned, unreadable, or
    /// missing a lead). Callers treat that as fail-open.
    fn resolve_lead(&self, team: &str) -> Option<String>;
}

/// File-backed registry rooted at a home directory.
#[derive(Debug, Clone)]
pub struct TeamRegistry {
    home: PathBuf,
}

impl TeamRegistry {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Registry rooted at the resolved `ATM_HOME`/platform home.
    pub fn from_env() -> Option<Self> {
        paths::home_dir().ok().map(Self::new)
    }

    fn read_lead(&self, team: &str) -> Outcome<String> {
        let path = paths::team_config_path(&self.home, team);
        let data = std::fs::read_to_string(path)?;
        let entry: TeamRegistryEntry = serde_json::from_str(&data)?;
        non_empty(entry.lead_session_id.as_deref())
            .map(str::to_string)
            .ok_or_else(|| HookError::NoLead(team.to_string()).into())
    }
}

impl LeadResolver for TeamRegistry {
    fn resolve_lead(&self, team: &str) -> Option<String> {
        let team = non_empty(Some(team))?;
        if !paths::is_valid_team_name(team) {
            tracing::debug!(team, "team name is not a plain directory name");
            return None;
        }
        self.read_lead(team).ok()
    }
}

impl<F> LeadResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve_lead(&self, team: &str) -> Option<String> {
        self(team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_team(home: &TempDir, team: &str, body: &str) {
        let path = paths::team_config_path(home.path(), team);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    #[test]
    fn resolves_lead_session_id() {
        let home = TempDir::new().unwrap();
        write_team(
            &home,
            "atm-dev",
            r#"{"name":"atm-dev","leadSessionId":"sess-lead","members":[]}"#,
        );
        let registry = TeamRegistry::new(home.path());
        assert_eq!(registry.resolve_lead("atm-dev").as_deref(), Some("sess-lead"));
    }

    #[test]
    fn missing_team_is_unknown() {
        let home = TempDir::new().unwrap();
        let registry = TeamRegistry::new(home.path());
        assert!(registry.resolve_lead("ghost").is_none());
    }

    #[test]
    fn corrupt_entry_is_unknown() {
        let home = TempDir::new().unwrap();
        write_team(&home, "atm-dev", "{not json");
        let registry = TeamRegistry::new(home.path());
        assert!(registry.resolve_lead("atm-dev").is_none());
    }

    #[test]
    fn entry_without_lead_is_unknown() {
        let home = TempDir::new().unwrap();
        write_team(&home, "atm-dev", r#"{"name":"atm-dev","leadSessionId":""}"#);
        let registry = TeamRegistry::new(home.path());
        assert!(registry.resolve_lead("atm-dev").is_none());
    }

    #[test]
    fn blank_team_name_is_unknown() {
        let home = TempDir::new().unwrap();
        let registry = TeamRegistry::new(home.path());
        assert!(registry.resolve_lead("   ").is_none());
    }

    #[test]
    fn traversal_team_name_is_unknown() {
        let home = TempDir::new().unwrap();
        // A readable entry outside the teams dir must not be reachable.
        let outside = home.path().join("x");
        std::fs::create_dir_all(&outside).unwrap();
        std::fs::write(outside.join("config.json"), r#"{"leadSessionId":"stolen"}"#).unwrap();
        let registry = TeamRegistry::new(home.path());
        assert!(registry.resolve_lead("../../x").is_none());
        assert!(registry.resolve_lead("a/b").is_none());
    }
}
