//! Project marker file probe.
//!
//! A directory is under team orchestration when it carries a parseable
//! `.atm.toml`. Only the `[core]` keys below are consumed here; the rest of
//! the file belongs to other tools and is ignored.
//!
//! ```toml
//! [core]
//! default_team = "atm-dev"
//! identity = "team-lead"
//! welcome-message = "Hello, agent!"
//! orchestrator-roles = ["release-captain"]
//! ```

use crate::error::Outcome;
use crate::paths;
use serde::Deserialize;
use std::path::Path;

// ---------------------------------------------------------------------------
// On-disk shape
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct MarkerFile {
    #[serde(default)]
    core: CoreSection,
}

#[derive(Debug, Default, Deserialize)]
struct CoreSection {
    #[serde(default)]
    default_team: Option<String>,
    #[serde(default)]
    identity: Option<String>,
    #[serde(default, rename = "welcome-message")]
    welcome_message: Option<String>,
    #[serde(default, rename = "orchestrator-roles")]
    orchestrator_roles: Vec<String>,
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectConfig {
    /// The one team this project is bound to.
    pub required_team: Option<String>,
    /// This project's configured agent name. Empty when unset.
    pub identity: String,
    pub welcome_message: Option<String>,
    /// Agent kinds that must be spawned as named workers, on top of the
    /// built-in set.
    pub orchestrator_roles: Vec<String>,
}

impl ProjectConfig {
    /// Probe `project_root` for the marker file.
    ///
    /// Missing, unreadable and malformed files all read as `None`, meaning
    /// "not an orchestrated project".
    pub fn probe(project_root: &Path) -> Option<Self> {
        Self::read(project_root).ok()
    }

    fn read(project_root: &Path) -> Outcome<Self> {
        let data = std::fs::read_to_string(paths::marker_path(project_root))?;
        let marker: MarkerFile = toml::from_str(&data)?;
        Ok(Self::from(marker))
    }

    pub fn identity(&self) -> Option<&str> {
        non_empty(Some(self.identity.as_str()))
    }
}

impl From<MarkerFile> for ProjectConfig {
    fn from(marker: MarkerFile) -> Self {
        let core = marker.core;
        Self {
            required_team: non_empty(core.default_team.as_deref()).map(str::to_string),
            identity: core.identity.unwrap_or_default().trim().to_string(),
            welcome_message: non_empty(core.welcome_message.as_deref()).map(str::to_string),
            orchestrator_roles: core
                .orchestrator_roles
                .into_iter()
                .filter(|r| !r.trim().is_empty())
                .collect(),
        }
    }
}

/// Trimmed view of `value`, or `None` when it is missing or blank.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
