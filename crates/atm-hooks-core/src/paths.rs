use crate::error::{HookError, Result};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MARKER_FILE: &str = ".atm.toml";

pub const TEAMS_DIR: &str = ".claude/teams";
pub const TEAM_CONFIG_FILE: &str = "config.json";
pub const EVENT_LOG_FILE: &str = ".claude/daemon/hooks/events.jsonl";
pub const DAEMON_SOCKET_FILE: &str = ".claude/daemon/atm-daemon.sock";

pub const SESSION_CACHE_FILE: &str = "atm-session-id";

pub const HOME_ENV: &str = "ATM_HOME";
pub const SESSION_FILE_ENV: &str = "ATM_SESSION_FILE";

// ---------------------------------------------------------------------------
// Roots
// ---------------------------------------------------------------------------

/// Resolve the home directory all per-install state hangs off.
///
/// `ATM_HOME` wins when set and non-empty; otherwise the platform home.
pub fn home_dir() -> Result<PathBuf> {
    if let Some(custom) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(custom));
    }
    home::home_dir().ok_or(HookError::HomeNotFound)
}

/// Location of the "current session id" cache.
pub fn session_cache_path() -> PathBuf {
    match std::env::var_os(SESSION_FILE_ENV).filter(|v| !v.is_empty()) {
        Some(custom) => PathBuf::from(custom),
        None => std::env::temp_dir().join(SESSION_CACHE_FILE),
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn marker_path(project_root: &Path) -> PathBuf {
    project_root.join(MARKER_FILE)
}

/// A team name usable as one directory under the teams dir: a single plain
/// component with no separators or `.`/`..`.
pub fn is_valid_team_name(team: &str) -> bool {
    !team.is_empty()
        && team != "."
        && team != ".."
        && !team.contains(['/', '\\'])
}

pub fn team_config_path(home: &Path, team: &str) -> PathBuf {
    home.join(TEAMS_DIR).join(team).join(TEAM_CONFIG_FILE)
}

pub fn event_log_path(home: &Path) -> PathBuf {
    home.join(EVENT_LOG_FILE)
}

pub fn daemon_socket_path(home: &Path) -> PathBuf {
    home.join(DAEMON_SOCKET_FILE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
