//! "Who am I" cache.
//!
//! Every hook invocation that carries a session id overwrites a single-line
//! cache file, so a later process (a CLI call after a context reset, say) can
//! recover the id. The cache is a convenience, never a source of truth.

use crate::config::non_empty;
use crate::error::Outcome;
use crate::io;
use crate::paths;
use std::path::{Path, PathBuf};

pub const SESSION_ENV: &str = "CLAUDE_SESSION_ID";

#[derive(Debug, Clone)]
pub struct SessionRegistrar {
    path: PathBuf,
}

impl SessionRegistrar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Registrar backed by `ATM_SESSION_FILE` or the temp-dir default.
    pub fn from_env() -> Self {
        Self::new(paths::session_cache_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the cache with `session_id`. Last write wins; failures are
    /// dropped.
    pub fn record(&self, session_id: &str) {
        let Some(session_id) = non_empty(Some(session_id)) else {
            return;
        };
        let _ = self.write(session_id);
    }

    fn write(&self, session_id: &str) -> Outcome<()> {
        io::atomic_write(&self.path, session_id.as_bytes())?;
        Ok(())
    }

    /// Read back the cached id, if any.
    pub fn current(&self) -> Option<String> {
        let data = std::fs::read_to_string(&self.path).ok()?;
        non_empty(Some(&data)).map(str::to_string)
    }
}

/// Where a resolved session id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    Flag,
    Env,
    Cache,
}

impl SessionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionSource::Flag => "flag",
            SessionSource::Env => "env",
            SessionSource::Cache => "cache",
        }
    }
}

/// Resolve the current session id.
///
/// Priority:
/// 1. `explicit` (a `--session-id` flag)
/// 2. `env_value` (`CLAUDE_SESSION_ID`)
/// 3. the registrar's cache file
pub fn resolve_session_id(
    explicit: Option<&str>,
    env_value: Option<&str>,
    registrar: &SessionRegistrar,
) -> Option<(String, SessionSource)> {
    if let Some(id) = non_empty(explicit) {
        return Some((id.to_string(), SessionSource::Flag));
    }
    if let Some(id) = non_empty(env_value) {
        return Some((id.to_string(), SessionSource::Env));
    }
    registrar.current().map(|id| (id, SessionSource::Cache))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn record_overwrites_previous_id() {
        let dir = TempDir::new().unwrap();
        let registrar = SessionRegistrar::new(dir.path().join("atm-session-id"));
        registrar.record("first");
        registrar.record("second");
        assert_eq!(registrar.current().as_deref(), Some("second"));
    }

    #[test]
    fn record_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("atm-session-id");
        let registrar = SessionRegistrar::new(&path);
        registrar.record("sess-1");
        let once = std::fs::read(&path).unwrap();
        for _ in 0..5 {
            registrar.record("sess-1");
        }
        assert_eq!(std::fs::read(&path).unwrap(), once);
    }

    #[test]
    fn blank_id_is_not_recorded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("atm-session-id");
        SessionRegistrar::new(&path).record("  ");
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_location_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        // Parent is a regular file, so create_dir_all fails.
        SessionRegistrar::new(blocker.join("atm-session-id")).record("sess-1");
    }

    #[test]
    fn resolve_prefers_flag_then_env_then_cache() {
        let dir = TempDir::new().unwrap();
        let registrar = SessionRegistrar::new(dir.path().join("atm-session-id"));
        registrar.record("cached");

        assert_eq!(
            resolve_session_id(Some("flag"), Some("env"), &registrar),
            Some(("flag".to_string(), SessionSource::Flag))
        );
        assert_eq!(
            resolve_session_id(None, Some("env"), &registrar),
            Some(("env".to_string(), SessionSource::Env))
        );
        assert_eq!(
            resolve_session_id(None, Some(""), &registrar),
            Some(("cached".to_string(), SessionSource::Cache))
        );
    }

    #[test]
    fn resolve_without_sources_is_none() {
        let dir = TempDir::new().unwrap();
        let registrar = SessionRegistrar::new(dir.path().join("missing"));
        assert!(resolve_session_id(None, None, &registrar).is_none());
    }
}
