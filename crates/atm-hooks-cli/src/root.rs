use std::path::{Path, PathBuf};

/// Resolve the project root that may hold `.atm.toml`.
///
/// Priority:
/// 1. `--root` flag / `ATM_PROJECT_ROOT` env var (passed in as `explicit`)
/// 2. The current working directory
///
/// There is no upward walk: hooks run with the agent's cwd, and only a
/// marker in that directory opts it into orchestration.
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn defaults_to_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(resolve_root(None), cwd);
    }
}
