use crate::error::Outcome;
use crate::event::LifecycleEvent;
use crate::io;
use crate::paths;
use std::path::{Path, PathBuf};

/// Append-only JSONL record of lifecycle events; the system of record.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn under_home(home: &Path) -> Self {
        Self::new(paths::event_log_path(home))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `event` as one compact JSON line.
    pub fn append(&self, event: &LifecycleEvent) -> Outcome<()> {
        let line = serde_json::to_string(event)?;
        io::append_line(&self.path, &line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, StartSource};
    use tempfile::TempDir;

    fn read_events(log: &AuditLog) -> Vec<LifecycleEvent> {
        std::fs::read_to_string(log.path())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn append_creates_parent_dirs() {
        let home = TempDir::new().unwrap();
        let log = AuditLog::under_home(home.path());
        log.append(&LifecycleEvent::session_end("s1")).unwrap();
        assert!(home.path().join(".claude/daemon/hooks/events.jsonl").exists());
    }

    #[test]
    fn appended_events_read_back_exactly() {
        let home = TempDir::new().unwrap();
        let log = AuditLog::under_home(home.path());
        let events = vec![
            LifecycleEvent::session_start("s1", StartSource::Init)
                .with_identity(Some("team-lead".to_string()), Some("atm-dev".to_string())),
            LifecycleEvent::teammate_idle("s2")
                .with_identity(Some("arch-ctm".to_string()), None)
                .with_raw_payload(serde_json::json!({"session_id": "s2", "name": "arch-ctm"})),
            LifecycleEvent::session_end("s3"),
        ];
        for e in &events {
            log.append(e).unwrap();
        }

        let read = read_events(&log);
        assert_eq!(read.len(), 3);
        for (written, back) in events.iter().zip(&read) {
            assert_eq!(back.kind, written.kind);
            assert_eq!(back.session_id, written.session_id);
            assert_eq!(back.agent, written.agent);
            assert_eq!(back.team, written.team);
        }
        assert_eq!(read[1].kind, EventKind::TeammateIdle);
        assert_eq!(read[1].raw_payload["name"], "arch-ctm");
    }

    #[test]
    fn concurrent_appends_keep_lines_whole() {
        let home = TempDir::new().unwrap();
        let log = AuditLog::under_home(home.path());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        let event = LifecycleEvent::teammate_idle(format!("s-{t}-{i}"));
                        log.append(&event).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(read_events(&log).len(), 200);
    }

    #[test]
    fn unwritable_log_is_ignored_not_panicking() {
        let home = TempDir::new().unwrap();
        let blocker = home.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let log = AuditLog::new(blocker.join("events.jsonl"));
        assert!(log.append(&LifecycleEvent::session_end("s1")).is_err());
    }
}
