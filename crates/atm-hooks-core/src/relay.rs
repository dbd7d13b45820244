use crate::audit::AuditLog;
use crate::config::ProjectConfig;
use crate::daemon::{DaemonClient, Delivery};
use crate::event::LifecycleEvent;
use std::path::Path;

/// What a relay did with one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayReport {
    pub logged: bool,
    pub delivery: Delivery,
}

/// Fans one lifecycle event out to the audit log, then the daemon.
#[derive(Debug, Clone)]
pub struct EventRelay {
    audit: AuditLog,
    daemon: DaemonClient,
}

impl EventRelay {
    pub fn new(audit: AuditLog, daemon: DaemonClient) -> Self {
        Self { audit, daemon }
    }

    pub fn under_home(home: &Path) -> Self {
        Self::new(AuditLog::under_home(home), DaemonClient::under_home(home))
    }

    /// Relay `event` for an orchestrated project.
    ///
    /// Returns `None` without touching the filesystem or the socket when
    /// `config` is absent. The local append is always attempted before the
    /// socket send.
    pub fn emit(&self, config: Option<&ProjectConfig>, event: &LifecycleEvent) -> Option<RelayReport> {
        config?;
        let logged = self.audit.append(event).is_ok();
        let delivery = self.daemon.send(event);
        tracing::debug!(
            event = event.kind.as_str(),
            session_id = %event.session_id,
            logged,
            ?delivery,
            "lifecycle event relayed"
        );
        Some(RelayReport { logged, delivery })
    }
}
