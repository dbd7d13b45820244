pub mod gate;
pub mod session;
pub mod session_end;
pub mod session_start;
pub mod teammate_idle;

use atm_hooks_core::config::ProjectConfig;
use atm_hooks_core::event::LifecycleEvent;
use atm_hooks_core::paths;
use atm_hooks_core::relay::EventRelay;

/// Relay `event` to the audit log and daemon under the resolved home.
fn relay(config: &ProjectConfig, event: &LifecycleEvent) {
    match paths::home_dir() {
        Ok(home) => {
            EventRelay::under_home(&home).emit(Some(config), event);
        }
        Err(e) => tracing::debug!(error = %e, "no home directory; skipping relay"),
    }
}
