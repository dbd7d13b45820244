use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EventKind / StartSource
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SessionStart,
    SessionEnd,
    TeammateIdle,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SessionStart => "session_start",
            EventKind::SessionEnd => "session_end",
            EventKind::TeammateIdle => "teammate_idle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartSource {
    Init,
    Compact,
}

impl StartSource {
    /// Anything other than `compact` is a fresh start.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("compact") => StartSource::Compact,
            _ => StartSource::Init,
        }
    }
}

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// One worker lifecycle transition, as written to the audit log.
///
/// The daemon receives the same object minus `payload` (see
/// [`LifecycleEvent::daemon_payload`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    #[serde(rename = "event")]
    pub kind: EventKind,
    pub session_id: String,
    pub agent: Option<String>,
    pub team: Option<String>,
    /// UTC, whole seconds.
    #[serde(rename = "received_at")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<StartSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<u32>,
    /// The hook's stdin object, untouched.
    #[serde(rename = "payload", default, skip_serializing_if = "serde_json::Value::is_null")]
    pub raw_payload: serde_json::Value,
}

impl LifecycleEvent {
    pub fn new(kind: EventKind, session_id: impl Into<String>) -> Self {
        Self {
            kind,
            session_id: session_id.into(),
            agent: None,
            team: None,
            timestamp: Utc::now().trunc_subsecs(0),
            source: None,
            reason: None,
            process_id: None,
            raw_payload: serde_json::Value::Null,
        }
    }

    pub fn session_start(session_id: impl Into<String>, source: StartSource) -> Self {
        Self {
            source: Some(source),
            process_id: Some(std::process::id()),
            ..Self::new(EventKind::SessionStart, session_id)
        }
    }

    pub fn session_end(session_id: impl Into<String>) -> Self {
        Self {
            reason: Some("session_exit".to_string()),
            ..Self::new(EventKind::SessionEnd, session_id)
        }
    }

    pub fn teammate_idle(session_id: impl Into<String>) -> Self {
        Self::new(EventKind::TeammateIdle, session_id)
    }

    pub fn with_identity(mut self, agent: Option<String>, team: Option<String>) -> Self {
        self.agent = agent;
        self.team = team;
        self
    }

    pub fn with_raw_payload(mut self, raw: serde_json::Value) -> Self {
        self.raw_payload = raw;
        self
    }

    /// The `payload` object of a daemon `hook-event` request.
    pub fn daemon_payload(&self) -> serde_json::Result<serde_json::Value> {
        let mut value = serde_json::to_value(self)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("payload");
        }
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_source_parsing() {
        assert_eq!(StartSource::parse(Some("compact")), StartSource::Compact);
        assert_eq!(StartSource::parse(Some("init")), StartSource::Init);
        assert_eq!(StartSource::parse(Some("resume")), StartSource::Init);
        assert_eq!(StartSource::parse(None), StartSource::Init);
    }

    #[test]
    fn timestamp_has_second_precision() {
        let event = LifecycleEvent::session_end("s1");
        let json = serde_json::to_value(&event).unwrap();
        let stamp = json["received_at"].as_str().unwrap();
        assert!(stamp.ends_with('Z'), "{stamp}");
        assert!(!stamp.contains('.'), "{stamp}");
    }

    #[test]
    fn serialized_shape() {
        let event = LifecycleEvent::session_start("abc", StartSource::Compact)
            .with_identity(Some("team-lead".to_string()), Some("atm-dev".to_string()))
            .with_raw_payload(serde_json::json!({"session_id": "abc", "source": "compact"}));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "session_start");
        assert_eq!(json["session_id"], "abc");
        assert_eq!(json["agent"], "team-lead");
        assert_eq!(json["team"], "atm-dev");
        assert_eq!(json["source"], "compact");
        assert_eq!(json["process_id"], std::process::id());
        assert_eq!(json["payload"]["source"], "compact");
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn daemon_payload_drops_raw_input() {
        let event = LifecycleEvent::session_end("abc")
            .with_raw_payload(serde_json::json!({"session_id": "abc"}));
        let payload = event.daemon_payload().unwrap();
        assert!(payload.get("payload").is_none());
        assert_eq!(payload["event"], "session_end");
        assert_eq!(payload["reason"], "session_exit");
        assert!(payload["agent"].is_null());
        assert!(payload["team"].is_null());
    }
}
