use anyhow::Context;
use std::io::Read;

/// Read the whole hook payload from stdin.
pub fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read hook payload from stdin")?;
    Ok(buf)
}

/// Parse a hook payload into a JSON object.
///
/// Blank input, invalid JSON and non-object values all become `{}` so the
/// hook degrades to its no-input behaviour.
pub fn parse_payload(raw: &str) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(v) if v.is_object() => v,
        Ok(_) => empty(),
        Err(e) => {
            if !raw.trim().is_empty() {
                tracing::debug!(error = %e, "unparseable hook payload");
            }
            empty()
        }
    }
}

fn empty() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

/// Trimmed, non-empty string at `path` inside `payload`.
pub fn str_at<'a>(payload: &'a serde_json::Value, path: &[&str]) -> Option<&'a str> {
    let mut cur = payload;
    for key in path {
        cur = cur.get(key)?;
    }
    cur.as_str().map(str::trim).filter(|s| !s.is_empty())
}
