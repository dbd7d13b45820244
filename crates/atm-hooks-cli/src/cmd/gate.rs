use crate::input;
use atm_hooks_core::config::ProjectConfig;
use atm_hooks_core::policy::{self, Decision, SpawnRequest};
use atm_hooks_core::registry::{LeadResolver, TeamRegistry};
use atm_hooks_core::session::SessionRegistrar;
use std::path::Path;

/// Exit status the hook runner reads as "block this tool call".
pub const BLOCK_EXIT_CODE: i32 = 2;

fn unknown_lead(_: &str) -> Option<String> {
    None
}

/// Evaluate the spawn request on stdin.
///
/// Unreadable or malformed input is an Allow: the gate only ever blocks on
/// a policy rule.
pub fn run(root: &Path) -> anyhow::Result<Decision> {
    let raw = input::read_stdin()?;
    let Some(request) = SpawnRequest::from_hook_json(&raw) else {
        return Ok(Decision::Allow);
    };

    SessionRegistrar::from_env().record(&request.caller_session_id);

    let config = ProjectConfig::probe(root);
    let registry = TeamRegistry::from_env();
    let leads: &dyn LeadResolver = match &registry {
        Some(r) => r,
        None => &unknown_lead,
    };

    let decision = policy::evaluate(&request, config.as_ref(), leads);
    if let Decision::Block(block) = &decision {
        tracing::info!(
            rule = block.rule.as_str(),
            agent_kind = %request.agent_kind,
            team = request.team_name.as_deref().unwrap_or(""),
            "spawn blocked"
        );
    }
    Ok(decision)
}
