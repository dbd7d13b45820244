//! Spawn admission policy.
//!
//! A spawn request is checked against a fixed, ordered list of rules. The
//! first rule that blocks decides the outcome and later rules never run, so
//! the registry lookup in the lead-only rule only happens once the cheaper
//! checks have passed.
//!
//! # Rules (in precedence order)
//! 1. Named teammate: orchestrator roles must be spawned with a `name`.
//! 2. Team binding: a `team_name` must match the project's bound team.
//! 3. Lead only: only the team's lead session may spawn with a `team_name`.
//!    Unknown teams are allowed so a team can bootstrap itself.

use crate::config::{non_empty, ProjectConfig};
use crate::registry::LeadResolver;
use std::fmt;

/// Agent kinds that coordinate other workers and must survive compaction.
pub const BUILTIN_ORCHESTRATOR_ROLES: &[&str] = &["scrum-master"];

// ---------------------------------------------------------------------------
// SpawnRequest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnRequest {
    pub agent_kind: String,
    /// Present for named, durable workers.
    pub teammate_name: Option<String>,
    /// Present when the worker should attach to a shared team.
    pub team_name: Option<String>,
    pub caller_session_id: String,
}

/// Trimmed, non-empty string at `key`; other JSON types count as absent.
fn str_field<'a>(obj: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    non_empty(obj.get(key).and_then(serde_json::Value::as_str))
}

impl SpawnRequest {
    /// Parse the hook payload read from stdin.
    ///
    /// Returns `None` only when stdin is not a JSON object; the gate treats
    /// that as Allow. Each field is read on its own, so a mistyped field is
    /// treated as missing and never hides the rest of the request.
    pub fn from_hook_json(input: &str) -> Option<Self> {
        let parsed: serde_json::Value = match serde_json::from_str(input) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "unparseable gate input");
                return None;
            }
        };
        if !parsed.is_object() {
            tracing::debug!("gate input is not a JSON object");
            return None;
        }
        let tool = parsed.get("tool_input").unwrap_or(&serde_json::Value::Null);
        let kind = str_field(tool, "subagent_type").or_else(|| str_field(tool, "agent_kind"));
        Some(Self {
            agent_kind: kind.unwrap_or_default().to_string(),
            teammate_name: str_field(tool, "name").map(str::to_string),
            team_name: str_field(tool, "team_name").map(str::to_string),
            caller_session_id: str_field(&parsed, "session_id")
                .unwrap_or_default()
                .to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    NamedTeammate,
    TeamBinding,
    LeadOnly,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::NamedTeammate => "named_teammate",
            Rule::TeamBinding => "team_binding",
            Rule::LeadOnly => "lead_only",
        }
    }
}

/// A rejected request: which rule fired and the remediation to show the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub rule: Rule,
    pub message: String,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Block(Block),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Rules in precedence order.
pub const RULES: [Rule; 3] = [Rule::NamedTeammate, Rule::TeamBinding, Rule::LeadOnly];

pub fn is_orchestrator_role(agent_kind: &str, config: Option<&ProjectConfig>) -> bool {
    BUILTIN_ORCHESTRATOR_ROLES.contains(&agent_kind)
        || config.is_some_and(|c| c.orchestrator_roles.iter().any(|r| r == agent_kind))
}

/// Evaluate `request` against [`RULES`]; the first block wins.
pub fn evaluate(
    request: &SpawnRequest,
    config: Option<&ProjectConfig>,
    leads: &dyn LeadResolver,
) -> Decision {
    RULES
        .iter()
        .find_map(|rule| check(*rule, request, config, leads))
        .map_or(Decision::Allow, Decision::Block)
}

fn check(
    rule: Rule,
    request: &SpawnRequest,
    config: Option<&ProjectConfig>,
    leads: &dyn LeadResolver,
) -> Option<Block> {
    match rule {
        Rule::NamedTeammate => {
            if request.teammate_name.is_some() || !is_orchestrator_role(&request.agent_kind, config)
            {
                return None;
            }
            Some(named_teammate_block(&request.agent_kind))
        }
        Rule::TeamBinding => {
            let team = request.team_name.as_deref()?;
            let required = config.and_then(|c| c.required_team.as_deref())?;
            if team == required {
                return None;
            }
            Some(team_binding_block(request, team, required))
        }
        Rule::LeadOnly => {
            let team = request.team_name.as_deref()?;
            let Some(lead) = leads.resolve_lead(team) else {
                tracing::debug!(team, "team has no registered lead; allowing");
                return None;
            };
            if request.caller_session_id == lead {
                return None;
            }
            Some(lead_only_block(team))
        }
    }
}

// ---------------------------------------------------------------------------
// Remediation messages
// ---------------------------------------------------------------------------

fn named_teammate_block(agent_kind: &str) -> Block {
    Block {
        rule: Rule::NamedTeammate,
        message: format!(
            "BLOCKED: '{agent_kind}' must be launched as a named teammate.\n\
             \n\
             Correct:\n  \
             Task(subagent_type=\"{agent_kind}\", name=\"sm-sprint-X\", team_name=\"<team>\", ...)\n\
             \n\
             Wrong:\n  \
             Task(subagent_type=\"{agent_kind}\", run_in_background=true)  # no name = blocked\n"
        ),
    }
}

fn team_binding_block(request: &SpawnRequest, team: &str, required: &str) -> Block {
    let kind = if request.agent_kind.is_empty() {
        "..."
    } else {
        request.agent_kind.as_str()
    };
    let name = request.teammate_name.as_deref().unwrap_or("<name>");
    Block {
        rule: Rule::TeamBinding,
        message: format!(
            "BLOCKED: team_name '{team}' does not match this project's team '{required}'.\n\
             \n\
             This project is bound to '{required}' by .atm.toml ([core] default_team).\n\
             \n\
             Correct:\n  \
             Task(subagent_type=\"{kind}\", name=\"{name}\", team_name=\"{required}\", ...)\n"
        ),
    }
}

fn lead_only_block(team: &str) -> Block {
    Block {
        rule: Rule::LeadOnly,
        message: format!(
            "BLOCKED: Only the team lead can spawn agents with team_name.\n\
             \n\
             You are a teammate. Use background agents:\n  \
             Task(subagent_type=\"...\", run_in_background=true, prompt=\"...\")  # no team_name\n\
             \n\
             NOT allowed from teammates:\n  \
             Task(..., team_name=\"{team}\", ...)  # creates named teammate\n"
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
