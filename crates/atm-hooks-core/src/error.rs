use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("home directory not found: set ATM_HOME or HOME")]
    HomeNotFound,

    #[error("team registry entry for '{0}' has no leadSessionId")]
    NoLead(String),

    #[error("daemon socket timed out during {0}")]
    Timeout(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, HookError>;

/// A failure that was deliberately swallowed at a fail-open boundary.
///
/// Callers receive `Outcome<T>` and must pick the safe default themselves;
/// there is no path that turns an `Ignored` back into a user-visible error.
#[derive(Debug)]
pub struct Ignored(pub HookError);

impl From<HookError> for Ignored {
    fn from(err: HookError) -> Self {
        tracing::debug!(error = %err, "ignored failure");
        Ignored(err)
    }
}

impl From<std::io::Error> for Ignored {
    fn from(err: std::io::Error) -> Self {
        HookError::from(err).into()
    }
}

impl From<serde_json::Error> for Ignored {
    fn from(err: serde_json::Error) -> Self {
        HookError::from(err).into()
    }
}

impl From<toml::de::Error> for Ignored {
    fn from(err: toml::de::Error) -> Self {
        HookError::from(err).into()
    }
}

pub type Outcome<T> = std::result::Result<T, Ignored>;
