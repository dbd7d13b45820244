pub mod audit;
pub mod config;
pub mod daemon;
pub mod error;
pub mod event;
pub mod io;
pub mod paths;
pub mod policy;
pub mod registry;
pub mod relay;
pub mod session;

pub use error::{HookError, Ignored, Outcome, Result};
