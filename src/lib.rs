// prcheck - pull-request policy checks
// Splits a PR description into sections and runs the contribution rules over it

pub mod cli;
pub mod github;
pub mod models;
pub mod parser;
pub mod telemetry;
pub mod validator;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use models::{CheckConfig, CheckReport, Finding, PullRequestData, PullRequestView};
pub use parser::{Document, DocumentError};
pub use validator::CheckRunner;
