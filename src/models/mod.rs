pub mod config;
pub mod finding;
pub mod pull_request;

pub use config::{ChangelogConfig, CheckConfig, GithubConfig, SectionTitles, DEFAULT_CONFIG_PATH};
pub use finding::{CheckReport, Finding};
pub use pull_request::{PullRequestData, PullRequestView};
