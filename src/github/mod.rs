pub mod client;

pub use client::{GithubClient, GithubError, PullRequestHost};
