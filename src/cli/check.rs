//! `check` command: validate a live pull request on GitHub

use super::report::{comment_report, print_report, OutputMode};
use crate::github::{GithubClient, PullRequestHost};
use crate::models::{CheckConfig, PullRequestView};
use crate::validator::CheckRunner;
use crate::{Context, Result};
use clap::Args;

/// Action inputs reach us as `INPUT_<NAME>` environment variables
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Repository as OWNER/NAME
    #[arg(long, env = "INPUT_REPO")]
    pub repo: String,

    /// Pull request number
    #[arg(long, env = "INPUT_NUMBER")]
    pub number: u64,

    /// GitHub token
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: String,

    /// What to do with failing checks
    #[arg(long, env = "INPUT_OUTPUT", value_enum, default_value_t = OutputMode::Print)]
    pub output: OutputMode,
}

pub async fn run(args: CheckArgs, config: &CheckConfig) -> Result<i32> {
    let client = GithubClient::new(&config.github.api_url, &args.token)?;
    run_with_host(&client, &args.repo, args.number, args.output, config).await
}

/// Fetch, check and deliver against any host
pub async fn run_with_host(
    host: &dyn PullRequestHost,
    repo: &str,
    number: u64,
    output: OutputMode,
    config: &CheckConfig,
) -> Result<i32> {
    let data = host
        .fetch_pull_request(repo, number)
        .await
        .with_context(|| format!("Failed to load PR {} from {}", number, repo))?;

    let view = PullRequestView::try_from(data)
        .with_context(|| format!("Cannot split the body of PR {} into sections", number))?;

    let report = CheckRunner::new(config).run(&view);

    match output {
        OutputMode::Print => {
            let mut out = std::io::stdout().lock();
            print_report(&report, &mut out)
        }
        OutputMode::Comment => comment_report(&report, host, repo, number).await,
    }
}
