//! Integration tests for the `check` command flow against an in-memory host
//!
//! Tests verify:
//! - Failing PRs get exactly one comment carrying the rendered report
//! - Passing PRs get no comment and exit code 0
//! - Host failures and duplicate headings surface as errors, not findings

use async_trait::async_trait;
use prcheck::cli::check::run_with_host;
use prcheck::cli::report::{OutputMode, BANNER};
use prcheck::github::{GithubError, PullRequestHost};
use prcheck::models::{CheckConfig, PullRequestData};
use std::sync::Mutex;

struct FakeHost {
    pull: Option<PullRequestData>,
    comments: Mutex<Vec<(String, u64, String)>>,
}

impl FakeHost {
    fn new(pull: PullRequestData) -> Self {
        Self {
            pull: Some(pull),
            comments: Mutex::new(Vec::new()),
        }
    }

    fn unreachable() -> Self {
        Self {
            pull: None,
            comments: Mutex::new(Vec::new()),
        }
    }

    fn comments(&self) -> Vec<(String, u64, String)> {
        self.comments.lock().unwrap().clone()
    }
}

#[async_trait]
impl PullRequestHost for FakeHost {
    async fn fetch_pull_request(
        &self,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestData, GithubError> {
        self.pull.clone().ok_or_else(|| GithubError::Status {
            status: 404,
            url: format!("https://api.github.com/repos/{}/pulls/{}", repo, number),
            body: "Not Found".to_string(),
        })
    }

    async fn post_comment(&self, repo: &str, number: u64, body: &str) -> Result<(), GithubError> {
        self.comments
            .lock()
            .unwrap()
            .push((repo.to_string(), number, body.to_string()));
        Ok(())
    }
}

fn pull(title: &str, body: &str, files: &[&str]) -> PullRequestData {
    PullRequestData {
        title: title.to_string(),
        body: Some(body.to_string()),
        author: "user".to_string(),
        files: files.iter().map(|f| f.to_string()).collect(),
    }
}

const PASSING_BODY: &str = "## Change Summary\n\n## Related issue number\n\n## Checklist";

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failing_pr_gets_one_comment() {
        let host = FakeHost::new(pull("Fix #9", PASSING_BODY, &["changes/9-user.md"]));
        let code = run_with_host(
            &host,
            "octo/repo",
            9,
            OutputMode::Comment,
            &CheckConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(code, 1);
        let comments = host.comments();
        assert_eq!(comments.len(), 1);
        let (repo, number, body) = &comments[0];
        assert_eq!(repo, "octo/repo");
        assert_eq!(*number, 9);
        assert_eq!(
            body,
            &format!(
                "{}\n\n- PR titles shouldn't contain issue IDs, found: `#9`.",
                BANNER
            )
        );
    }

    #[tokio::test]
    async fn test_passing_pr_posts_nothing() {
        let host = FakeHost::new(pull("Title", PASSING_BODY, &["changes/123-user.md"]));
        let code = run_with_host(
            &host,
            "octo/repo",
            1,
            OutputMode::Comment,
            &CheckConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(code, 0);
        assert!(host.comments().is_empty());
    }

    #[tokio::test]
    async fn test_print_mode_never_comments() {
        let host = FakeHost::new(pull("Fix #9", "", &[]));
        let code = run_with_host(
            &host,
            "octo/repo",
            9,
            OutputMode::Print,
            &CheckConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(code, 1);
        assert!(host.comments().is_empty());
    }

    #[tokio::test]
    async fn test_host_error_is_surfaced() {
        let host = FakeHost::unreachable();
        let err = run_with_host(
            &host,
            "octo/repo",
            5,
            OutputMode::Comment,
            &CheckConfig::default(),
        )
        .await
        .unwrap_err();

        let chain = format!("{:#}", err);
        assert!(chain.contains("Failed to load PR 5 from octo/repo"));
        assert!(chain.contains("404"));
        assert!(host.comments().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_heading_is_fatal() {
        let host = FakeHost::new(pull("Title", "# Same\n\n## Same\n", &[]));
        let err = run_with_host(
            &host,
            "octo/repo",
            2,
            OutputMode::Comment,
            &CheckConfig::default(),
        )
        .await
        .unwrap_err();

        assert!(format!("{:#}", err).contains("multiple headings 'Same'"));
        assert!(host.comments().is_empty());
    }
}
