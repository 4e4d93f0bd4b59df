//! GitHub REST client
//!
//! Fetches pull-request metadata and the changed-file list, and posts the
//! check report back as a comment.

use crate::models::PullRequestData;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const API_VERSION: &str = "2022-11-28";
const FILES_PER_PAGE: usize = 100;
/// GitHub stops listing changed files after 3000 entries
const MAX_FILE_PAGES: usize = 30;

/// Errors talking to the GitHub API
#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("GitHub returned {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Failed to decode GitHub response: {0}")]
    Decode(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl From<reqwest::Error> for GithubError {
    fn from(err: reqwest::Error) -> Self {
        GithubError::Http(err.to_string())
    }
}

/// Where pull requests come from and where reports go
#[async_trait]
pub trait PullRequestHost: Send + Sync {
    async fn fetch_pull_request(
        &self,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestData, GithubError>;

    async fn post_comment(&self, repo: &str, number: u64, body: &str) -> Result<(), GithubError>;
}

#[derive(Debug, Deserialize)]
struct PullPayload {
    title: String,
    body: Option<String>,
    user: UserPayload,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    login: String,
}

#[derive(Debug, Deserialize)]
struct FilePayload {
    filename: String,
}

#[derive(Debug, Serialize)]
struct CommentPayload<'a> {
    body: &'a str,
}

/// GitHub API client authenticated with a token
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
}

impl GithubClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self, GithubError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| GithubError::InvalidToken(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .user_agent(format!("prcheck/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn pull_url(&self, repo: &str, number: u64) -> String {
        format!("{}/repos/{}/pulls/{}", self.api_url, repo, number)
    }

    fn files_url(&self, repo: &str, number: u64, page: usize) -> String {
        format!(
            "{}/files?per_page={}&page={}",
            self.pull_url(repo, number),
            FILES_PER_PAGE,
            page
        )
    }

    fn comments_url(&self, repo: &str, number: u64) -> String {
        // issues and PRs share the comments endpoint
        format!("{}/repos/{}/issues/{}/comments", self.api_url, repo, number)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GithubError> {
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        let response = ensure_success(response, url).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| GithubError::Decode(e.to_string()))
    }

    async fn changed_files(&self, repo: &str, number: u64) -> Result<Vec<String>, GithubError> {
        let mut files = Vec::new();
        for page in 1..=MAX_FILE_PAGES {
            let batch: Vec<FilePayload> = self.get_json(&self.files_url(repo, number, page)).await?;
            let last = batch.len() < FILES_PER_PAGE;
            files.extend(batch.into_iter().map(|f| f.filename));
            if last {
                break;
            }
        }
        Ok(files)
    }
}

#[async_trait]
impl PullRequestHost for GithubClient {
    async fn fetch_pull_request(
        &self,
        repo: &str,
        number: u64,
    ) -> Result<PullRequestData, GithubError> {
        info!("Loading PR {} for repository {}", number, repo);
        let pull: PullPayload = self.get_json(&self.pull_url(repo, number)).await?;
        let files = self.changed_files(repo, number).await?;
        debug!("PR {} changes {} file(s)", number, files.len());

        Ok(PullRequestData {
            title: pull.title,
            body: pull.body,
            author: pull.user.login,
            files,
        })
    }

    async fn post_comment(&self, repo: &str, number: u64, body: &str) -> Result<(), GithubError> {
        let url = self.comments_url(repo, number);
        debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .json(&CommentPayload { body })
            .send()
            .await?;
        ensure_success(response, &url).await?;
        Ok(())
    }
}

async fn ensure_success(
    response: reqwest::Response,
    url: &str,
) -> Result<reqwest::Response, GithubError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GithubError::Status {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    })
}
