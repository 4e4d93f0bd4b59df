//! Rendering and delivery of a check report

use crate::github::PullRequestHost;
use crate::models::CheckReport;
use crate::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use std::io::Write;
use tracing::info;

pub const BANNER: &str = "Thank you for opening a pull request! \
    Before assigning it for review, please fix the following issue(s):";

/// Where a failing report goes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Print the report to stdout
    #[default]
    Print,
    /// Post the report as a PR comment
    Comment,
}

/// Banner followed by one `- ` bullet per finding; `None` for a passing report
pub fn render_report(report: &CheckReport) -> Option<String> {
    if report.is_passing() {
        return None;
    }

    let bullets = report
        .findings
        .iter()
        .map(|f| format!("- {}", f.message))
        .collect::<Vec<_>>()
        .join("\n");

    Some(format!("{}\n\n{}", BANNER, bullets))
}

/// Write the rendered report to `out`. Returns the exit code.
pub fn print_report(report: &CheckReport, out: &mut impl Write) -> Result<i32> {
    match render_report(report) {
        Some(text) => {
            writeln!(out, "{}", text)?;
            eprintln!(
                "{}",
                format!("✗ {} check(s) failed", report.len()).red()
            );
        }
        None => info!("All good! Nothing to do."),
    }
    Ok(report.exit_code())
}

/// Post the rendered report as a comment on the PR. Returns the exit code.
///
/// A passing report posts nothing.
pub async fn comment_report(
    report: &CheckReport,
    host: &dyn PullRequestHost,
    repo: &str,
    number: u64,
) -> Result<i32> {
    match render_report(report) {
        Some(text) => {
            info!("Found {} error(s), posting comment ...", report.len());
            host.post_comment(repo, number, &text)
                .await
                .with_context(|| format!("Failed to comment on PR {} in {}", number, repo))?;
        }
        None => info!("All good! Nothing to do."),
    }
    Ok(report.exit_code())
}
