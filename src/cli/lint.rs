//! `lint` command: check a PR description offline

use super::read_input;
use super::report::print_report;
use crate::models::{CheckConfig, CheckReport, PullRequestView};
use crate::validator::CheckRunner;
use crate::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct LintArgs {
    /// PR title
    #[arg(long)]
    pub title: String,

    /// PR author handle
    #[arg(long)]
    pub author: String,

    /// Markdown file holding the PR body ("-" for stdin)
    #[arg(long)]
    pub body: Option<PathBuf>,

    /// Changed file path (repeatable)
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<String>,

    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: LintArgs, config: &CheckConfig) -> Result<i32> {
    let body = match &args.body {
        Some(path) => Some(read_input(path)?),
        None => None,
    };

    let report = lint(&args.title, &args.author, body.as_deref(), args.files, config)?;

    let mut out = std::io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
        Ok(report.exit_code())
    } else {
        print_report(&report, &mut out)
    }
}

/// Run the rule set over local data
pub fn lint(
    title: &str,
    author: &str,
    body: Option<&str>,
    files: Vec<String>,
    config: &CheckConfig,
) -> Result<CheckReport> {
    let view = PullRequestView::new(title, author, body, files)
        .context("Cannot split the PR body into sections")?;
    Ok(CheckRunner::new(config).run(&view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lint_passing() {
        let body = "## Change Summary\n\nStuff.\n\n## Related issue number\n\nFixes #3\n\n## Checklist\n\n- [x] tests\n";
        let report = lint(
            "Add stuff",
            "erin",
            Some(body),
            vec!["changes/3-erin.md".to_string()],
            &CheckConfig::default(),
        )
        .unwrap();
        assert!(report.is_passing());
    }

    #[test]
    fn test_lint_without_body() {
        let report = lint("Add stuff", "erin", None, vec![], &CheckConfig::default()).unwrap();
        assert_eq!(report.len(), 4);
    }

    #[test]
    fn test_lint_duplicate_heading_is_error() {
        let err = lint(
            "t",
            "u",
            Some("## Checklist\n\n## Checklist\n"),
            vec![],
            &CheckConfig::default(),
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("multiple headings 'Checklist'"));
    }
}
