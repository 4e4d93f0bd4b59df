//! Integration tests for the PR check pipeline
//!
//! Tests verify:
//! - A fully filled-in PR template passes every rule
//! - Each policy violation produces exactly one finding, in rule order
//! - Malformed bodies (duplicate headings) abort before any rule runs

use prcheck::models::{CheckConfig, PullRequestData, PullRequestView};
use prcheck::validator::CheckRunner;
use prcheck::DocumentError;

const TEMPLATE: &str = r#"<!-- Thanks for contributing! -->

## Change Summary

Adds streaming support to the exporter.

* new `StreamWriter`
* docs updated

## Related issue number

Fixes #412

## Checklist

* [x] Unit tests for the changes exist
* [x] Tests pass on CI
* [x] Documentation reflects the changes where applicable
* [x] `changes/<pull request or issue id>-<github username>.md` file added describing change
"#;

fn data(title: &str, author: &str, body: &str, files: &[&str]) -> PullRequestData {
    PullRequestData {
        title: title.to_string(),
        body: Some(body.to_string()),
        author: author.to_string(),
        files: files.iter().map(|f| f.to_string()).collect(),
    }
}

fn run(data: PullRequestData) -> Vec<String> {
    let view = PullRequestView::try_from(data).unwrap();
    CheckRunner::default()
        .run(&view)
        .findings
        .into_iter()
        .map(|f| f.message)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_template_passes() {
        let findings = run(data(
            "Stream exporter output",
            "samuelcolvin",
            TEMPLATE,
            &["src/exporter.rs", "changes/412-samuelcolvin.md"],
        ));
        assert!(findings.is_empty(), "unexpected findings: {:?}", findings);
    }

    #[test]
    fn test_unfinished_template() {
        let body = TEMPLATE
            .replace("Fixes #412", "See #412")
            .replace("* [x] Tests pass on CI", "* [ ] Tests pass on CI");
        let findings = run(data(
            "Stream exporter output (#412)",
            "someone",
            &body,
            &["src/exporter.rs", "changes/412-samuelcolvin.md"],
        ));

        assert_eq!(
            findings,
            vec![
                "PR titles shouldn't contain issue IDs, found: `#412`.".to_string(),
                "Issue refs should use valid linking verbs like `fixes #412` not `See #412`."
                    .to_string(),
                "Complete the remaining 1 checklist task(s)".to_string(),
                "Add a change description file `changes/[number]-[author].md` describing the change."
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_template_comment_does_not_count_as_reference() {
        let body = TEMPLATE.replace(
            "Fixes #412",
            "<!-- Use a linking verb, e.g. 'fixes #1234' -->",
        );
        let findings = run(data(
            "Title",
            "samuelcolvin",
            &body,
            &["changes/412-samuelcolvin.md"],
        ));
        assert!(findings.is_empty(), "unexpected findings: {:?}", findings);
    }

    #[test]
    fn test_empty_body_reports_missing_sections() {
        let mut pr = data("Title", "user", "", &["changes/1-user.md"]);
        pr.body = None;
        let findings = run(pr);
        assert_eq!(
            findings,
            vec![
                "PR body should have a section titled `Change Summary`.",
                "PR body should have a section titled `Related issue number`.",
                "PR body should have a section titled `Checklist`.",
            ]
        );
    }

    #[test]
    fn test_headings_at_mixed_levels() {
        let body = "# Change Summary\n\ntext\n\n### Related issue number\n\nresolves #2\n\n## Checklist\n\n1. [x] ordered task\n";
        let findings = run(data("Title", "user", body, &["changes/2-user.md"]));
        assert!(findings.is_empty(), "unexpected findings: {:?}", findings);
    }

    #[test]
    fn test_duplicate_heading_aborts() {
        let body = "## Checklist\n\n* [x] a\n\n### Checklist\n\n* [ ] b\n";
        let err = PullRequestView::try_from(data("Title", "user", body, &[])).unwrap_err();
        assert_eq!(err, DocumentError::DuplicateHeading("Checklist".to_string()));
    }

    #[test]
    fn test_custom_section_titles() {
        let config: CheckConfig = toml::from_str(
            "[sections]\nchange_summary = \"Summary\"\nchecklist = \"Tasks\"\n\n[changelog]\ndir = \"news\"\n",
        )
        .unwrap();
        let body = "## Summary\n\nx\n\n## Related issue number\n\n## Tasks\n\n- [ ] pending\n";
        let view =
            PullRequestView::try_from(data("Title", "kim", body, &["news/5-kim.md"])).unwrap();
        let report = CheckRunner::new(&config).run(&view);
        assert_eq!(
            report.messages(),
            vec!["Complete the remaining 1 checklist task(s)"]
        );
    }

    #[test]
    fn test_quoted_section_is_found() {
        let body = "> ## Change Summary\n>\n> text\n\n## Related issue number\n\n## Checklist\n";
        let findings = run(data("Title", "user", body, &["changes/3-user.md"]));
        assert!(findings.is_empty(), "unexpected findings: {:?}", findings);
    }

    #[test]
    fn test_html_checklist() {
        let body = "## Change Summary\n\n## Related issue number\n\n<h2>Checklist</h2>\n\n<ul><li>[ ] x</li></ul>\n";
        let findings = run(data("Title", "user", body, &["changes/3-user.md"]));
        assert_eq!(findings, vec!["Complete the remaining 1 checklist task(s)"]);
    }

    #[test]
    fn test_duplicate_heading_in_quote_aborts() {
        let body = "# Checklist\n\n- [x] a\n\n> ## Checklist\n>\n> - [ ] b\n";
        let err = PullRequestView::try_from(data("Title", "user", body, &[])).unwrap_err();
        assert_eq!(err, DocumentError::DuplicateHeading("Checklist".to_string()));
    }
}
