//! Pull-request policy rules.
//!
//! Each rule reads a [`PullRequestView`] and either passes or returns a single
//! message for the PR author. Rules never fail hard: a missing section is
//! reported as an ordinary finding.

use crate::models::{CheckConfig, PullRequestView};
use regex::Regex;

/// Keywords GitHub recognises for closing an issue from a PR description
pub const LINKING_VERBS: [&str; 9] = [
    "close", "closes", "closed", "fix", "fixes", "fixed", "resolve", "resolves", "resolved",
];

/// Whether `word` is a linking verb (case-insensitive)
pub fn is_linking_verb(word: &str) -> bool {
    let lower = word.to_lowercase();
    LINKING_VERBS.contains(&lower.as_str())
}

/// A single policy check
pub trait Rule: Send + Sync {
    /// Stable identifier, used in JSON output and logs
    fn name(&self) -> &'static str;

    /// `None` when the PR passes, otherwise the violation message
    fn check(&self, pr: &PullRequestView) -> Option<String>;
}

/// The fixed, ordered rule set
pub fn default_rules(config: &CheckConfig) -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(TitleIssueRefRule::new()),
        Box::new(RequiredSectionRule::new(&config.sections.change_summary)),
        Box::new(IssueLinkingVerbRule::new(&config.sections.related_issue)),
        Box::new(ChecklistRule::new(&config.sections.checklist)),
        Box::new(ChangelogFileRule::new(&config.changelog.dir)),
    ]
}

// =============================================================================
// Title
// =============================================================================

/// PR titles must not reference issues (`#123`)
pub struct TitleIssueRefRule {
    reference: Regex,
}

impl TitleIssueRefRule {
    pub fn new() -> Self {
        Self {
            reference: Regex::new(r"#\d+").expect("valid issue reference pattern"),
        }
    }
}

impl Default for TitleIssueRefRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for TitleIssueRefRule {
    fn name(&self) -> &'static str {
        "title-issue-ref"
    }

    fn check(&self, pr: &PullRequestView) -> Option<String> {
        self.reference.find(&pr.title).map(|m| {
            format!(
                "PR titles shouldn't contain issue IDs, found: `{}`.",
                m.as_str()
            )
        })
    }
}

// =============================================================================
// Required section
// =============================================================================

/// The body must contain a section with the given title
pub struct RequiredSectionRule {
    title: String,
}

impl RequiredSectionRule {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Rule for RequiredSectionRule {
    fn name(&self) -> &'static str {
        "required-section"
    }

    fn check(&self, pr: &PullRequestView) -> Option<String> {
        pr.document.get(&self.title).err().map(|e| e.to_string())
    }
}

// =============================================================================
// Issue linking verbs
// =============================================================================

/// First `#N` reference in a text, with the word right before it (if any)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef<'a> {
    pub verb: Option<&'a str>,
    pub number: &'a str,
    /// `verb #N` when a verb was found, `#N` otherwise
    pub matched: &'a str,
}

/// Finds issue references and the verb in front of them
pub struct IssueRefMatcher {
    reference: Regex,
    verb_before: Regex,
}

impl IssueRefMatcher {
    pub fn new() -> Self {
        Self {
            reference: Regex::new(r"#(\d+)").expect("valid issue reference pattern"),
            verb_before: Regex::new(r"(\w+)\s+$").expect("valid verb pattern"),
        }
    }

    /// Locate the first `#<digits>` occurrence and the word token preceding it.
    ///
    /// The verb must be separated from `#` by whitespace only.
    pub fn find<'a>(&self, text: &'a str) -> Option<IssueRef<'a>> {
        let caps = self.reference.captures(text)?;
        let whole = caps.get(0)?;
        let number = caps.get(1)?.as_str();

        let prefix = &text[..whole.start()];
        match self.verb_before.captures(prefix).and_then(|c| c.get(1)) {
            Some(verb) => Some(IssueRef {
                verb: Some(verb.as_str()),
                number,
                matched: &text[verb.start()..whole.end()],
            }),
            None => Some(IssueRef {
                verb: None,
                number,
                matched: whole.as_str(),
            }),
        }
    }
}

impl Default for IssueRefMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Issue references in the related-issue section must use a linking verb.
///
/// Referencing no issue at all is fine. Only the first reference is checked,
/// and nothing verifies that the number points at a real issue.
pub struct IssueLinkingVerbRule {
    section: String,
    matcher: IssueRefMatcher,
}

impl IssueLinkingVerbRule {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            matcher: IssueRefMatcher::new(),
        }
    }
}

impl Rule for IssueLinkingVerbRule {
    fn name(&self) -> &'static str {
        "issue-linking-verb"
    }

    fn check(&self, pr: &PullRequestView) -> Option<String> {
        let section = match pr.document.section(&self.section) {
            Ok(s) => s,
            Err(e) => return Some(e.to_string()),
        };

        let text = section.text();
        let issue_ref = self.matcher.find(&text)?;

        match issue_ref.verb {
            None => Some("Issue refs should use valid linking verbs like 'fixes #N'.".to_string()),
            Some(verb) if !is_linking_verb(verb) => Some(format!(
                "Issue refs should use valid linking verbs like `fixes #{}` not `{}`.",
                issue_ref.number, issue_ref.matched
            )),
            Some(_) => None,
        }
    }
}

// =============================================================================
// Checklist
// =============================================================================

/// Every task in the checklist section must be ticked off
pub struct ChecklistRule {
    section: String,
}

impl ChecklistRule {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
        }
    }
}

impl Rule for ChecklistRule {
    fn name(&self) -> &'static str {
        "checklist"
    }

    fn check(&self, pr: &PullRequestView) -> Option<String> {
        let section = match pr.document.section(&self.section) {
            Ok(s) => s,
            Err(e) => return Some(e.to_string()),
        };

        let incomplete = section
            .list_items()
            .iter()
            .filter(|item| item.visible_text().trim().starts_with("[ ]"))
            .count();

        if incomplete > 0 {
            Some(format!(
                "Complete the remaining {} checklist task(s)",
                incomplete
            ))
        } else {
            None
        }
    }
}

// =============================================================================
// Change-log file
// =============================================================================

/// The PR must add `<dir>/<number>-<author>.md` written by the PR author
pub struct ChangelogFileRule {
    dir: String,
    path: Regex,
}

impl ChangelogFileRule {
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = dir.into();
        // the directory is escaped, so the pattern always compiles
        let pattern = format!(r"^{}/\d+-(\w+)\.md$", regex::escape(&dir));
        Self {
            path: Regex::new(&pattern).expect("valid change-log pattern"),
            dir,
        }
    }

    /// Author segment of a change-log path, if `path` is one
    pub fn changelog_author<'a>(&self, path: &'a str) -> Option<&'a str> {
        self.path
            .captures(path)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }
}

impl Rule for ChangelogFileRule {
    fn name(&self) -> &'static str {
        "changelog-file"
    }

    fn check(&self, pr: &PullRequestView) -> Option<String> {
        let authored = pr
            .files
            .iter()
            .filter_map(|f| self.changelog_author(f))
            .any(|author| author == pr.author);

        if authored {
            None
        } else {
            Some(format!(
                "Add a change description file `{}/[number]-[author].md` describing the change.",
                self.dir
            ))
        }
    }
}
