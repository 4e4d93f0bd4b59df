pub mod rules;
pub mod runner;

pub use rules::{
    default_rules, is_linking_verb, ChangelogFileRule, ChecklistRule, IssueLinkingVerbRule,
    IssueRef, IssueRefMatcher, RequiredSectionRule, Rule, TitleIssueRefRule, LINKING_VERBS,
};
pub use runner::CheckRunner;
