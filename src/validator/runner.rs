use super::rules::{default_rules, Rule};
use crate::models::{CheckConfig, CheckReport, Finding, PullRequestView};
use tracing::{debug, info};

/// Runs every rule against one pull request and collects the findings.
///
/// All rules always run, so the author sees every violation at once. The
/// report keeps rule order.
pub struct CheckRunner {
    rules: Vec<Box<dyn Rule>>,
}

impl CheckRunner {
    /// Runner over the default rule set
    pub fn new(config: &CheckConfig) -> Self {
        Self::with_rules(default_rules(config))
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn run(&self, pr: &PullRequestView) -> CheckReport {
        info!("Running PR checks");

        let findings = self
            .rules
            .iter()
            .filter_map(|rule| {
                let outcome = rule.check(pr);
                debug!(rule = rule.name(), passed = outcome.is_none(), "rule evaluated");
                outcome.map(|message| Finding::new(rule.name(), message))
            })
            .collect();

        CheckReport::new(findings)
    }
}

impl Default for CheckRunner {
    fn default() -> Self {
        Self::new(&CheckConfig::default())
    }
}
