use serde::{Deserialize, Serialize};
use std::fmt;

/// One rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Name of the rule that produced it
    pub rule: String,
    /// Human-readable message shown to the PR author
    pub message: String,
}

impl Finding {
    pub fn new(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Findings from one full rule-set run, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub findings: Vec<Finding>,
}

impl CheckReport {
    pub fn new(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    /// An empty report means the PR passes
    pub fn is_passing(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Process exit code: 0 when passing, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.is_passing() {
            0
        } else {
            1
        }
    }

    pub fn messages(&self) -> Vec<&str> {
        self.findings.iter().map(|f| f.message.as_str()).collect()
    }
}
