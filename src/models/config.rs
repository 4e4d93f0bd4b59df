use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the config file, relative to the repository root
pub const DEFAULT_CONFIG_PATH: &str = ".github/prcheck.toml";

// =============================================================================
// Section Titles
// =============================================================================

/// Titles of the body sections the rules look up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTitles {
    #[serde(default = "default_change_summary")]
    pub change_summary: String,

    #[serde(default = "default_related_issue")]
    pub related_issue: String,

    #[serde(default = "default_checklist")]
    pub checklist: String,
}

fn default_change_summary() -> String {
    "Change Summary".to_string()
}

fn default_related_issue() -> String {
    "Related issue number".to_string()
}

fn default_checklist() -> String {
    "Checklist".to_string()
}

impl Default for SectionTitles {
    fn default() -> Self {
        Self {
            change_summary: default_change_summary(),
            related_issue: default_related_issue(),
            checklist: default_checklist(),
        }
    }
}

// =============================================================================
// Change Log
// =============================================================================

/// Where per-author change-log files live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogConfig {
    /// Directory holding `<number>-<author>.md` files
    #[serde(default = "default_changelog_dir")]
    pub dir: String,
}

fn default_changelog_dir() -> String {
    "changes".to_string()
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            dir: default_changelog_dir(),
        }
    }
}

// =============================================================================
// GitHub
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubConfig {
    /// REST API base URL (GitHub Enterprise installs use their own)
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

// =============================================================================
// Check Configuration
// =============================================================================

/// prcheck configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    #[serde(default)]
    pub sections: SectionTitles,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub github: GithubConfig,
}

impl CheckConfig {
    /// Load config from `path`, falling back to defaults when it doesn't exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: CheckConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the config path: an explicit one wins over the default location
    pub fn path_or_default(explicit: Option<PathBuf>) -> PathBuf {
        explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}
