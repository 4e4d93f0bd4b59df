//! `sections` command: show how a markdown body is split into sections

use super::read_input;
use crate::parser::Document;
use crate::{Context, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SectionDump {
    pub title: String,
    pub level: u8,
    pub content: String,
}

pub fn run(input: &Path) -> Result<()> {
    let raw = read_input(input)?;
    let dump = dump_sections(&raw)?;
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}

/// Sections in document order with their visible text
pub fn dump_sections(raw: &str) -> Result<Vec<SectionDump>> {
    let doc = Document::parse(raw).context("Cannot split the document into sections")?;
    Ok(doc
        .sections()
        .iter()
        .map(|s| SectionDump {
            title: s.title.clone(),
            level: s.level,
            content: s
                .blocks
                .iter()
                .map(|b| b.visible_text())
                .collect::<Vec<_>>()
                .join("\n\n"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_keeps_document_order() {
        let dump = dump_sections("intro\n\n## B\n\nbee\n\n# A\n\n- one\n- two\n").unwrap();
        assert_eq!(
            dump,
            vec![
                SectionDump {
                    title: "B".to_string(),
                    level: 2,
                    content: "bee".to_string(),
                },
                SectionDump {
                    title: "A".to_string(),
                    level: 1,
                    content: "one\ntwo".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_dump_rejects_duplicates() {
        assert!(dump_sections("# A\n\n# A\n").is_err());
    }
}
