pub mod check;
pub mod lint;
pub mod report;
pub mod sections;

use crate::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read a file, or stdin when `path` is "-"
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
