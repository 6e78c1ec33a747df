//! Reading and writing plan files.

use std::path::Path;

use anyhow::{Context, Result};

use devplan_core::plan::{Plan, parse_plan_file};

/// Read and parse a plan JSON file.
pub fn read_plan(path: &Path) -> Result<Plan> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read plan file: {}", path.display()))?;
    parse_plan_file(&content)
        .with_context(|| format!("failed to parse plan file: {}", path.display()))
}

/// Write `plan` as JSON with two-space indentation.
pub fn write_plan(path: &Path, plan: &Plan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan).context("failed to serialize plan")?;
    write_file(path, &json)
}

/// Write `contents` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write {}", path.display()))
}
