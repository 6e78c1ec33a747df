//! `devplan renumber <plan.json>`: re-apply canonical ids after hand edits.

use std::path::Path;

use anyhow::Result;
use tracing::warn;

use devplan_core::plan::{dangling_dependencies, task_count};

use crate::output::{read_plan, write_plan};

pub fn run_renumber(file: &Path, output: Option<&Path>) -> Result<()> {
    let plan = read_plan(file)?.renumbered();

    for dangling in dangling_dependencies(&plan) {
        warn!(
            task_id = %dangling.task_id,
            dependency = %dangling.dependency,
            "dependency does not name any task in the plan"
        );
    }

    let target = output.unwrap_or(file);
    write_plan(target, &plan)?;

    println!(
        "Renumbered {} tasks; written to {}",
        task_count(&plan.tasks),
        target.display()
    );
    Ok(())
}
