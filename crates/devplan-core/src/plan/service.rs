//! Plan service layer.
//!
//! Drives the generator: idea -> plan JSON -> validated, renumbered
//! [`Plan`] -> per-task implementation prompts. Calls are strictly
//! sequential; the tree is fully numbered before any task prompt is
//! requested.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::llm::TextGenerator;

use super::extract::parse_and_validate;
use super::model::Plan;
use super::numbering::{flatten, index_by_id, preorder_paths, task_at, task_at_mut};
use super::prompts::{build_plan_prompt, build_task_prompt};

/// Pause between task-prompt requests when none is configured.
pub const DEFAULT_PROMPT_DELAY: Duration = Duration::from_millis(500);

/// Outcome of [`populate_task_prompts`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptSummary {
    /// Prompts generated successfully.
    pub generated: usize,
    /// Tasks that already had a prompt.
    pub skipped: usize,
    /// Tasks that received an error placeholder.
    pub failed: usize,
}

/// Counts reported after a plan is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanStats {
    pub top_level_tasks: usize,
    pub total_tasks: usize,
    pub tasks_with_prompts: usize,
}

impl PlanStats {
    pub fn all_tasks_have_prompts(&self) -> bool {
        self.tasks_with_prompts == self.total_tasks
    }
}

/// Ask the generator for a plan expanding `idea`, then validate and
/// renumber it.
pub async fn generate_plan(generator: &dyn TextGenerator, idea: &str) -> Result<Plan> {
    info!(generator = generator.name(), "generating development plan");

    let raw = generator
        .generate(&build_plan_prompt(idea))
        .await
        .context("failed to generate development plan")?;

    let plan = parse_and_validate(&raw).context("generated development plan is invalid")?;
    Ok(plan.renumbered())
}

/// Fill in `prompt` for every task that lacks one, in pre-order.
///
/// A failed request does not abort the batch: the task gets a visible
/// `[Error generating prompt: ...]` placeholder and the next task is tried.
pub async fn populate_task_prompts(
    generator: &dyn TextGenerator,
    plan: &mut Plan,
    delay: Duration,
) -> PromptSummary {
    let mut summary = PromptSummary::default();

    // Build every request up front; dependency lookups only read names and
    // descriptions, which prompt generation never changes.
    let mut requests = Vec::new();
    {
        let index = index_by_id(&plan.tasks);
        for path in preorder_paths(&plan.tasks) {
            let Some(task) = task_at(&plan.tasks, &path) else {
                continue;
            };
            if task.has_prompt() {
                summary.skipped += 1;
                continue;
            }
            let prompt = build_task_prompt(&plan.title, &plan.description, task, &index);
            requests.push((path, task.task_id.clone(), prompt));
        }
    }

    let total = requests.len();
    info!(total, skipped = summary.skipped, "generating implementation prompts");

    for (n, (path, task_id, prompt)) in requests.into_iter().enumerate() {
        if n > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        info!(task_id = %task_id, "generating prompt ({}/{total})", n + 1);
        let text = match generator.generate(&prompt).await {
            Ok(text) => {
                summary.generated += 1;
                text.trim().to_owned()
            }
            Err(e) => {
                warn!(task_id = %task_id, error = %e, "failed to generate task prompt");
                summary.failed += 1;
                format!("[Error generating prompt: {e}]")
            }
        };

        if let Some(task) = task_at_mut(&mut plan.tasks, &path) {
            task.prompt = Some(text);
        }
    }

    summary
}

/// Count tasks and prompts in `plan`.
pub fn plan_stats(plan: &Plan) -> PlanStats {
    let all = flatten(&plan.tasks);
    PlanStats {
        top_level_tasks: plan.tasks.len(),
        total_tasks: all.len(),
        tasks_with_prompts: all.iter().filter(|t| t.has_prompt()).count(),
    }
}
