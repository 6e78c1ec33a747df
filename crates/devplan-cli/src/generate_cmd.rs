//! `devplan generate <idea>`: ask the model for a plan, fill in task
//! prompts, and write the plan JSON.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};
use tracing::{info, warn};

use devplan_core::llm::{OpenRouterClient, TextGenerator};
use devplan_core::plan::{
    Plan, dangling_dependencies, generate_plan, plan_stats, populate_task_prompts,
};

use crate::config::DevplanConfig;
use crate::output::write_plan;

/// File name used when no `--output` is given.
pub const DEFAULT_PLAN_FILE: &str = "development_plan.json";

pub struct GenerateOptions {
    pub output: Option<PathBuf>,
    pub model: Option<String>,
    pub skip_prompts: bool,
    pub delay: Duration,
}

pub async fn run_generate(idea: Option<&str>, options: &GenerateOptions) -> Result<()> {
    let Some(idea) = idea.map(str::trim).filter(|i| !i.is_empty()) else {
        bail!("no project idea given\nUsage: devplan generate \"<your project idea>\"");
    };

    let config = DevplanConfig::resolve(options.model.as_deref())?;
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| config.output.plans_dir.join(DEFAULT_PLAN_FILE));

    let client = OpenRouterClient::new(config.openrouter);
    info!(model = client.model(), "generating development plan");

    let plan = build_plan(&client, idea, options).await?;

    write_plan(&output, &plan)?;
    report(&plan, &output);
    Ok(())
}

/// Generate the plan and, unless skipped, its task prompts.
async fn build_plan(
    generator: &dyn TextGenerator,
    idea: &str,
    options: &GenerateOptions,
) -> Result<Plan> {
    let mut plan = generate_plan(generator, idea).await?;

    for dangling in dangling_dependencies(&plan) {
        warn!(
            task_id = %dangling.task_id,
            dependency = %dangling.dependency,
            "dependency does not name any task in the plan"
        );
    }

    if options.skip_prompts {
        info!("skipping task prompt generation");
    } else {
        let summary = populate_task_prompts(generator, &mut plan, options.delay).await;
        if summary.failed > 0 {
            warn!(
                failed = summary.failed,
                "some task prompts could not be generated"
            );
        }
    }

    Ok(plan)
}

fn report(plan: &Plan, output: &Path) {
    let stats = plan_stats(plan);
    println!("Development plan saved to {}", output.display());
    println!();
    println!("  Title:            {}", plan.title);
    println!("  Top-level tasks:  {}", stats.top_level_tasks);
    println!("  Total tasks:      {}", stats.total_tasks);
    println!(
        "  All prompts:      {}",
        if stats.all_tasks_have_prompts() { "yes" } else { "no" }
    );
    println!();
    println!("Next: run `devplan render {}`.", output.display());
}
