//! Integration tests for the plan generation pipeline.
//!
//! Drives `generate_plan` and `populate_task_prompts` with a scripted
//! generator, so no network access is needed.

use std::time::Duration;

use devplan_core::plan::{
    Plan, dangling_dependencies, generate_plan, parse_and_validate, plan_stats,
    populate_task_prompts,
};
use devplan_test_utils::{
    Reply, SAMPLE_PLAN_JSON, ScriptedGenerator, fenced_sample_reply, schema_echo_sample_reply,
};

fn ids(plan: &Plan) -> Vec<String> {
    devplan_core::plan::flatten(&plan.tasks)
        .iter()
        .map(|t| t.task_id.clone())
        .collect()
}

#[tokio::test]
async fn generate_plan_numbers_fenced_reply() {
    let generator = ScriptedGenerator::new([Reply::Text(fenced_sample_reply())]);
    let plan = generate_plan(&generator, "recipes from my pantry").await.unwrap();

    assert_eq!(plan.title, "Recipe Recommender");
    assert_eq!(ids(&plan), vec!["1", "1.1", "1.2", "2"]);
    // "1" under prefix "1." is rewritten; root-level "1" is kept.
    assert_eq!(plan.tasks[0].tasks[1].dependencies, vec!["1.1"]);
    assert_eq!(plan.tasks[1].dependencies, vec!["1"]);
    assert!(plan.tasks[0].tasks[0].dependencies.is_empty());

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("\"recipes from my pantry\""));
}

#[tokio::test]
async fn schema_echo_matches_plain_plan() {
    let plain = parse_and_validate(SAMPLE_PLAN_JSON).unwrap();
    let echoed = parse_and_validate(&schema_echo_sample_reply()).unwrap();
    assert_eq!(plain, echoed);

    let generator = ScriptedGenerator::new([Reply::Text(schema_echo_sample_reply())]);
    let plan = generate_plan(&generator, "idea").await.unwrap();
    assert_eq!(plan, plain.renumbered());
}

#[tokio::test]
async fn generate_plan_surfaces_collaborator_failure() {
    let generator = ScriptedGenerator::new([Reply::Status(401, "{\"error\":\"bad key\"}".to_owned())]);
    let err = generate_plan(&generator, "idea").await.unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("failed to generate development plan"), "got: {chain}");
    assert!(chain.contains("401"), "got: {chain}");
    assert!(chain.contains("bad key"), "got: {chain}");
}

#[tokio::test]
async fn generate_plan_surfaces_missing_fields() {
    let generator = ScriptedGenerator::new([Reply::Text(r#"{"title":"Only title"}"#.to_owned())]);
    let err = generate_plan(&generator, "idea").await.unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("description, tasks"), "got: {chain}");
}

#[tokio::test]
async fn prompts_are_populated_in_preorder() {
    let mut plan = parse_and_validate(SAMPLE_PLAN_JSON).unwrap().renumbered();
    let generator = ScriptedGenerator::new([
        Reply::Text("  prompt for 1  ".to_owned()),
        Reply::Text("prompt for 1.1".to_owned()),
        Reply::Text("prompt for 1.2".to_owned()),
        Reply::Text("prompt for 2".to_owned()),
    ]);

    let summary = populate_task_prompts(&generator, &mut plan, Duration::ZERO).await;
    assert_eq!(summary.generated, 4);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.skipped, 0);

    assert_eq!(plan.tasks[0].prompt.as_deref(), Some("prompt for 1"));
    assert_eq!(plan.tasks[0].tasks[0].prompt.as_deref(), Some("prompt for 1.1"));
    assert_eq!(plan.tasks[0].tasks[1].prompt.as_deref(), Some("prompt for 1.2"));
    assert_eq!(plan.tasks[1].prompt.as_deref(), Some("prompt for 2"));

    let requests = generator.prompts();
    assert!(requests[0].contains("Task ID: 1\n"));
    assert!(requests[2].contains("Task ID: 1.2\n"));
    assert!(requests[2].contains("1.1: Recipe schema - Tables for recipes."));
    assert!(plan_stats(&plan).all_tasks_have_prompts());
}

#[tokio::test]
async fn failed_prompt_gets_placeholder_and_batch_continues() {
    let mut plan = parse_and_validate(SAMPLE_PLAN_JSON).unwrap().renumbered();
    let generator = ScriptedGenerator::new([
        Reply::Text("one".to_owned()),
        Reply::Status(429, "slow down".to_owned()),
        Reply::Text("three".to_owned()),
        Reply::Text("four".to_owned()),
    ]);

    let summary = populate_task_prompts(&generator, &mut plan, Duration::ZERO).await;
    assert_eq!(summary.generated, 3);
    assert_eq!(summary.failed, 1);

    let placeholder = plan.tasks[0].tasks[0].prompt.as_deref().unwrap();
    assert!(placeholder.starts_with("[Error generating prompt: "), "got: {placeholder}");
    assert!(placeholder.contains("429"));
    assert_eq!(plan.tasks[1].prompt.as_deref(), Some("four"));
}

#[tokio::test]
async fn existing_prompts_are_skipped() {
    let mut plan = parse_and_validate(SAMPLE_PLAN_JSON).unwrap().renumbered();
    plan.tasks[1].prompt = Some("hand written".to_owned());
    let generator = ScriptedGenerator::repeating("generated", 3);

    let summary = populate_task_prompts(&generator, &mut plan, Duration::from_millis(1)).await;
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.generated, 3);
    assert_eq!(generator.prompts().len(), 3);
    assert_eq!(plan.tasks[1].prompt.as_deref(), Some("hand written"));
}

#[tokio::test]
async fn whitespace_prompt_counts_as_present_but_empty_does_not() {
    let mut plan = parse_and_validate(SAMPLE_PLAN_JSON).unwrap().renumbered();
    plan.tasks[0].prompt = Some("  ".to_owned());
    plan.tasks[1].prompt = Some(String::new());
    let generator = ScriptedGenerator::repeating("generated", 3);

    let summary = populate_task_prompts(&generator, &mut plan, Duration::ZERO).await;
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.generated, 3);
    assert_eq!(plan.tasks[0].prompt.as_deref(), Some("  "));
    assert_eq!(plan.tasks[1].prompt.as_deref(), Some("generated"));
}

#[tokio::test]
async fn cross_branch_dependency_is_reported_not_fixed() {
    let raw = r#"{"title":"T","description":"D","tasks":[
        {"name":"A","description":"a","tasks":[{"name":"A1","description":"a1"}]},
        {"name":"B","description":"b","tasks":[{"name":"B1","description":"b1","dependencies":["1.1"]}]}
    ]}"#;
    let generator = ScriptedGenerator::new([Reply::Text(raw.to_owned())]);
    let plan = generate_plan(&generator, "idea").await.unwrap();

    assert_eq!(plan.tasks[1].tasks[0].dependencies, vec!["2.1.1"]);
    let dangling = dangling_dependencies(&plan);
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].task_id, "2.1");
    assert_eq!(dangling[0].dependency, "2.1.1");
}
