//! Prompt construction for plan and task-prompt generation.
//!
//! Pure string assembly; the generator call lives in [`super::service`].

use std::collections::HashMap;

use super::model::Task;
use super::schema::plan_schema_pretty;

/// System message sent with every generation request.
pub const SYSTEM_MESSAGE: &str = "You are an expert project planner.";

/// Plan requirements included in the plan-generation prompt.
const PLAN_REQUIREMENTS: &str = r#"Ensure the plan includes:
- A clear project title and detailed description.
- A list of well-defined tasks with names and detailed descriptions.
- A hierarchical structure where each task may contain subtasks, with numbering as follows:
  - Main tasks: 1, 2, 3, etc.
  - Subtasks: 1.1, 1.2, 1.3, etc.
  - Sub-subtasks: 1.1.1, 1.1.2, 1.1.3, etc.
- Dependencies must also follow this numbering format to clearly reference tasks.
- Comprehensive breakdowns to facilitate structured development.

IMPORTANT: Return ONLY the development plan JSON without including the schema in your response.
Do NOT include a "prompt" field for tasks - this will be added separately.
"#;

/// Guidelines for the per-task implementation prompt.
const TASK_PROMPT_GUIDELINES: &str = r#"Please write a detailed, prescriptive prompt that an AI agent could follow to implement this specific task.
The prompt should:
1. Provide clear, step-by-step instructions
2. Include technical details and best practices
3. Mention specific technologies, libraries, or frameworks that would be appropriate
4. Consider the context of the overall project and any dependencies
5. Be actionable and specific enough that an AI could use it to generate code

Return ONLY the implementation prompt text, without any additional explanations or meta-commentary.
"#;

/// Build the prompt asking the generator to expand `idea` into a plan.
pub fn build_plan_prompt(idea: &str) -> String {
    let schema = plan_schema_pretty();
    let mut prompt = String::with_capacity(2048 + schema.len() + idea.len());

    prompt.push_str(
        "You are an advanced AI assistant tasked with expanding a vague idea \
         into a comprehensive development plan.\n\n",
    );
    prompt.push_str(&format!("Given the following high-level idea:\n\"{idea}\"\n\n"));
    prompt.push_str(
        "Please generate a fully fleshed-out structured development plan in JSON format, \
         following this schema:\n",
    );
    prompt.push_str(&schema);
    prompt.push_str("\n\n");
    prompt.push_str(PLAN_REQUIREMENTS);

    prompt
}

/// Build the prompt asking for implementation instructions for one task.
///
/// Dependencies that resolve through `tasks_by_id` are listed with their
/// name and description; the rest are left out.
pub fn build_task_prompt(
    project_title: &str,
    project_description: &str,
    task: &Task,
    tasks_by_id: &HashMap<&str, &Task>,
) -> String {
    let dependencies: Vec<String> = task
        .dependencies
        .iter()
        .filter_map(|dep| tasks_by_id.get(dep.as_str()))
        .map(|dep| format!("{}: {} - {}", dep.task_id, dep.name, dep.description))
        .collect();
    let dependencies_text = if dependencies.is_empty() {
        "None".to_owned()
    } else {
        dependencies.join("\n")
    };

    let mut prompt = String::with_capacity(1024);
    prompt.push_str(
        "You are an expert developer creating detailed implementation instructions \
         for an AI agent.\n\n",
    );
    prompt.push_str(&format!("Project: {project_title}\n"));
    prompt.push_str(&format!("Project Description: {project_description}\n\n"));
    prompt.push_str(&format!("Task ID: {}\n", task.task_id));
    prompt.push_str(&format!("Task Name: {}\n", task.name));
    prompt.push_str(&format!("Task Description: {}\n\n", task.description));
    prompt.push_str(&format!("Dependencies:\n{dependencies_text}\n\n"));
    prompt.push_str(TASK_PROMPT_GUIDELINES);

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::numbering::{index_by_id, renumber};

    fn tasks() -> Vec<Task> {
        let mut b = Task::new("Build API", "Expose endpoints");
        b.dependencies = vec!["1".to_owned(), "9".to_owned()];
        renumber(vec![Task::new("Define models", "Create types"), b], "")
    }

    #[test]
    fn plan_prompt_embeds_idea_and_schema() {
        let prompt = build_plan_prompt("A recipe recommender");
        assert!(prompt.contains("\"A recipe recommender\""));
        assert!(prompt.contains("\"$schema\""));
        assert!(prompt.contains("\"definitions\""));
    }

    #[test]
    fn plan_prompt_describes_numbering() {
        let prompt = build_plan_prompt("x");
        assert!(prompt.contains("Subtasks: 1.1, 1.2, 1.3"));
        assert!(prompt.contains("Return ONLY the development plan JSON"));
        assert!(prompt.contains("Do NOT include a \"prompt\" field"));
    }

    #[test]
    fn task_prompt_lists_resolved_dependencies() {
        let tasks = tasks();
        let index = index_by_id(&tasks);
        let prompt = build_task_prompt("Kitchen", "Cook things", &tasks[1], &index);
        assert!(prompt.contains("Project: Kitchen\n"));
        assert!(prompt.contains("Task ID: 2\n"));
        assert!(prompt.contains("Task Name: Build API\n"));
        assert!(prompt.contains("Dependencies:\n1: Define models - Create types\n\n"));
        assert!(!prompt.contains("9:"), "unknown dependency should be omitted");
    }

    #[test]
    fn task_prompt_without_dependencies_says_none() {
        let tasks = tasks();
        let index = index_by_id(&tasks);
        let prompt = build_task_prompt("Kitchen", "Cook things", &tasks[0], &index);
        assert!(prompt.contains("Dependencies:\nNone\n"));
        assert!(prompt.contains("step-by-step instructions"));
    }
}
