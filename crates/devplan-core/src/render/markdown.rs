//! Markdown rendering.
//!
//! Task headings grow one `#` per nesting level with no ceiling, and nested
//! sections are indented two spaces per level. Prompts are written verbatim
//! inside a fence rather than re-parsed.

use crate::plan::{Plan, Task};

/// Render `plan` as a Markdown document.
pub fn render_markdown(plan: &Plan) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str(&format!("# {}\n\n", plan.title));
    out.push_str(&format!("## Project Description\n\n{}\n\n", plan.description));
    out.push_str("## Tasks\n\n");

    for task in &plan.tasks {
        write_task(&mut out, task, 0);
    }

    out
}

fn write_task(out: &mut String, task: &Task, depth: usize) {
    let indent = "  ".repeat(depth);
    let hashes = "#".repeat(depth + 3);

    out.push_str(&format!(
        "{indent}{hashes} Task {}: {}\n\n",
        task.task_id, task.name
    ));
    out.push_str(&format!("{indent}**Description:** {}\n\n", task.description));

    if !task.dependencies.is_empty() {
        out.push_str(&format!(
            "{indent}**Dependencies:** {}\n\n",
            task.dependencies.join(", ")
        ));
    }

    if let Some(prompt) = task.prompt.as_deref().filter(|p| !p.is_empty()) {
        let fence = fence_for(prompt);
        out.push_str(&format!(
            "{indent}**Implementation Prompt:**\n\n{indent}{fence}\n{prompt}\n{indent}{fence}\n\n"
        ));
    }

    for child in &task.tasks {
        write_task(out, child, depth + 1);
    }
}

/// A backtick fence longer than any backtick run inside `text`.
fn fence_for(text: &str) -> String {
    let longest = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}
