//! Single-file HTML rendering with inline styles.
//!
//! Task prompts are parsed into content nodes and emitted as markup. Code
//! block bodies are entity-escaped; titles, names, descriptions and prose
//! are trusted and written as is.

use crate::content::{ContentNode, ListKind, parse};
use crate::plan::{Plan, Task};

const STYLE: &str = r#"body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen,
        Ubuntu, Cantarell, 'Open Sans', 'Helvetica Neue', sans-serif;
    line-height: 1.6;
    color: #333;
    max-width: 1000px;
    margin: 0 auto;
    padding: 20px;
}
h1 {
    font-size: 2.5rem;
    margin-bottom: 1.5rem;
    color: #2563eb;
    padding-bottom: 0.5rem;
    border-bottom: 2px solid #e5e7eb;
}
h2 {
    font-size: 2rem;
    margin: 2rem 0 1rem;
    color: #2563eb;
    padding-bottom: 0.3rem;
    border-bottom: 1px solid #e5e7eb;
}
.task-heading {
    font-size: 1.75rem;
    margin: 2rem 0 1rem;
    color: #1e40af;
}
.task-description {
    margin-bottom: 1rem;
}
.task-dependencies {
    margin-bottom: 1.5rem;
    color: #4b5563;
}
.implementation-prompt {
    background-color: #f3f4f6;
    border-radius: 8px;
    padding: 1.5rem;
    margin: 1.5rem 0;
    border-left: 4px solid #2563eb;
}
.prompt-heading {
    margin-top: 0;
    margin-bottom: 1rem;
    color: #1e40af;
    font-size: 1.25rem;
}
.code-block {
    background-color: #1e293b;
    color: #e2e8f0;
    border-radius: 6px;
    padding: 1rem;
    margin: 1rem 0;
    overflow-x: auto;
}
.code-block pre {
    margin: 0;
    font-family: 'SFMono-Regular', Consolas, 'Liberation Mono', Menlo, monospace;
    font-size: 0.9rem;
    line-height: 1.5;
}
.subtasks {
    margin-left: 2rem;
    border-left: 2px solid #e5e7eb;
    padding-left: 1.5rem;
}
ul, ol {
    margin: 1rem 0 1.5rem 2rem;
}
li {
    margin-bottom: 0.5rem;
}
p {
    margin-bottom: 1rem;
}
"#;

/// Heading tag level for a task at nesting `depth`.
///
/// `h1`/`h2` belong to the document title and section headings; task
/// headings start at `h3` and saturate at `h6`.
pub fn heading_level(depth: usize) -> usize {
    (depth + 3).min(6)
}

/// Render `plan` as a standalone HTML document.
pub fn render_html(plan: &Plan) -> String {
    let mut out = String::with_capacity(8192);

    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\">\n");
    out.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    out.push_str(&format!("<title>{} | Development Plan</title>\n", plan.title));
    out.push_str("<style>\n");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");

    out.push_str(&format!("<h1>{}</h1>\n\n", plan.title));
    out.push_str("<h2>Project Description</h2>\n");
    out.push_str(&format!("<p>{}</p>\n\n", plan.description));
    out.push_str("<h2>Tasks</h2>\n");

    for task in &plan.tasks {
        write_task(&mut out, task, 0);
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn write_task(out: &mut String, task: &Task, depth: usize) {
    let level = heading_level(depth);
    out.push_str(&format!(
        "<h{level} class='task-heading'>Task {}: {}</h{level}>\n\n",
        task.task_id, task.name
    ));
    out.push_str(&format!(
        "<p class='task-description'><strong>Description:</strong> {}</p>\n\n",
        task.description
    ));

    if !task.dependencies.is_empty() {
        out.push_str(&format!(
            "<p class='task-dependencies'><strong>Dependencies:</strong> {}</p>\n\n",
            task.dependencies.join(", ")
        ));
    }

    if let Some(prompt) = task.prompt.as_deref().filter(|p| !p.is_empty()) {
        out.push_str("<div class='implementation-prompt'>\n");
        out.push_str("<h4 class='prompt-heading'>Implementation Prompt</h4>\n");
        out.push_str(&content_to_html(&parse(prompt)));
        out.push_str("</div>\n\n");
    }

    if !task.tasks.is_empty() {
        out.push_str("<div class='subtasks'>\n");
        for child in &task.tasks {
            write_task(out, child, depth + 1);
        }
        out.push_str("</div>\n\n");
    }
}

/// Serialize content nodes to the HTML subset used inside prompt blocks.
pub fn content_to_html(nodes: &[ContentNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            ContentNode::Paragraph(text) => {
                out.push_str(&format!("<p>{text}</p>\n"));
            }
            ContentNode::CodeBlock { language, body } => {
                out.push_str(&format!(
                    "<div class=\"code-block\"><pre><code class=\"language-{}\">{}</code></pre></div>\n",
                    language.as_deref().unwrap_or(""),
                    escape_html(body)
                ));
            }
            ContentNode::List { kind, items } => {
                let tag = match kind {
                    ListKind::Ordered => "ol",
                    ListKind::Unordered => "ul",
                };
                out.push_str(&format!("<{tag}>\n"));
                for item in items {
                    out.push_str(&format!(
                        "<li><strong>{}.</strong> {}</li>\n",
                        item.marker, item.text
                    ));
                }
                out.push_str(&format!("</{tag}>\n"));
            }
        }
    }
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
