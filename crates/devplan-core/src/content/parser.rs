//! Prompt-text parser.
//!
//! Fenced code blocks are cut out first, so nothing inside a fence is ever
//! read as list markup. The text between fences goes through a line-based
//! state machine:
//!
//! - `12. text` starts an ordered item, `b. text` a lettered (unordered)
//!   one. Outside a list either marker opens a new list; inside a list it
//!   adds an item to the open list whatever its kind.
//! - Inside a list, blank lines are absorbed and indented lines continue
//!   the current item (canonically two or more spaces deeper than the
//!   marker; shallower indentation is resolved the same way). Their
//!   trimmed text is appended with a single space.
//! - A non-blank line at column zero that is not a marker closes the list.
//! - Outside a list, consecutive non-blank lines form one paragraph and
//!   blank lines separate paragraphs.
//!
//! Every non-blank input line ends up in exactly one node.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(\w*)[ \t]*\n([\s\S]*?)```").expect("valid fence regex"));

static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(\d+)\.\s+(.+)$").expect("valid ordered item regex"));

static LETTERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)([a-zA-Z])\.\s+(.+)$").expect("valid lettered item regex"));

/// One structural unit of prompt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    /// Consecutive prose lines, joined with `\n`.
    Paragraph(String),
    /// A fenced block; `body` is the raw, unescaped code.
    CodeBlock {
        language: Option<String>,
        body: String,
    },
    List {
        kind: ListKind,
        items: Vec<ListItem>,
    },
}

/// Numbered lists are ordered; lettered lists are unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// A list entry. The marker is kept so output can reproduce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// `"3"` or `"b"`, without the trailing dot.
    pub marker: String,
    pub text: String,
}

impl fmt::Display for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.marker, self.text)
    }
}

/// Parse prompt text into content nodes, in source order.
pub fn parse(text: &str) -> Vec<ContentNode> {
    let mut parser = ContentParser::default();
    let mut last = 0;

    for caps in CODE_FENCE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        parser.feed(&text[last..whole.start()]);

        let language = caps
            .get(1)
            .map(|m| m.as_str())
            .filter(|lang| !lang.is_empty())
            .map(str::to_owned);
        let body = caps.get(2).map_or("", |m| m.as_str());
        let body = body.strip_suffix('\n').unwrap_or(body);
        let body = body.strip_suffix('\r').unwrap_or(body);
        parser.code_block(language, body.to_owned());

        last = whole.end();
    }

    parser.feed(&text[last..]);
    parser.finish()
}

/// Classification of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Item {
        kind: ListKind,
        marker: &'a str,
        text: &'a str,
    },
    /// Starts with whitespace and is not a marker; holds the trimmed text.
    Indented(&'a str),
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    for (regex, kind) in [
        (&*ORDERED_ITEM, ListKind::Ordered),
        (&*LETTERED_ITEM, ListKind::Unordered),
    ] {
        if let Some(caps) = regex.captures(line) {
            if let (Some(marker), Some(text)) = (caps.get(2), caps.get(3)) {
                return Line::Item {
                    kind,
                    marker: marker.as_str(),
                    text: text.as_str().trim_end(),
                };
            }
        }
    }
    if line.starts_with(char::is_whitespace) {
        Line::Indented(line.trim())
    } else {
        Line::Text(line.trim_end())
    }
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Default,
    Paragraph(Vec<String>),
    InList {
        kind: ListKind,
        items: Vec<ListItem>,
    },
}

#[derive(Debug, Default)]
struct ContentParser {
    state: State,
    nodes: Vec<ContentNode>,
}

impl ContentParser {
    fn feed(&mut self, text: &str) {
        for line in text.lines() {
            self.step(classify(line));
        }
    }

    /// The transition function.
    fn step(&mut self, line: Line<'_>) {
        self.state = match (std::mem::take(&mut self.state), line) {
            (State::InList { kind, mut items }, Line::Item { marker, text, .. }) => {
                items.push(item(marker, text));
                State::InList { kind, items }
            }
            (state @ State::InList { .. }, Line::Blank) => state,
            (State::InList { kind, mut items }, Line::Indented(text)) => {
                match items.last_mut() {
                    Some(last) => {
                        last.text.push(' ');
                        last.text.push_str(text);
                    }
                    None => items.push(item("", text)),
                }
                State::InList { kind, items }
            }
            (State::InList { kind, items }, Line::Text(text)) => {
                self.nodes.push(ContentNode::List { kind, items });
                State::Paragraph(vec![text.to_owned()])
            }

            (State::Paragraph(lines), Line::Item { kind, marker, text }) => {
                self.nodes.push(paragraph(lines));
                State::InList {
                    kind,
                    items: vec![item(marker, text)],
                }
            }
            (State::Paragraph(lines), Line::Blank) => {
                self.nodes.push(paragraph(lines));
                State::Default
            }
            (State::Paragraph(mut lines), Line::Indented(text) | Line::Text(text)) => {
                lines.push(text.to_owned());
                State::Paragraph(lines)
            }

            (State::Default, Line::Blank) => State::Default,
            (State::Default, Line::Item { kind, marker, text }) => State::InList {
                kind,
                items: vec![item(marker, text)],
            },
            (State::Default, Line::Indented(text) | Line::Text(text)) => {
                State::Paragraph(vec![text.to_owned()])
            }
        };
    }

    /// A code fence closes whatever is open, then becomes its own node.
    fn code_block(&mut self, language: Option<String>, body: String) {
        self.flush();
        self.nodes.push(ContentNode::CodeBlock { language, body });
    }

    fn flush(&mut self) {
        match std::mem::take(&mut self.state) {
            State::Default => {}
            State::Paragraph(lines) => self.nodes.push(paragraph(lines)),
            State::InList { kind, items } => self.nodes.push(ContentNode::List { kind, items }),
        }
    }

    fn finish(mut self) -> Vec<ContentNode> {
        self.flush();
        self.nodes
    }
}

fn item(marker: &str, text: &str) -> ListItem {
    ListItem {
        marker: marker.to_owned(),
        text: text.to_owned(),
    }
}

fn paragraph(lines: Vec<String>) -> ContentNode {
    ContentNode::Paragraph(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(node: &ContentNode) -> Vec<String> {
        match node {
            ContentNode::List { items, .. } => items.iter().map(ToString::to_string).collect(),
            other => panic!("expected a list, got {other:?}"),
        }
    }

    fn para(text: &str) -> ContentNode {
        ContentNode::Paragraph(text.to_owned())
    }

    #[test]
    fn numbered_lines_form_one_ordered_list() {
        let nodes = parse("1. First item\n2. Second item\n");
        assert_eq!(nodes.len(), 1);
        assert!(matches!(
            nodes[0],
            ContentNode::List {
                kind: ListKind::Ordered,
                ..
            }
        ));
        assert_eq!(items(&nodes[0]), vec!["1. First item", "2. Second item"]);
    }

    #[test]
    fn lettered_lines_form_unordered_list() {
        let nodes = parse("a. Alpha\nB. Bravo");
        assert!(matches!(
            nodes[0],
            ContentNode::List {
                kind: ListKind::Unordered,
                ..
            }
        ));
        assert_eq!(items(&nodes[0]), vec!["a. Alpha", "B. Bravo"]);
    }

    #[test]
    fn fenced_code_is_never_split_into_items() {
        let text = "Steps:\n```python\n1. x = 1\n2. y = 2\n```\nDone.";
        assert_eq!(
            parse(text),
            vec![
                para("Steps:"),
                ContentNode::CodeBlock {
                    language: Some("python".to_owned()),
                    body: "1. x = 1\n2. y = 2".to_owned(),
                },
                para("Done."),
            ]
        );
    }

    #[test]
    fn fence_without_language() {
        let nodes = parse("```\nlet x = 1;\n```");
        assert_eq!(
            nodes,
            vec![ContentNode::CodeBlock {
                language: None,
                body: "let x = 1;".to_owned(),
            }]
        );
    }

    #[test]
    fn fence_closes_open_list() {
        let nodes = parse("1. Install\n```sh\ncargo build\n```\n2. Run");
        assert_eq!(nodes.len(), 3);
        assert_eq!(items(&nodes[0]), vec!["1. Install"]);
        assert!(matches!(nodes[1], ContentNode::CodeBlock { .. }));
        assert_eq!(items(&nodes[2]), vec!["2. Run"]);
    }

    #[test]
    fn indented_lines_continue_the_item() {
        let text = "1. First step\n   which wraps here\n\n   and here\n2. Second step";
        let nodes = parse(text);
        assert_eq!(nodes.len(), 1);
        assert_eq!(
            items(&nodes[0]),
            vec!["1. First step which wraps here and here", "2. Second step"]
        );
    }

    #[test]
    fn blank_lines_between_items_keep_one_list() {
        let nodes = parse("1. One\n\n2. Two\n\n\n3. Three");
        assert_eq!(nodes.len(), 1);
        assert_eq!(items(&nodes[0]), vec!["1. One", "2. Two", "3. Three"]);
    }

    #[test]
    fn unindented_text_closes_the_list() {
        let nodes = parse("1. One\n2. Two\nAfterwards, test it.");
        assert_eq!(nodes.len(), 2);
        assert_eq!(items(&nodes[0]), vec!["1. One", "2. Two"]);
        assert_eq!(nodes[1], para("Afterwards, test it."));
    }

    #[test]
    fn nested_markers_join_the_open_list() {
        let nodes = parse("1. Setup\n   a. Install deps\n   b. Configure\n2. Build");
        assert_eq!(nodes.len(), 1);
        assert_eq!(
            items(&nodes[0]),
            vec!["1. Setup", "a. Install deps", "b. Configure", "2. Build"]
        );
    }

    #[test]
    fn paragraphs_are_separated_by_blank_lines() {
        let nodes = parse("Intro line one\nline two\n\nSecond paragraph");
        assert_eq!(
            nodes,
            vec![para("Intro line one\nline two"), para("Second paragraph")]
        );
    }

    #[test]
    fn paragraph_then_list() {
        let nodes = parse("Do the following:\n1. A\n2. B");
        assert_eq!(nodes[0], para("Do the following:"));
        assert_eq!(items(&nodes[1]), vec!["1. A", "2. B"]);
    }

    #[test]
    fn marker_without_text_is_prose() {
        let nodes = parse("1.\nv1.2 released");
        assert_eq!(nodes, vec![para("1.\nv1.2 released")]);
    }

    #[test]
    fn unterminated_fence_is_plain_text() {
        let nodes = parse("```rust\nfn main() {}");
        assert_eq!(nodes, vec![para("```rust\nfn main() {}")]);
    }

    #[test]
    fn crlf_line_endings() {
        let nodes = parse("1. One\r\n2. Two\r\n");
        assert_eq!(items(&nodes[0]), vec!["1. One", "2. Two"]);
    }

    #[test]
    fn empty_text_has_no_nodes() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n  \n").is_empty());
    }

    #[test]
    fn every_non_blank_line_is_kept_once() {
        let text = "Overview of the work.\n\n1. Create the crate\n   with a lib target\n2. Add tests\n\n```toml\n[dependencies]\nserde = \"1\"\n```\n\na. Review\nb. Merge\nThanks.";
        let nodes = parse(text);

        let mut seen = Vec::new();
        for node in &nodes {
            match node {
                ContentNode::Paragraph(p) => seen.extend(p.lines().map(str::to_owned)),
                ContentNode::CodeBlock { body, .. } => seen.extend(body.lines().map(str::to_owned)),
                ContentNode::List { items, .. } => {
                    seen.extend(items.iter().map(ToString::to_string))
                }
            }
        }
        assert_eq!(
            seen,
            vec![
                "Overview of the work.",
                "1. Create the crate with a lib target",
                "2. Add tests",
                "[dependencies]",
                "serde = \"1\"",
                "a. Review",
                "b. Merge",
                "Thanks.",
            ]
        );
    }
}
