//! Markdown checkbox task extraction and mutation
//!
//! Documents embed tasks as markdown task-list lines (`- [ ] text`). This
//! module extracts them keyed by physical line number and toggles them in
//! place without disturbing the rest of the body. Line indexes are
//! positional, not stable identifiers: an edit that inserts or removes
//! lines above a task invalidates previously derived indexes, and a stale
//! toggle degrades to a no-op rather than mis-targeting another line.

use regex::Regex;

use crate::models::{Todo, TodoId};

/// A checkbox line extracted from document content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLine {
    /// Zero-based physical line number in the content
    pub line_index: usize,
    /// Task text with surrounding whitespace trimmed
    pub text: String,
    pub is_completed: bool,
}

/// A document-embedded task surfaced alongside standalone tasks.
///
/// Derived, never persisted; superseded wholesale on every recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTask {
    pub doc_id: TodoId,
    pub doc_title: String,
    pub line_index: usize,
    pub text: String,
    pub is_completed: bool,
}

fn task_line_regex() -> Regex {
    // leading ws, dash, optional ws, bracket with exactly one marker char
    Regex::new(r"^\s*-\s*\[([ xX])\]").expect("Invalid regex")
}

/// Extract checkbox task lines from document content, in line order.
///
/// A line matches when, after optional leading whitespace, it starts with
/// `-`, optional whitespace, and a `[ ]`/`[x]`/`[X]` marker. Lines whose
/// remaining text trims to empty are excluded; an empty checkbox item is
/// not a task.
#[must_use]
pub fn parse_tasks(content: &str) -> Vec<TaskLine> {
    let re = task_line_regex();

    content
        .split('\n')
        .enumerate()
        .filter_map(|(line_index, line)| {
            let captures = re.captures(line)?;
            let marker = captures.get(1)?;
            let text = line[captures.get(0)?.end()..].trim();
            if text.is_empty() {
                return None;
            }

            Some(TaskLine {
                line_index,
                text: text.to_string(),
                is_completed: marker.as_str().eq_ignore_ascii_case("x"),
            })
        })
        .collect()
}

/// Set the completion marker of the task at `line_index`, in place.
///
/// Returns the input unchanged when the index is out of bounds or the
/// target line is not a task line; everything outside the single marker
/// character is preserved verbatim. Idempotent.
#[must_use]
pub fn set_task_completed(content: &str, line_index: usize, completed: bool) -> String {
    let re = task_line_regex();
    let mut lines: Vec<&str> = content.split('\n').collect();

    let Some(line) = lines.get(line_index) else {
        return content.to_string();
    };
    let Some(marker) = re.captures(line).and_then(|captures| captures.get(1)) else {
        return content.to_string();
    };

    let marker_char = if completed { "x" } else { " " };
    let updated = format!(
        "{}{}{}",
        &line[..marker.start()],
        marker_char,
        &line[marker.end()..]
    );
    lines[line_index] = updated.as_str();
    lines.join("\n")
}

/// Whether the content contains at least one non-empty checkbox task line.
#[must_use]
pub fn has_tasks(content: &str) -> bool {
    !parse_tasks(content).is_empty()
}

/// Recompute the document-task projection over all document rows.
///
/// Full recompute, not an incremental patch: list sizes are a single
/// user's rows, and wholesale replacement keeps the projection trivially
/// consistent with the cache.
#[must_use]
pub fn collect_doc_tasks(todos: &[Todo]) -> Vec<DocTask> {
    todos
        .iter()
        .filter(|todo| todo.is_document && todo.has_notes())
        .flat_map(|todo| {
            let content = todo.content.as_deref().unwrap_or_default();
            parse_tasks(content)
                .into_iter()
                .map(|line| DocTask {
                    doc_id: todo.id,
                    doc_title: todo.title.clone(),
                    line_index: line.line_index,
                    text: line.text,
                    is_completed: line.is_completed,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}
