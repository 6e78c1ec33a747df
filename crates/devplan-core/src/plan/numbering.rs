//! Hierarchical numbering and tree walks.
//!
//! Ids are derived from tree position on every pass: top-level tasks are
//! `1`, `2`, ...; children of `2` are `2.1`, `2.2`, ... Dependencies that do
//! not already carry the enclosing prefix get it prepended. Whether the
//! rewritten ids exist anywhere in the tree is not checked here; see
//! [`dangling_dependencies`] for a report.

use std::collections::{HashMap, HashSet};

use super::model::{Plan, Task};

impl Plan {
    /// Apply canonical numbering to the whole task tree.
    pub fn renumbered(mut self) -> Self {
        self.tasks = renumber(std::mem::take(&mut self.tasks), "");
        self
    }
}

/// Assign `prefix + index` ids (1-based) to `tasks` and their subtrees.
///
/// `prefix` is empty at the root and ends with `.` below it.
pub fn renumber(tasks: Vec<Task>, prefix: &str) -> Vec<Task> {
    tasks
        .into_iter()
        .enumerate()
        .map(|(i, task)| renumber_task(task, prefix, i + 1))
        .collect()
}

fn renumber_task(mut task: Task, prefix: &str, index: usize) -> Task {
    let task_id = format!("{prefix}{index}");

    task.dependencies = task
        .dependencies
        .into_iter()
        .map(|dep| {
            if dep.starts_with(prefix) {
                dep
            } else {
                format!("{prefix}{dep}")
            }
        })
        .collect();

    let child_prefix = format!("{task_id}.");
    task.tasks = renumber(std::mem::take(&mut task.tasks), &child_prefix);
    task.task_id = task_id;
    task
}

/// All tasks in pre-order (parents before children, siblings in order).
///
/// On a numbered tree this is ascending hierarchical id order.
pub fn flatten(tasks: &[Task]) -> Vec<&Task> {
    let mut out = Vec::new();
    collect(tasks, &mut out);
    out
}

fn collect<'a>(tasks: &'a [Task], out: &mut Vec<&'a Task>) {
    for task in tasks {
        out.push(task);
        collect(&task.tasks, out);
    }
}

/// Total number of tasks in the tree.
pub fn task_count(tasks: &[Task]) -> usize {
    tasks.iter().map(|t| 1 + task_count(&t.tasks)).sum()
}

/// Look up tasks by id. Later duplicates shadow earlier ones.
pub fn index_by_id(tasks: &[Task]) -> HashMap<&str, &Task> {
    flatten(tasks)
        .into_iter()
        .map(|t| (t.task_id.as_str(), t))
        .collect()
}

/// Child-index paths of every task, in pre-order.
pub fn preorder_paths(tasks: &[Task]) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    collect_paths(tasks, &mut path, &mut out);
    out
}

fn collect_paths(tasks: &[Task], path: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    for (i, task) in tasks.iter().enumerate() {
        path.push(i);
        out.push(path.clone());
        collect_paths(&task.tasks, path, out);
        path.pop();
    }
}

/// Resolve a path produced by [`preorder_paths`].
pub fn task_at<'a>(tasks: &'a [Task], path: &[usize]) -> Option<&'a Task> {
    let (first, rest) = path.split_first()?;
    let task = tasks.get(*first)?;
    if rest.is_empty() {
        Some(task)
    } else {
        task_at(&task.tasks, rest)
    }
}

/// Mutable counterpart of [`task_at`].
pub fn task_at_mut<'a>(tasks: &'a mut [Task], path: &[usize]) -> Option<&'a mut Task> {
    let (first, rest) = path.split_first()?;
    let task = tasks.get_mut(*first)?;
    if rest.is_empty() {
        Some(task)
    } else {
        task_at_mut(&mut task.tasks, rest)
    }
}

/// A dependency naming an id that no task in the plan carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingDependency {
    pub task_id: String,
    pub dependency: String,
}

/// Report dependencies that do not resolve to any task id.
///
/// Cross-branch references can end up here after renumbering; they are
/// reported, never rewritten or removed.
pub fn dangling_dependencies(plan: &Plan) -> Vec<DanglingDependency> {
    let all = flatten(&plan.tasks);
    let known: HashSet<&str> = all.iter().map(|t| t.task_id.as_str()).collect();

    all.iter()
        .flat_map(|task| {
            task.dependencies
                .iter()
                .filter(|dep| !known.contains(dep.as_str()))
                .map(|dep| DanglingDependency {
                    task_id: task.task_id.clone(),
                    dependency: dep.clone(),
                })
        })
        .collect()
}
