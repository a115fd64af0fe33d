//! Dependency graph validation and topological ordering.

use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use thiserror::Error;

use crate::codes::{CodeTable, TaskIndex};
use crate::models::Task;

/// Errors in the task dependency graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A `depends_on_codes` entry names a code not in the task set.
    #[error("Task {task} depends on unknown code {missing}")]
    InvalidReference { task: String, missing: String },
    /// One representative cycle, in dependency order, closed on its first code.
    #[error("Circular dependency detected: {}", .codes.join(" -> "))]
    Cycle { codes: Vec<String> },
    #[error("Duplicate task code: {0}")]
    DuplicateCode(String),
}

/// Validated dependency graph over a task slice.
///
/// Edges are stored by index in both directions. Duplicate entries in a
/// task's `depends_on_codes` collapse to a single edge.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'a> {
    codes: CodeTable<'a>,
    dependencies: Vec<Vec<TaskIndex>>,
    dependents: Vec<Vec<TaskIndex>>,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph, rejecting duplicate codes and unknown references.
    pub fn build(tasks: &'a [Task]) -> Result<Self, GraphError> {
        let codes = CodeTable::from_tasks(tasks)?;
        let mut dependencies: Vec<Vec<TaskIndex>> = Vec::with_capacity(tasks.len());
        let mut dependents: Vec<Vec<TaskIndex>> = vec![Vec::new(); tasks.len()];

        for (index, task) in tasks.iter().enumerate() {
            let mut seen: FxHashSet<TaskIndex> = FxHashSet::default();
            let mut deps = Vec::with_capacity(task.depends_on_codes.len());
            for code in &task.depends_on_codes {
                let dep = codes
                    .get(code)
                    .ok_or_else(|| GraphError::InvalidReference {
                        task: task.code.clone(),
                        missing: code.clone(),
                    })?;
                if seen.insert(dep) {
                    deps.push(dep);
                    dependents[dep].push(index);
                }
            }
            dependencies.push(deps);
        }

        Ok(Self {
            codes,
            dependencies,
            dependents,
        })
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Tasks that must finish before `index` may start.
    pub fn dependencies(&self, index: TaskIndex) -> &[TaskIndex] {
        &self.dependencies[index]
    }

    /// Tasks waiting on `index`.
    pub fn dependents(&self, index: TaskIndex) -> &[TaskIndex] {
        &self.dependents[index]
    }

    pub fn code(&self, index: TaskIndex) -> &'a str {
        self.codes.resolve(index).unwrap_or_default()
    }

    /// Order tasks so every task follows all of its dependencies.
    ///
    /// Kahn's algorithm with a min-heap on input position: whenever several
    /// tasks are ready, the one listed first in the input goes first. The
    /// result is fully determined by the input order.
    pub fn topological_order(&self) -> Result<Vec<TaskIndex>, GraphError> {
        let mut pending: Vec<usize> = self.dependencies.iter().map(Vec::len).collect();
        let mut ready: BinaryHeap<Reverse<TaskIndex>> = pending
            .iter()
            .enumerate()
            .filter(|(_, &count)| count == 0)
            .map(|(index, _)| Reverse(index))
            .collect();

        let mut order: Vec<TaskIndex> = Vec::with_capacity(self.len());
        while let Some(Reverse(index)) = ready.pop() {
            order.push(index);
            for &dependent in &self.dependents[index] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() != self.len() {
            return Err(GraphError::Cycle {
                codes: self.find_cycle(&pending),
            });
        }

        Ok(order)
    }

    /// Extract one cycle among tasks left unordered by Kahn's algorithm.
    ///
    /// Every such task still waits on at least one other unordered task, so
    /// following those edges must revisit a task.
    fn find_cycle(&self, pending: &[usize]) -> Vec<String> {
        let Some(start) = pending.iter().position(|&count| count > 0) else {
            return Vec::new();
        };

        let mut position_on_path: Vec<Option<usize>> = vec![None; self.len()];
        let mut path: Vec<TaskIndex> = Vec::new();
        let mut current = start;

        loop {
            if let Some(pos) = position_on_path[current] {
                let mut codes: Vec<String> = path[pos..]
                    .iter()
                    .map(|&index| self.code(index).to_string())
                    .collect();
                codes.push(self.code(current).to_string());
                return codes;
            }
            position_on_path[current] = Some(path.len());
            path.push(current);

            match self.dependencies[current]
                .iter()
                .copied()
                .find(|&dep| pending[dep] > 0)
            {
                Some(next) => current = next,
                None => {
                    return path
                        .iter()
                        .map(|&index| self.code(index).to_string())
                        .collect()
                }
            }
        }
    }
}
