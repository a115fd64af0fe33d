//! Task code table.
//!
//! Maps task codes to dense indices for fast graph lookups. A code's index is
//! its position in the input task list, which is also the tie-break order
//! used by the topological sort.

use rustc_hash::FxHashMap;

use crate::graph::GraphError;
use crate::models::Task;

/// Dense task index (position in the input slice).
pub type TaskIndex = usize;

/// Bidirectional code <-> index mapping borrowed from the task list.
#[derive(Debug, Clone)]
pub struct CodeTable<'a> {
    to_index: FxHashMap<&'a str, TaskIndex>,
    codes: Vec<&'a str>,
}

impl<'a> CodeTable<'a> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            codes: Vec::with_capacity(capacity),
        }
    }

    /// Index every task's code in input order.
    pub fn from_tasks(tasks: &'a [Task]) -> Result<Self, GraphError> {
        let mut table = Self::with_capacity(tasks.len());
        for task in tasks {
            table.insert(&task.code)?;
        }
        Ok(table)
    }

    /// Register a code, assigning it the next index. Codes must be unique.
    pub fn insert(&mut self, code: &'a str) -> Result<TaskIndex, GraphError> {
        if self.to_index.contains_key(code) {
            return Err(GraphError::DuplicateCode(code.to_string()));
        }
        let index = self.codes.len();
        self.codes.push(code);
        self.to_index.insert(code, index);
        Ok(index)
    }

    #[inline]
    pub fn get(&self, code: &str) -> Option<TaskIndex> {
        self.to_index.get(code).copied()
    }

    #[inline]
    pub fn resolve(&self, index: TaskIndex) -> Option<&'a str> {
        self.codes.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
