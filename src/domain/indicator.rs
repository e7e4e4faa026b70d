use crate::domain::task::TaskId;
use std::collections::HashMap;
use std::str::FromStr;

/// Reserved "before" attribute value meaning "insert at the end of the column"
pub const END_SENTINEL: &str = "-1";

/// What a drop indicator sits in front of: a specific task, or the end of
/// the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeforeMarker {
    Task(TaskId),
    End,
}

impl BeforeMarker {
    /// Wire form used by the indicator tagging protocol
    pub fn to_attr(&self) -> String {
        match self {
            Self::Task(id) => id.to_string(),
            Self::End => END_SENTINEL.to_string(),
        }
    }

    /// Parses the wire form; anything that is neither the sentinel nor a
    /// valid task id is rejected.
    pub fn from_attr(attr: &str) -> crate::error::Result<Self> {
        if attr == END_SENTINEL {
            Ok(Self::End)
        } else {
            TaskId::from_str(attr).map(Self::Task)
        }
    }
}

/// A zero-height insertion anchor between two cards, or at the column end.
/// Client-only; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DropIndicator {
    pub before: BeforeMarker,
    /// Placement-key string of the column this indicator belongs to
    pub column: String,
    /// Vertical layout offset of the indicator
    pub top: f64,
    pub highlighted: bool,
}

impl DropIndicator {
    pub fn before_task(task_id: TaskId, column: impl Into<String>, top: f64) -> Self {
        Self {
            before: BeforeMarker::Task(task_id),
            column: column.into(),
            top,
            highlighted: false,
        }
    }

    pub fn end_of(column: impl Into<String>, top: f64) -> Self {
        Self {
            before: BeforeMarker::End,
            column: column.into(),
            top,
            highlighted: false,
        }
    }
}

/// Explicit registry mapping a column key to its ordered drop indicators.
///
/// Column scoping works by key lookup, not tree traversal: every indicator
/// carries the column key it was registered under, and a lookup returns only
/// that column's indicators. An empty column registers exactly one indicator,
/// the end-of-column sentinel.
#[derive(Debug, Default)]
pub struct IndicatorRegistry {
    columns: HashMap<String, Vec<DropIndicator>>,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the indicator list for a column. The list must end with the
    /// end-of-column sentinel; a column with no tasks registers just that.
    pub fn register_column(&mut self, column: impl Into<String>, indicators: Vec<DropIndicator>) {
        self.columns.insert(column.into(), indicators);
    }

    pub fn indicators_for(&self, column: &str) -> &[DropIndicator] {
        self.columns.get(column).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resets every indicator in the column to invisible
    pub fn clear_highlights(&mut self, column: &str) {
        if let Some(indicators) = self.columns.get_mut(column) {
            for indicator in indicators.iter_mut() {
                indicator.highlighted = false;
            }
        }
    }

    /// Highlights exactly one indicator in the column, clearing the rest
    /// first so at most one is ever active per column.
    pub fn highlight(&mut self, column: &str, index: usize) {
        self.clear_highlights(column);
        if let Some(indicator) = self
            .columns
            .get_mut(column)
            .and_then(|list| list.get_mut(index))
        {
            indicator.highlighted = true;
        }
    }

    /// The currently highlighted indicator in a column, if any
    pub fn highlighted(&self, column: &str) -> Option<&DropIndicator> {
        self.indicators_for(column)
            .iter()
            .find(|indicator| indicator.highlighted)
    }
}
