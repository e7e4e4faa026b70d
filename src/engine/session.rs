use crate::domain::indicator::{BeforeMarker, IndicatorRegistry};
use crate::domain::task::TaskId;
use crate::engine::resolver::nearest_indicator;
use std::collections::HashSet;

/// Ephemeral state for one drag gesture.
///
/// Tracks which columns are currently lit up as drop targets and carries the
/// drag payload (the task id, the only thing the platform transfers). The
/// browser serializes gestures, so one session is live at a time; a session
/// whose payload could not be read turns every subsequent drop into a no-op.
#[derive(Debug, Default)]
pub struct DragSession {
    payload: Option<TaskId>,
    active: HashSet<String>,
}

impl DragSession {
    /// Starts a gesture. `payload` is `None` when the drag payload was
    /// missing or unreadable.
    pub fn begin(payload: Option<TaskId>) -> Self {
        Self {
            payload,
            active: HashSet::new(),
        }
    }

    pub fn payload(&self) -> Option<&TaskId> {
        self.payload.as_ref()
    }

    /// Whether a column is the active drop target
    pub fn is_active(&self, column: &str) -> bool {
        self.active.contains(column)
    }

    /// Marks the column as the active drop target
    pub fn drag_enter(&mut self, column: &str) {
        self.active.insert(column.to_string());
    }

    /// Re-resolves the nearest indicator for the pointer position. Each call
    /// fully resets the column's highlights before lighting the winner, so
    /// highlighting is last-write-wins per event.
    pub fn drag_over(&mut self, column: &str, pointer_y: f64, registry: &mut IndicatorRegistry) {
        self.active.insert(column.to_string());
        registry.clear_highlights(column);
        if let Some(winner) = nearest_indicator(pointer_y, registry.indicators_for(column)) {
            registry.highlight(column, winner);
        }
    }

    /// Pointer left the column: clear the active flag and every highlight
    pub fn drag_leave(&mut self, column: &str, registry: &mut IndicatorRegistry) {
        self.active.remove(column);
        registry.clear_highlights(column);
    }

    /// Finalizes the gesture over a column, yielding the dragged task and
    /// the resolved "insert before" marker. Falls back to end-of-column when
    /// no indicator was highlighted. Returns `None` for a payload-less drag.
    pub fn drop_on(
        &mut self,
        column: &str,
        registry: &mut IndicatorRegistry,
    ) -> Option<(TaskId, BeforeMarker)> {
        let before = registry
            .highlighted(column)
            .map(|indicator| indicator.before.clone())
            .unwrap_or(BeforeMarker::End);

        self.active.remove(column);
        registry.clear_highlights(column);

        self.payload.take().map(|task_id| (task_id, before))
    }

    /// Native dragend without a drop: clear all visual state, no durable
    /// side effects.
    pub fn cancel(&mut self, registry: &mut IndicatorRegistry) {
        for column in self.active.drain() {
            registry.clear_highlights(&column);
        }
        self.payload = None;
    }
}
