use crate::domain::board::BoardId;
use crate::domain::sorting::tasks_in;
use crate::domain::task::{PlacementKey, Task, TaskId};

/// Client-side read model for one board's tasks.
///
/// This is the shared mutable state the drag engine works against. Only the
/// reorder coordinator (optimistic patch) and the refetch path write to it.
/// The authoritative order always comes from the store; a refetch replaces
/// the view wholesale.
#[derive(Debug, Clone)]
pub struct BoardView {
    board_id: BoardId,
    tasks: Vec<Task>,
}

impl BoardView {
    pub fn new(board_id: BoardId, tasks: Vec<Task>) -> Self {
        Self { board_id, tasks }
    }

    pub fn board_id(&self) -> BoardId {
        self.board_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks under one placement key, in display order
    pub fn column(&self, placement: &PlacementKey) -> Vec<Task> {
        tasks_in(&self.tasks, placement)
    }

    pub fn column_len(&self, placement: &PlacementKey) -> usize {
        self.tasks
            .iter()
            .filter(|task| &task.placement == placement)
            .count()
    }

    /// Zero-based index of a task within its column's display order
    pub fn index_of(&self, placement: &PlacementKey, task_id: &TaskId) -> Option<usize> {
        self.column(placement)
            .iter()
            .position(|task| &task.id == task_id)
    }

    /// Optimistic local patch: removes the task from wherever it is and
    /// re-splices it into `placement` at `index`, renumbering the
    /// destination column densely to match what the store will commit. The
    /// source column is left with a gap; relative order there is untouched.
    ///
    /// Unknown task ids are ignored; the reconciling refetch sorts it out.
    pub fn apply_local_move(&mut self, task_id: &TaskId, placement: &PlacementKey, index: usize) {
        if !self.tasks.iter().any(|task| &task.id == task_id) {
            return;
        }

        let mut destination: Vec<TaskId> = self
            .column(placement)
            .iter()
            .filter(|task| &task.id != task_id)
            .map(|task| task.id.clone())
            .collect();
        let slot = index.min(destination.len());
        destination.insert(slot, task_id.clone());

        for (new_order, id) in destination.iter().enumerate() {
            if let Some(task) = self.tasks.iter_mut().find(|task| &task.id == id) {
                if &task.id == task_id {
                    task.move_to(placement.clone(), new_order as i64);
                } else {
                    task.order = new_order as i64;
                }
            }
        }
    }

    /// Removes a task locally (burn-barrel optimistic patch)
    pub fn remove_task(&mut self, task_id: &TaskId) {
        self.tasks.retain(|task| &task.id != task_id);
    }

    /// Wholesale reconciliation with the authoritative task list
    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }
}
