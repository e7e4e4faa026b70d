use crate::domain::task::{PlacementKey, Task};
use std::cmp::Ordering;

/// Sorts tasks into their display order within a placement key.
///
/// The `order` field drives the sort; ties are broken by creation time and
/// then by id, so the result is always a strict total order even when two
/// tasks carry the same `order` value (nothing at the schema level forbids
/// that for rows written by older clients).
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}

/// Tasks belonging to one placement key, in display order
pub fn tasks_in(tasks: &[Task], placement: &PlacementKey) -> Vec<Task> {
    let mut column: Vec<Task> = tasks
        .iter()
        .filter(|task| &task.placement == placement)
        .cloned()
        .collect();
    sort_tasks(&mut column);
    column
}

fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}
