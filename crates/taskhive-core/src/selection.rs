//! Random picking and position-preserving shuffling.
//!
//! Both operate on the global task sequence but only ever look at the
//! available tasks of one list. Every other task keeps its global index.

use crate::error::Rejection;
use crate::id::ListId;
use crate::model::Task;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

/// Global indices of the available tasks in `list_id`, in sequence order.
pub fn available_indices(tasks: &[Task], list_id: &ListId) -> Vec<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.belongs_to(list_id) && t.is_available())
        .map(|(i, _)| i)
        .collect()
}

/// Choose one available task of `list_id` uniformly and mark it picked.
///
/// Returns the global index of the chosen task.
pub fn pick_random<R: Rng + ?Sized>(
    tasks: &mut [Task],
    list_id: &ListId,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<usize, Rejection> {
    let candidates = available_indices(tasks, list_id);
    let &index = candidates
        .choose(rng)
        .ok_or(Rejection::NoAvailableTasks)?;
    tasks[index].picked_at = Some(now);
    Ok(index)
}

/// Permute the available tasks of `list_id` among the slots they occupy.
///
/// Picked and completed tasks, and tasks of other lists, stay where they
/// are. The permutation is a Fisher-Yates pass from the last slot down,
/// so every ordering of the available tasks is equally likely.
/// Returns how many tasks took part.
pub fn shuffle_available<R: Rng + ?Sized>(
    tasks: &mut [Task],
    list_id: &ListId,
    rng: &mut R,
) -> Result<usize, Rejection> {
    let slots = available_indices(tasks, list_id);
    if slots.is_empty() {
        return Err(Rejection::NothingToShuffle);
    }

    let mut pool: Vec<Task> = slots.iter().map(|&i| tasks[i].clone()).collect();
    pool.shuffle(rng);
    for (&slot, task) in slots.iter().zip(pool) {
        tasks[slot] = task;
    }
    Ok(slots.len())
}
