use crate::id::ListId;
use crate::model::task::Task;
use serde::{Deserialize, Serialize};

/// A removed task held for undo, with the global index it was removed from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTask {
    pub list_id: ListId,
    pub index: usize,
    pub task: Task,
}
