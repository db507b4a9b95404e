pub mod deleted;
pub mod task;
pub mod task_list;

pub use deleted::DeletedTask;
pub use task::{Task, TaskStatus, TaskUpdate};
pub use task_list::{ListUpdate, TaskList};
