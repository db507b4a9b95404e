pub mod clock;
pub mod error;
pub mod geometry;
pub mod id;
pub mod model;
pub mod selection;
pub mod serialize;
pub mod state;
pub mod stats;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, Rejection};
pub use id::{ListId, TaskId};
pub use model::{DeletedTask, ListUpdate, Task, TaskList, TaskStatus, TaskUpdate};
pub use state::{AppState, Orphans};
