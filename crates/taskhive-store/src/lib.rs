pub mod config;
pub mod error;
pub mod notice;
pub mod storage;
pub mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use notice::{Notice, NoticeLevel};
pub use storage::{FileStorage, MemoryStorage, SnapshotStorage};
pub use store::{StoreEvent, SubscriptionId, TaskStore};
