use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid identifier: {0:?}")]
    InvalidId(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A precondition that stopped an operation before it changed anything.
///
/// These are ordinary outcomes, not failures: the `Display` text is what the
/// presentation layer shows to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("No active list selected")]
    NoActiveList,

    #[error("No incomplete tasks found in this list")]
    NoAvailableTasks,

    #[error("No tasks to shuffle")]
    NothingToShuffle,

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Task description cannot be empty")]
    EmptyDescription,
}

impl Rejection {
    /// Informational rejections describe an empty result rather than a mistake.
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::NoAvailableTasks | Self::NothingToShuffle)
    }
}
