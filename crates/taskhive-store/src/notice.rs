use std::fmt;
use taskhive_core::Rejection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A short user-facing message about the outcome of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<Rejection> for Notice {
    fn from(rejection: Rejection) -> Self {
        if rejection.is_informational() {
            Self::info(rejection.to_string())
        } else {
            Self::error(rejection.to_string())
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_levels() {
        assert_eq!(Notice::from(Rejection::NothingToShuffle).level, NoticeLevel::Info);
        assert_eq!(Notice::from(Rejection::NoActiveList).level, NoticeLevel::Error);
        assert_eq!(
            Notice::from(Rejection::NoActiveList).message,
            "No active list selected"
        );
    }
}
