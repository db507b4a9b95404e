use crate::error::CoreError;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an identifier string. Surrounding whitespace is ignored;
            /// empty or whitespace-bearing values are rejected.
            pub fn parse(raw: &str) -> Result<Self, CoreError> {
                let raw = raw.trim();
                if raw.is_empty() || raw.chars().any(char::is_whitespace) {
                    return Err(CoreError::InvalidId(raw.to_string()));
                }
                Ok(Self(raw.to_string()))
            }

            /// A fresh UUIDv4 identifier drawn from `rng`.
            pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
                let mut bytes = [0u8; 16];
                rng.fill_bytes(&mut bytes);
                Self(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// First 8 chars, used in log lines.
            pub fn short(&self) -> &str {
                let end = self
                    .0
                    .char_indices()
                    .nth(8)
                    .map(|(i, _)| i)
                    .unwrap_or(self.0.len());
                &self.0[..end]
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.short())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

opaque_id!(
    /// Identifier of a [`TaskList`](crate::model::TaskList).
    ListId
);

opaque_id!(
    /// Identifier of a [`Task`](crate::model::Task).
    TaskId
);
