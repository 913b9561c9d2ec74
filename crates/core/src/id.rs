//! Strongly-typed identifiers used across the catalog.
//!
//! All identifiers are store-assigned positive integers (`BIGSERIAL` in Postgres).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a video.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(i64);

/// Identifier of a comment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(i64);

/// Identifier of a favorite marker.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteId(i64);

macro_rules! impl_serial_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Wrap a raw identifier as returned by the store.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = i64::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                if raw <= 0 {
                    return Err(DomainError::invalid_id(format!(
                        "{}: must be a positive integer",
                        $name
                    )));
                }
                Ok(Self(raw))
            }
        }
    };
}

impl_serial_newtype!(VideoId, "VideoId");
impl_serial_newtype!(CommentId, "CommentId");
impl_serial_newtype!(FavoriteId, "FavoriteId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_integers() {
        let id: VideoId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        for raw in ["0", "-3", "abc", "", "1.5"] {
            let err = raw.parse::<FavoriteId>().unwrap_err();
            assert!(matches!(err, DomainError::InvalidId(_)), "{raw}: {err:?}");
        }
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&CommentId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
