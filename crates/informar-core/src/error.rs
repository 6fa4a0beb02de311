//! Error types for core storage and cache operations.

use std::fmt;

/// Error type for storage-backed operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Backing storage could not be accessed (poisoned lock, denied access).
    StorageAccess,
    /// A persisted value failed to serialize or deserialize.
    Serialization(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StorageAccess => write!(f, "storage access denied"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(CoreError::StorageAccess.to_string(), "storage access denied");
        let err = CoreError::Serialization("bad json".to_string());
        assert_eq!(err.to_string(), "serialization error: bad json");
    }

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: CoreError = serde_err.into();
        assert!(matches!(err, CoreError::Serialization(_)));
    }
}
