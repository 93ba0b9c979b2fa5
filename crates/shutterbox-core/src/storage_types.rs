use std::fmt::{Display, Formatter, Result as FmtResult};

/// Storage backend types
///
/// Selected by the `STORAGE_BACKEND` configuration key. `Memory` keeps
/// objects in process and is meant for local development and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    S3,
    Memory,
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_deserializes_lowercase() {
        let backend: StorageBackend = serde_json::from_str(r#""memory""#).unwrap();
        assert_eq!(backend, StorageBackend::Memory);
        assert_eq!(backend.to_string(), "memory");
        assert!(serde_json::from_str::<StorageBackend>(r#""nfs""#).is_err());
    }
}
