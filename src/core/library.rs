use std::fmt;
use std::fmt::{Display, Formatter};

// Lookups, updates and deletes of a missing book are not errors: they resolve to
// `Ok(None)` and the HTTP boundary turns that into a "no content" response.
#[derive(Debug)]
pub enum CatalogError {
    StoreFailure {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    InvalidArgument {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl CatalogError {
    pub fn store_failure(message: &str, reason_code: Option<String>, retryable: bool) -> CatalogError {
        CatalogError::StoreFailure { message: message.to_string(), reason_code, retryable }
    }

    pub fn invalid_argument(message: &str, reason_code: Option<String>) -> CatalogError {
        CatalogError::InvalidArgument { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> CatalogError {
        CatalogError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> CatalogError {
        CatalogError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            CatalogError::StoreFailure { retryable, .. } => { *retryable }
            CatalogError::InvalidArgument { .. } => { false }
            CatalogError::Serialization { .. } => { false }
            CatalogError::Runtime { .. } => { false }
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::runtime(
            format!("io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<String> for CatalogError {
    fn from(err: String) -> Self {
        CatalogError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::StoreFailure { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            CatalogError::InvalidArgument { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            CatalogError::Serialization { message } => {
                write!(f, "{}", message)
            }
            CatalogError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// A specialized Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use crate::core::library::CatalogError;

    #[tokio::test]
    async fn test_should_create_store_failure() {
        assert!(matches!(CatalogError::store_failure("test", None, false), CatalogError::StoreFailure{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_invalid_argument_error() {
        assert!(matches!(CatalogError::invalid_argument("test", None), CatalogError::InvalidArgument{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_serialization_error() {
        assert!(matches!(CatalogError::serialization("test"), CatalogError::Serialization{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_runtime_error() {
        assert!(matches!(CatalogError::runtime("test", None), CatalogError::Runtime{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert!(!CatalogError::store_failure("test", None, false).retryable());
        assert!(CatalogError::store_failure("test", None, true).retryable());
        assert!(!CatalogError::invalid_argument("test", None).retryable());
        assert!(!CatalogError::serialization("test").retryable());
        assert!(!CatalogError::runtime("test", None).retryable());
    }

    #[tokio::test]
    async fn test_should_convert_json_error() {
        let err = serde_json::from_str::<u32>("not a number").expect_err("should fail parsing");
        assert!(matches!(CatalogError::from(err), CatalogError::Serialization{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_format_store_failure() {
        let err = CatalogError::store_failure("disk on fire", Some("500".to_string()), true);
        assert_eq!("disk on fire Some(\"500\") true", err.to_string());
    }
}
