use async_trait::async_trait;
use crate::core::library::CatalogError;

#[derive(Debug)]
pub enum CommandError {
    InvalidArgument {
        message: String,
        reason_code: Option<String>,
    },
    Store {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<CatalogError> for CommandError {
    fn from(other: CatalogError) -> Self {
        match other {
            CatalogError::StoreFailure { message, reason_code, retryable } => {
                CommandError::Store { message, reason_code, retryable }
            }
            CatalogError::InvalidArgument { message, reason_code } => {
                CommandError::InvalidArgument { message, reason_code }
            }
            CatalogError::Serialization { message } => {
                CommandError::Serialization { message }
            }
            CatalogError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code }
            }
        }
    }
}
