use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::library::CatalogError;
use crate::utils::date::serializer;

// CatalogOperation names the store interaction an event belongs to
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum CatalogOperation {
    FindAll,
    FindById,
    Save,
    Delete,
}

// CatalogEventKind tells where in the operation the event was raised
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum CatalogEventKind {
    Started,
    Completed,
    Missed,
    Failed,
    Emitted,
}

// CatalogEvent is handed to the observability hook before and after every store call
// and for every book emitted by a listing.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CatalogEvent {
    pub event_id: String,
    pub operation: CatalogOperation,
    pub kind: CatalogEventKind,
    pub book_id: Option<i64>,
    pub json_data: Option<String>,
    pub message: Option<String>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
}

impl CatalogEvent {
    pub fn started(operation: CatalogOperation, book_id: Option<i64>) -> Self {
        Self::build(operation, CatalogEventKind::Started, book_id, None, None)
    }

    pub fn completed<T: Serialize>(operation: CatalogOperation, book_id: Option<i64>, data: &T) -> Self {
        let json = serde_json::to_string(data).ok();
        Self::build(operation, CatalogEventKind::Completed, book_id, json, None)
    }

    pub fn missed(operation: CatalogOperation, book_id: Option<i64>) -> Self {
        Self::build(operation, CatalogEventKind::Missed, book_id, None, None)
    }

    pub fn failed(operation: CatalogOperation, book_id: Option<i64>, err: &CatalogError) -> Self {
        Self::build(operation, CatalogEventKind::Failed, book_id, None, Some(err.to_string()))
    }

    pub fn emitted<T: Serialize>(book_id: Option<i64>, data: &T) -> Self {
        let json = serde_json::to_string(data).ok();
        Self::build(CatalogOperation::FindAll, CatalogEventKind::Emitted, book_id, json, None)
    }

    fn build(operation: CatalogOperation, kind: CatalogEventKind, book_id: Option<i64>,
             json_data: Option<String>, message: Option<String>) -> CatalogEvent {
        CatalogEvent {
            event_id: Uuid::new_v4().to_string(),
            operation,
            kind,
            book_id,
            json_data,
            message,
            created_at: Utc::now().naive_utc(),
        }
    }
}
