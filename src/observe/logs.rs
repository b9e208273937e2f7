use tracing::{info, warn};
use crate::core::events::{CatalogEvent, CatalogEventKind};
use crate::observe::events::CatalogObserver;

// LogObserver writes every catalog event as one structured tracing record
#[derive(Debug)]
pub(crate) struct LogObserver {
    stage: String,
}

impl LogObserver {
    pub(crate) fn new(stage: &str) -> Self {
        Self {
            stage: stage.to_string(),
        }
    }
}

impl CatalogObserver for LogObserver {
    fn observe(&self, event: &CatalogEvent) {
        match event.kind {
            CatalogEventKind::Failed => {
                warn!(stage = %self.stage,
                    event_id = %event.event_id,
                    operation = ?event.operation,
                    book_id = ?event.book_id,
                    reason = event.message.as_deref().unwrap_or_default(),
                    "catalog store call failed");
            }
            _ => {
                info!(stage = %self.stage,
                    event_id = %event.event_id,
                    operation = ?event.operation,
                    kind = ?event.kind,
                    book_id = ?event.book_id,
                    data = event.json_data.as_deref().unwrap_or_default(),
                    "catalog event");
            }
        }
    }
}
