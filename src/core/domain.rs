use std::time::Duration;
use serde::{Deserialize, Serialize};

// Identifiable defines common traits that can be shared by persistent objects.
// The identifier is assigned by the store, so it is absent until the first save.
pub trait Identifiable: Sync + Send {
    fn id(&self) -> Option<i64>;
}

const DEFAULT_EMIT_DELAY_MILLIS: u64 = 1000;
const DEFAULT_MAX_RATE_WINDOW: i64 = 10_000;
const DEFAULT_SCAN_PAGE_SIZE: usize = 100;

// Configuration abstracts config options for the catalog service
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub(crate) struct Configuration {
    // deployment stage tagged on every log record
    pub stage: String,
    // pause inserted before each book emitted by the listing streams
    pub emit_delay_millis: u64,
    // cap on books prefetched by a rate limited listing; larger limits share this window
    pub max_rate_window: i64,
    pub books_table: String,
    pub sequence_table: String,
    pub scan_page_size: usize,
}

impl Configuration {
    pub fn new(stage: &str) -> Self {
        Configuration {
            stage: stage.to_string(),
            emit_delay_millis: DEFAULT_EMIT_DELAY_MILLIS,
            max_rate_window: DEFAULT_MAX_RATE_WINDOW,
            books_table: "books".to_string(),
            sequence_table: "sequences".to_string(),
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
        }
    }

    // from_env starts from the defaults and applies any CATALOG_* overrides.
    // Values that do not parse are ignored.
    pub fn from_env(stage: &str) -> Self {
        Self::from_lookup(stage, |key| std::env::var(key).ok())
    }

    fn from_lookup<F>(stage: &str, lookup: F) -> Self
        where F: Fn(&str) -> Option<String> {
        let mut config = Configuration::new(stage);
        if let Some(delay) = lookup("CATALOG_EMIT_DELAY_MS").and_then(|v| v.parse().ok()) {
            config.emit_delay_millis = delay;
        }
        if let Some(window) = lookup("CATALOG_MAX_RATE_WINDOW").and_then(|v| v.parse().ok()) {
            config.max_rate_window = window;
        }
        if let Some(table) = lookup("CATALOG_BOOKS_TABLE").filter(|v| !v.is_empty()) {
            config.books_table = table;
        }
        if let Some(table) = lookup("CATALOG_SEQUENCE_TABLE").filter(|v| !v.is_empty()) {
            config.sequence_table = table;
        }
        if let Some(size) = lookup("CATALOG_SCAN_PAGE_SIZE").and_then(|v| v.parse().ok()) {
            config.scan_page_size = size;
        }
        config
    }

    pub fn with_emit_delay(mut self, delay: Duration) -> Self {
        self.emit_delay_millis = delay.as_millis() as u64;
        self
    }

    pub fn emit_delay(&self) -> Duration {
        Duration::from_millis(self.emit_delay_millis)
    }
}
