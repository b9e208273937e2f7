use crate::core::events::CatalogEvent;

// CatalogObserver is the observability hook injected into the catalog service.
// It is called synchronously on the request path, so implementations must not block.
pub(crate) trait CatalogObserver: Sync + Send {
    fn observe(&self, event: &CatalogEvent);
}
