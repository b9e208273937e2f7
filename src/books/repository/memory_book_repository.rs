use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use futures::{stream, StreamExt};
use tokio::sync::RwLock;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::domain::Identifiable;
use crate::core::library::{CatalogError, CatalogResult};
use crate::core::repository::{EntityStream, Repository};

// MemoryBookRepository keeps books ordered by id. Ids come from a monotonic sequence,
// so an id is never handed out twice even after its book is deleted.
#[derive(Debug, Default)]
pub(crate) struct MemoryBookRepository {
    books: Arc<RwLock<BTreeMap<i64, BookEntity>>>,
    last_id: AtomicI64,
}

impl MemoryBookRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.last_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    // Each call opens its own cursor: the last emitted id. Every pull re-reads the map
    // for the next larger key, so nothing is copied ahead of demand.
    fn find_all(&self) -> EntityStream<BookEntity> {
        let books = self.books.clone();
        stream::unfold(0i64, move |last_id| {
            let books = books.clone();
            async move {
                let guard = books.read().await;
                let (id, book) = guard.range((Excluded(last_id), Unbounded)).next()?;
                let item: CatalogResult<BookEntity> = Ok(book.clone());
                Some((item, *id))
            }
        }).boxed()
    }

    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<BookEntity>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: &BookEntity) -> CatalogResult<BookEntity> {
        let id = match entity.id() {
            Some(id) if id <= 0 => {
                return Err(CatalogError::store_failure(
                    format!("book id must be positive but was {}", id).as_str(), None, false));
            }
            Some(id) => {
                self.last_id.fetch_max(id, Ordering::SeqCst);
                id
            }
            None => self.next_id(),
        };
        let stored = entity.with_id(id);
        self.books.write().await.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, entity: &BookEntity) -> CatalogResult<()> {
        if let Some(id) = entity.id() {
            self.books.write().await.remove(&id);
        }
        Ok(())
    }
}

impl BookRepository for MemoryBookRepository {}
