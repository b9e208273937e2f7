use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::StreamExt;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::library::{CatalogError, CatalogResult};
use crate::core::repository::{EntityStream, Repository};

// CountingBookRepository wraps the in-memory store and records how the service drives it:
// books pulled from listing cursors, writes, and whether a cursor is still alive.
// It can also be switched into failing mode.
#[derive(Clone)]
pub(crate) struct CountingBookRepository {
    inner: Arc<MemoryBookRepository>,
    pulled: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    open_cursors: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    fail_after: Option<usize>,
}

impl CountingBookRepository {
    pub(crate) async fn with_books(books: &[(&str, &str)]) -> Self {
        let inner = MemoryBookRepository::new();
        for (title, author) in books {
            let _ = inner.save(&BookEntity::new(title, author)).await.expect("should seed book");
        }
        Self {
            inner: Arc::new(inner),
            pulled: Arc::new(AtomicUsize::new(0)),
            writes: Arc::new(AtomicUsize::new(0)),
            open_cursors: Arc::new(AtomicUsize::new(0)),
            failing: Arc::new(AtomicBool::new(false)),
            fail_after: None,
        }
    }

    // cursor fails after yielding `count` books
    pub(crate) fn fail_listing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    pub(crate) fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub(crate) fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    // number of listing cursors that have not been dropped yet
    pub(crate) fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    fn check(&self) -> CatalogResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CatalogError::store_failure("book store is down", Some("503".to_string()), true))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Repository<BookEntity> for CountingBookRepository {
    fn find_all(&self) -> EntityStream<BookEntity> {
        if let Err(err) = self.check() {
            return futures::stream::once(async move { Err::<BookEntity, CatalogError>(err) }).boxed();
        }
        let pulled = self.pulled.clone();
        let guard = CursorGuard::open(self.open_cursors.clone());
        let fail_after = self.fail_after;
        self.inner.find_all()
            .enumerate()
            .map(move |(i, res)| {
                let _held = &guard;
                pulled.fetch_add(1, Ordering::SeqCst);
                match fail_after {
                    Some(limit) if i >= limit => Err(CatalogError::store_failure("cursor lost", None, false)),
                    _ => res,
                }
            })
            .boxed()
    }

    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<BookEntity>> {
        self.check()?;
        self.inner.find_by_id(id).await
    }

    async fn save(&self, entity: &BookEntity) -> CatalogResult<BookEntity> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.save(entity).await
    }

    async fn delete(&self, entity: &BookEntity) -> CatalogResult<()> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(entity).await
    }
}

impl BookRepository for CountingBookRepository {}

// CursorGuard lives inside a listing stream and counts it as open until the stream is dropped
struct CursorGuard {
    open: Arc<AtomicUsize>,
}

impl CursorGuard {
    fn open(open: Arc<AtomicUsize>) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        Self { open }
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}
