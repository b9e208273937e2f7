use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use futures::{future, stream, StreamExt, TryStreamExt};
use crate::books::domain::model::BookEntity;
use crate::books::dto::BookDto;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::catalog::flow::{BookStream, paced, rate_limited, rate_window};
use crate::core::domain::Configuration;
use crate::core::events::{CatalogEvent, CatalogOperation};
use crate::core::library::CatalogResult;
use crate::observe::events::CatalogObserver;

pub(crate) struct CatalogServiceImpl {
    emit_delay: Duration,
    max_rate_window: i64,
    book_repository: Box<dyn BookRepository>,
    observer: Arc<dyn CatalogObserver>,
}

impl CatalogServiceImpl {
    pub(crate) fn new(config: &Configuration, book_repository: Box<dyn BookRepository>,
                      observer: Arc<dyn CatalogObserver>) -> Self {
        Self {
            emit_delay: config.emit_delay(),
            max_rate_window: config.max_rate_window,
            book_repository,
            observer,
        }
    }

    // The Started event is raised on the first pull, so a listing nobody reads stays silent.
    fn paced_books(&self) -> BookStream {
        let observer = self.observer.clone();
        let started = stream::once(async move {
            observer.observe(&CatalogEvent::started(CatalogOperation::FindAll, None));
            None::<CatalogResult<BookDto>>
        }).filter_map(future::ready);
        let books = started
            .chain(self.book_repository.find_all().map_ok(|book| BookDto::from(&book)))
            .boxed();
        let observer = self.observer.clone();
        paced(books, self.emit_delay)
            .inspect(move |res| match res {
                Ok(book) => observer.observe(&CatalogEvent::emitted(book.id, book)),
                Err(err) => observer.observe(&CatalogEvent::failed(CatalogOperation::FindAll, None, err)),
            })
            .boxed()
    }

    async fn lookup(&self, id: i64) -> CatalogResult<Option<BookEntity>> {
        self.observer.observe(&CatalogEvent::started(CatalogOperation::FindById, Some(id)));
        match self.book_repository.find_by_id(id).await {
            Ok(Some(book)) => {
                self.observer.observe(&CatalogEvent::completed(CatalogOperation::FindById, Some(id), &book));
                Ok(Some(book))
            }
            Ok(None) => {
                self.observer.observe(&CatalogEvent::missed(CatalogOperation::FindById, Some(id)));
                Ok(None)
            }
            Err(err) => {
                self.observer.observe(&CatalogEvent::failed(CatalogOperation::FindById, Some(id), &err));
                Err(err)
            }
        }
    }

    async fn store(&self, book: &BookEntity) -> CatalogResult<BookEntity> {
        self.observer.observe(&CatalogEvent::started(CatalogOperation::Save, book.id));
        match self.book_repository.save(book).await {
            Ok(saved) => {
                self.observer.observe(&CatalogEvent::completed(CatalogOperation::Save, saved.id, &saved));
                Ok(saved)
            }
            Err(err) => {
                self.observer.observe(&CatalogEvent::failed(CatalogOperation::Save, book.id, &err));
                Err(err)
            }
        }
    }

    async fn erase(&self, book: &BookEntity) -> CatalogResult<()> {
        self.observer.observe(&CatalogEvent::started(CatalogOperation::Delete, book.id));
        match self.book_repository.delete(book).await {
            Ok(()) => {
                self.observer.observe(&CatalogEvent::completed(CatalogOperation::Delete, book.id, book));
                Ok(())
            }
            Err(err) => {
                self.observer.observe(&CatalogEvent::failed(CatalogOperation::Delete, book.id, &err));
                Err(err)
            }
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    fn list_all(&self) -> BookStream {
        self.paced_books()
    }

    fn list_all_rate_limited(&self, limit: i64) -> CatalogResult<BookStream> {
        let window = rate_window(limit, self.max_rate_window)?;
        Ok(rate_limited(self.paced_books(), window))
    }

    async fn find_book_by_id(&self, id: i64) -> CatalogResult<Option<BookDto>> {
        Ok(self.lookup(id).await?.map(|book| BookDto::from(&book)))
    }

    async fn add_book(&self, book: &BookDto) -> CatalogResult<BookDto> {
        // the store assigns the id of a new book
        let created = self.store(&BookEntity::new(book.title.as_str(), book.author.as_str())).await?;
        Ok(BookDto::from(&created))
    }

    // A missing id is reported as Ok(None), which the HTTP layer answers with "no content"
    // rather than "not found". Nothing is written in that case.
    async fn update_book(&self, id: i64, patch: &BookDto) -> CatalogResult<Option<BookDto>> {
        let mut stored = match self.lookup(id).await? {
            Some(book) => book,
            None => return Ok(None),
        };
        stored.title = patch.title.to_string();
        stored.author = patch.author.to_string();
        let updated = self.store(&stored).await?;
        Ok(Some(BookDto::from(&updated)))
    }

    async fn remove_book(&self, id: i64) -> CatalogResult<Option<BookDto>> {
        let stored = match self.lookup(id).await? {
            Some(book) => book,
            None => return Ok(None),
        };
        self.erase(&stored).await?;
        Ok(Some(BookDto::from(&stored)))
    }
}
