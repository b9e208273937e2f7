pub mod service;

use async_trait::async_trait;
use crate::books::dto::BookDto;
use crate::catalog::flow::BookStream;
use crate::core::library::CatalogResult;

#[async_trait]
pub(crate) trait CatalogService: Sync + Send {
    // every stored book, one per emit delay
    fn list_all(&self) -> BookStream;

    // list_all with at most `limit` books waiting for the consumer; limit < 1 is rejected
    fn list_all_rate_limited(&self, limit: i64) -> CatalogResult<BookStream>;

    async fn find_book_by_id(&self, id: i64) -> CatalogResult<Option<BookDto>>;

    async fn add_book(&self, book: &BookDto) -> CatalogResult<BookDto>;

    // overwrites title and author only; Ok(None) when no book has this id
    async fn update_book(&self, id: i64, patch: &BookDto) -> CatalogResult<Option<BookDto>>;

    async fn remove_book(&self, id: i64) -> CatalogResult<Option<BookDto>>;
}
