use std::cmp;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use futures::{stream, StreamExt};

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::domain::Identifiable;
use crate::core::library::{CatalogError, CatalogResult};
use crate::core::repository::{EntityStream, Repository};
use crate::utils::ddb::{number_attribute, parse_item, parse_number_attribute, parse_string_attribute};

const BOOKS_SEQUENCE: &str = "books";

#[derive(Debug)]
pub struct DDBBookRepository {
    client: Client,
    table_name: String,
    sequence_table: String,
    page_size: usize,
}

impl DDBBookRepository {
    pub(crate) fn new(client: Client, table_name: &str, sequence_table: &str, page_size: usize) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            sequence_table: sequence_table.to_string(),
            page_size: cmp::max(1, cmp::min(page_size, 500)),
        }
    }

    // next_id atomically bumps the books counter. DynamoDB counters only move forward,
    // so a deleted id is never issued again.
    async fn next_id(&self) -> CatalogResult<i64> {
        let table_name: &str = self.sequence_table.as_ref();
        let out = self.client
            .update_item()
            .table_name(table_name)
            .key("name", AttributeValue::S(BOOKS_SEQUENCE.to_string()))
            .update_expression("ADD next_id :incr")
            .expression_attribute_values(":incr", number_attribute(1))
            .return_values(ReturnValue::UpdatedNew)
            .send()
            .await.map_err(CatalogError::from)?;
        out.attributes()
            .and_then(|attrs| parse_number_attribute("next_id", attrs))
            .ok_or_else(|| CatalogError::store_failure(
                format!("sequence {} returned no next_id", BOOKS_SEQUENCE).as_str(), None, false))
    }
}

// ScanCursor pages through the table one Scan call at a time; a page is only requested
// once the previous one has been handed out.
struct ScanCursor {
    client: Client,
    table_name: String,
    page_size: usize,
    buffered: VecDeque<BookEntity>,
    exclusive_start_key: Option<HashMap<String, AttributeValue>>,
    exhausted: bool,
}

impl ScanCursor {
    async fn fetch_page(&mut self) -> CatalogResult<()> {
        let table_name: &str = self.table_name.as_ref();
        let out = self.client
            .scan()
            .table_name(table_name)
            .consistent_read(false)
            .set_exclusive_start_key(self.exclusive_start_key.take())
            .limit(self.page_size as i32)
            .send()
            .await.map_err(CatalogError::from)?;
        if let Some(items) = out.items() {
            let books = items.iter().map(map_to_book).collect::<CatalogResult<Vec<_>>>()?;
            self.buffered.extend(books);
        }
        self.exclusive_start_key = out.last_evaluated_key().cloned();
        self.exhausted = self.exclusive_start_key.is_none();
        Ok(())
    }

    async fn next(mut self) -> CatalogResult<Option<(BookEntity, ScanCursor)>> {
        loop {
            if let Some(book) = self.buffered.pop_front() {
                return Ok(Some((book, self)));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }
}

#[async_trait]
impl Repository<BookEntity> for DDBBookRepository {
    fn find_all(&self) -> EntityStream<BookEntity> {
        let cursor = ScanCursor {
            client: self.client.clone(),
            table_name: self.table_name.to_string(),
            page_size: self.page_size,
            buffered: VecDeque::new(),
            exclusive_start_key: None,
            exhausted: false,
        };
        stream::try_unfold(cursor, ScanCursor::next).boxed()
    }

    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<BookEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let out = self.client
            .get_item()
            .table_name(table_name)
            .key("id", number_attribute(id))
            .consistent_read(true)
            .send()
            .await.map_err(CatalogError::from)?;
        out.item().map(map_to_book).transpose()
    }

    async fn save(&self, entity: &BookEntity) -> CatalogResult<BookEntity> {
        let stored = match entity.id() {
            Some(id) => entity.with_id(id),
            None => entity.with_id(self.next_id().await?),
        };
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(&stored)?;
        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map_err(CatalogError::from)?;
        Ok(stored)
    }

    async fn delete(&self, entity: &BookEntity) -> CatalogResult<()> {
        let id = match entity.id() {
            Some(id) => id,
            None => return Ok(()),
        };
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("id", number_attribute(id))
            .send()
            .await.map(|_| ()).map_err(CatalogError::from)
    }
}

impl BookRepository for DDBBookRepository {}

// items written by save always carry every attribute; anything else is a corrupt row
fn map_to_book(map: &HashMap<String, AttributeValue>) -> CatalogResult<BookEntity> {
    let missing = |name: &str| CatalogError::store_failure(
        format!("book item is missing attribute {}", name).as_str(), Some(name.to_string()), false);
    let id = parse_number_attribute("id", map).ok_or_else(|| missing("id"))?;
    let title = parse_string_attribute("title", map).ok_or_else(|| missing("title"))?;
    let author = parse_string_attribute("author", map).ok_or_else(|| missing("author"))?;
    Ok(BookEntity { id: Some(id), title, author })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use aws_sdk_dynamodb::types::AttributeValue;
    use futures::StreamExt;
    use lazy_static::lazy_static;

    use crate::books::domain::model::BookEntity;
    use crate::books::repository::ddb_book_repository::{DDBBookRepository, map_to_book};
    use crate::core::library::CatalogError;
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::utils::ddb::{build_db_client, create_catalog_tables, delete_table, number_attribute};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(RepositoryStore::LocalDynamoDB).await;
                let _ = delete_table(&client, "test_books").await;
                let _ = delete_table(&client, "test_sequences").await;
                let _ = create_catalog_tables(&client, "test_books", "test_sequences").await;
                client
            });
    }

    async fn books_repo() -> DDBBookRepository {
        DDBBookRepository::new(CLIENT.get().await.clone(), "test_books", "test_sequences", 10)
    }

    #[tokio::test]
    async fn test_should_map_item_to_book() {
        let item = HashMap::from([
            ("id".to_string(), number_attribute(4)),
            ("title".to_string(), AttributeValue::S("Dune".to_string())),
            ("author".to_string(), AttributeValue::S("Herbert".to_string())),
        ]);
        let book = map_to_book(&item).expect("should map book");
        assert_eq!(BookEntity::new("Dune", "Herbert").with_id(4), book);
    }

    #[tokio::test]
    async fn test_should_reject_item_without_id() {
        let item = HashMap::from([
            ("title".to_string(), AttributeValue::S("Dune".to_string())),
            ("author".to_string(), AttributeValue::S("Herbert".to_string())),
        ]);
        let res = map_to_book(&item);
        assert!(matches!(res, Err(CatalogError::StoreFailure { reason_code: Some(ref code), .. }) if code == "id"));

        let item = HashMap::from([("id".to_string(), number_attribute(4))]);
        assert!(matches!(map_to_book(&item), Err(CatalogError::StoreFailure { .. })));
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_create_get_books() {
        let books_repo = books_repo().await;
        let book = books_repo.save(&BookEntity::new("test book", "author")).await.expect("should create book");
        let id = book.id.expect("should assign id");

        let loaded = books_repo.find_by_id(id).await.expect("should query book");
        assert_eq!(Some(book), loaded);
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_create_update_books() {
        let books_repo = books_repo().await;
        let mut book = books_repo.save(&BookEntity::new("test book", "author")).await.expect("should create book");

        book.title = "new title".to_string();
        let updated = books_repo.save(&book).await.expect("should update book");
        assert_eq!(book.id, updated.id);

        let loaded = books_repo.find_by_id(book.id.expect("should assign id")).await
            .expect("should query book").expect("should return book");
        assert_eq!("new title", loaded.title.as_str());
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_create_scan_books() {
        let books_repo = books_repo().await;
        for i in 0..25 {
            let _ = books_repo.save(&BookEntity::new(format!("title_{}", i).as_str(), "author"))
                .await.expect("should create book");
        }
        let books: Vec<BookEntity> = books_repo.find_all()
            .map(|res| res.expect("should scan book"))
            .collect().await;
        assert!(books.len() >= 25);
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_create_delete_books() {
        let books_repo = books_repo().await;
        let book = books_repo.save(&BookEntity::new("test book", "author")).await.expect("should create book");
        let id = book.id.expect("should assign id");

        books_repo.delete(&book).await.expect("should delete book");
        assert_eq!(None, books_repo.find_by_id(id).await.expect("should query book"));

        let next = books_repo.save(&BookEntity::new("next book", "author")).await.expect("should create book");
        assert!(next.id.expect("should assign id") > id);
    }
}
