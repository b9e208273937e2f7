pub mod ddb_book_repository;
pub mod memory_book_repository;
#[cfg(test)]
pub(crate) mod counting_book_repository;

use crate::books::domain::model::BookEntity;
use crate::core::repository::Repository;

// BookRepository is the catalog store collaborator consumed by the catalog service
pub(crate) trait BookRepository: Repository<BookEntity> {}
