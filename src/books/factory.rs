use tracing::warn;
use crate::books::repository::BookRepository;
use crate::books::repository::ddb_book_repository::DDBBookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_catalog_tables};

pub(crate) async fn create_book_repository(config: &Configuration, store: RepositoryStore) -> Box<dyn BookRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBBookRepository::new(client, config.books_table.as_str(),
                                            config.sequence_table.as_str(), config.scan_page_size))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            // tables usually exist already after the first run
            if let Err(err) = create_catalog_tables(&client, config.books_table.as_str(),
                                                    config.sequence_table.as_str()).await {
                warn!(error = %err, "could not create catalog tables");
            }
            Box::new(DDBBookRepository::new(client, config.books_table.as_str(),
                                            config.sequence_table.as_str(), config.scan_page_size))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryBookRepository::new())
        }
    }
}
