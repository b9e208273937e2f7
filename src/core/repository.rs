use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use crate::core::library::CatalogResult;

/// Lazy sequence of entities produced by a store cursor. Dropping the stream
/// releases the cursor.
pub type EntityStream<Entity> = BoxStream<'static, CatalogResult<Entity>>;

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // stream every entity, fetching only as the consumer pulls
    fn find_all(&self) -> EntityStream<Entity>;

    // get an entity, None when the id is unknown
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Entity>>;

    // insert when the entity has no id yet, otherwise upsert by id
    async fn save(&self, entity: &Entity) -> CatalogResult<Entity>;

    // delete an entity by its identity
    async fn delete(&self, entity: &Entity) -> CatalogResult<()>;
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub(crate) enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    Memory,
}

impl From<String> for RepositoryStore {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "dynamodb" => RepositoryStore::DynamoDB,
            "local" | "localdynamodb" => RepositoryStore::LocalDynamoDB,
            _ => RepositoryStore::Memory,
        }
    }
}
