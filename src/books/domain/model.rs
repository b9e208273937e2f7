use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;

// BookEntity is the persisted catalog item. The store owns it: the id is assigned on the
// first save and stays fixed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookEntity {
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
}

impl BookEntity {
    pub fn new(title: &str, author: &str) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            author: author.to_string(),
        }
    }

    // with_id returns a copy stamped with the identifier picked by the store
    pub fn with_id(&self, id: i64) -> Self {
        Self {
            id: Some(id),
            title: self.title.to_string(),
            author: self.author.to_string(),
        }
    }
}

impl Identifiable for BookEntity {
    fn id(&self) -> Option<i64> {
        self.id
    }
}
