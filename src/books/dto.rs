use serde::{Deserialize, Serialize};
use crate::books::domain::model::BookEntity;

// BookDto is a data transfer object for Catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BookDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
}

impl BookDto {
    pub fn new(title: &str, author: &str) -> BookDto {
        BookDto {
            id: None,
            title: title.to_string(),
            author: author.to_string(),
        }
    }
}

impl From<&BookEntity> for BookDto {
    fn from(other: &BookEntity) -> Self {
        Self {
            id: other.id,
            title: other.title.to_string(),
            author: other.author.to_string(),
        }
    }
}

impl From<&BookDto> for BookEntity {
    fn from(other: &BookDto) -> Self {
        Self {
            id: other.id,
            title: other.title.to_string(),
            author: other.author.to_string(),
        }
    }
}
