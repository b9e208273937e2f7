use std::sync::Arc;
use async_trait::async_trait;
use serde::Deserialize;
use crate::catalog::domain::CatalogService;
use crate::catalog::flow::BookStream;
use crate::core::command::{Command, CommandError};

pub(crate) struct ListBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl ListBooksCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

// Without a limit the listing is only paced; with one it is also rate limited.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListBooksCommandRequest {
    pub(crate) limit: Option<i64>,
}

impl ListBooksCommandRequest {
    pub fn new(limit: Option<i64>) -> Self {
        Self {
            limit,
        }
    }
}

pub(crate) struct ListBooksCommandResponse {
    pub books: BookStream,
}

impl ListBooksCommandResponse {
    pub fn new(books: BookStream) -> Self {
        Self {
            books,
        }
    }
}

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        let books = match req.limit {
            Some(limit) => self.catalog_service.list_all_rate_limited(limit).map_err(CommandError::from)?,
            None => self.catalog_service.list_all(),
        };
        Ok(ListBooksCommandResponse::new(books))
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use crate::books::dto::BookDto;
    use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest};
    use crate::catalog::domain::CatalogService;
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    #[tokio::test(start_paused = true)]
    async fn test_should_run_list_books() {
        let svc = factory::create_catalog_service(&Configuration::new("test"), RepositoryStore::Memory).await;
        let _ = svc.add_book(&BookDto::new("A", "X")).await.expect("should add book");
        let _ = svc.add_book(&BookDto::new("B", "Y")).await.expect("should add book");
        let cmd = ListBooksCommand::new(svc);

        for limit in [None, Some(1)] {
            let res = cmd.execute(ListBooksCommandRequest::new(limit)).await.expect("should list books");
            let titles: Vec<String> = res.books.map(|b| b.expect("should list book").title).collect().await;
            assert_eq!(vec!["A", "B"], titles);
        }
    }

    #[tokio::test]
    async fn test_should_reject_zero_limit() {
        let svc = factory::create_catalog_service(&Configuration::new("test"), RepositoryStore::Memory).await;
        let res = ListBooksCommand::new(svc).execute(ListBooksCommandRequest::new(Some(0))).await;
        assert!(matches!(res, Err(CommandError::InvalidArgument { .. })));
    }
}
