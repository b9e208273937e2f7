use std::sync::Arc;
use crate::books::factory;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::observe::logs::LogObserver;

pub(crate) async fn create_catalog_service(config: &Configuration, store: RepositoryStore) -> Arc<dyn CatalogService> {
    let book_repo = factory::create_book_repository(config, store).await;
    let observer = Arc::new(LogObserver::new(config.stage.as_str()));
    Arc::new(CatalogServiceImpl::new(config, book_repo, observer))
}
