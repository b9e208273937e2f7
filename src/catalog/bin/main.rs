include!("../../lib.rs");
use axum::{
    routing::get,
    Router,
};
use lambda_http::{run, Error};
use crate::utils::ddb::setup_tracing;
use crate::catalog::controller::{add_book, find_book_by_id, list_books, remove_book, update_book};
use crate::catalog::factory::create_catalog_service;
use crate::core::controller::AppState;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;

// See https://docs.aws.amazon.com/lambda/latest/dg/lambda-rust.html
// https://docs.aws.amazon.com/lambda/latest/dg/images-test.html
// https://docs.aws.amazon.com/lambda/latest/dg/rust-http-events.html

const DEV_MODE: bool = true;

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_tracing();

    let (config, store) = if DEV_MODE {
        std::env::set_var("AWS_LAMBDA_FUNCTION_NAME", "_");
        std::env::set_var("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "4096");
        std::env::set_var("AWS_LAMBDA_FUNCTION_VERSION", "1");
        std::env::set_var("AWS_LAMBDA_RUNTIME_API", "http://[::]:9000/.rt");
        (Configuration::from_env("dev"), store_from_env(RepositoryStore::LocalDynamoDB))
    } else {
        (Configuration::from_env("prod"), store_from_env(RepositoryStore::DynamoDB))
    };

    let state = AppState::new(create_catalog_service(&config, store).await);

    let app = Router::new()
        .route("/catalog",
               get(list_books).post(add_book))
        .route("/catalog/:id",
               get(find_book_by_id).put(update_book).delete(remove_book))
        .with_state(state);

    run(app).await
}

// CATALOG_STORE picks dynamodb, local or memory
fn store_from_env(default: RepositoryStore) -> RepositoryStore {
    std::env::var("CATALOG_STORE").map(RepositoryStore::from).unwrap_or(default)
}
