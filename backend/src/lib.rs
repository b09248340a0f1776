use axum::{routing::get, Router};
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod store;

use store::PropertyStore;

#[derive(Clone, Default)]
pub struct AppState {
    pub store: Arc<PropertyStore>,
}

impl AppState {
    pub fn new(store: PropertyStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let properties = Router::new()
        .route(
            "/",
            get(handlers::get_properties).post(handlers::create_property),
        )
        .route(
            "/:id",
            get(handlers::get_property)
                .put(handlers::update_property)
                .delete(handlers::delete_property),
        );

    Router::new()
        .route("/", get(|| async { "Hello, Property Listings!" }))
        .route("/health", get(handlers::health))
        .nest("/api/properties", properties)
        .with_state(state)
}
