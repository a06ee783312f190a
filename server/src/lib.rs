//! HTTP API for the scrapbook service.
//!
//! Every route except `/api/v1/health` requires `Authorization: Bearer <token>`.
//! Errors are returned as `{ "error": <kind>, "message": <text> }` with the
//! status given by [`error::status_for`].

pub mod config;
pub mod error;

mod auth;
mod routes;

use axum::Router;
use axum::routing::{get, post, put};
use scrapbook_auth::IdentityVerifier;
use scrapbook_storage::{
    Database, LayoutSynchronizer, OwnershipResolver, ScrapbookStore, SongCatalog,
};
use std::sync::Arc;

pub use auth::AuthUser;
pub use error::{ApiError, ApiResult, ErrorBody};

/// Shared handles given to every handler.
#[derive(Clone)]
pub struct AppState {
    pub scrapbooks: ScrapbookStore,
    pub layouts: LayoutSynchronizer,
    pub songs: SongCatalog,
    pub ownership: OwnershipResolver,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(db: Database, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self {
            scrapbooks: ScrapbookStore::new(db.clone()),
            layouts: LayoutSynchronizer::new(db.clone()),
            songs: SongCatalog::new(db.clone()),
            ownership: OwnershipResolver::new(db),
            verifier,
        }
    }
}

/// Build the HTTP API router with the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(routes::health))
        .route(
            "/api/v1/scrapbooks",
            get(routes::list_scrapbooks).post(routes::create_scrapbook),
        )
        .route(
            "/api/v1/scrapbooks/{id}",
            get(routes::get_scrapbook)
                .patch(routes::update_scrapbook)
                .delete(routes::delete_scrapbook),
        )
        .route("/api/v1/scrapbooks/{id}/songs", post(routes::add_song))
        .route("/api/v1/scrapbooks/{id}/pages", post(routes::create_page))
        .route("/api/v1/pages/{id}", put(routes::replace_layout))
        .route("/api/v1/pages/{id}/elements", post(routes::add_element))
        .route(
            "/api/v1/songs",
            get(routes::list_songs).post(routes::create_song),
        )
        .fallback(routes::fallback)
        .with_state(state)
}
