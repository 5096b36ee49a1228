//! Pin server: accepts reported photos and their locations and keeps them
//! in a local JSON file plus an image directory.

pub mod config;
pub mod data_url;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes_image;
pub mod routes_locations;
pub mod store;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use config::Config;
pub use error::{ApiError, StoreError};
pub use models::LocationRecord;
pub use store::LocationStore;

/// Shared handler state. Every store access goes through the one mutex.
pub struct AppState {
    pub store: Mutex<LocationStore>,
    pub debug: bool,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: LocationStore, debug: bool) -> Self {
        Self {
            store: Mutex::new(store),
            debug,
            started_at: Utc::now(),
        }
    }
}

/// Per-deployment switches for the router.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub debug: bool,
    pub cors: bool,
    pub max_body_bytes: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            debug: false,
            cors: false,
            max_body_bytes: config::DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Builds the HTTP router over an opened store.
pub fn router(store: LocationStore, options: RouterOptions) -> Router {
    let image_dir = store.image_dir().to_path_buf();
    let state = Arc::new(AppState::new(store, options.debug));

    let mut app = Router::new()
        .route("/input_image", post(routes_image::input_image))
        .route("/input_adress", post(routes_locations::input_address))
        .route("/locations", get(routes_locations::list_locations))
        .route("/health", get(routes_locations::health))
        .nest_service("/images", ServeDir::new(image_dir))
        .with_state(state)
        .layer(DefaultBodyLimit::max(options.max_body_bytes))
        .layer(TraceLayer::new_for_http());

    if options.cors {
        app = app.layer(CorsLayer::permissive());
    }

    app
}
