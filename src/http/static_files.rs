//! Static asset serving with single-page-app fallback.
//!
//! Files under the build directory are served as-is with a content type
//! inferred from the extension. Every other path gets the index document with
//! status 200 so client-side routing can take over.

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::StaticFilesConfig;

/// Directory service with the index document as fallback.
pub type SpaService = ServeDir<ServeFile>;

pub fn spa_service(config: &StaticFilesConfig) -> SpaService {
    ServeDir::new(&config.root).fallback(ServeFile::new(config.index_path()))
}

/// Serve `request` from disk.
pub async fn serve(spa: SpaService, request: Request<Body>) -> Response {
    match spa.oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

/// Log problems with the build directory at startup; serving goes ahead regardless.
pub fn check_root(config: &StaticFilesConfig) {
    if !config.root.is_dir() {
        tracing::warn!(root = %config.root.display(), "Static root is not a directory");
    } else if !config.index_path().is_file() {
        tracing::warn!(index = %config.index_path().display(), "SPA index document is missing");
    }
}
