//! Timeout enforcement.
//!
//! # Responsibilities
//! - Give each backend call one deadline, fixed when forwarding starts
//! - Apply it to the response headers and to every body frame after them
//! - Cancel the call cleanly when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Before the headers a timeout is a 504; after them the body is cut short

use axum::body::{Body, Bytes};
use axum::BoxError;
use futures_util::{stream, StreamExt};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::http::response::ProxyError;

/// Point in time by which a backend exchange must be finished.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    limit: Duration,
}

impl Deadline {
    /// A deadline `limit` from now.
    pub fn after(limit: Duration) -> Self {
        Self {
            at: Instant::now() + limit,
            limit,
        }
    }

    /// Run `call`, dropping it when the deadline passes.
    ///
    /// Dropping the call closes its connection.
    pub async fn run<F, T, E>(&self, call: F) -> Result<T, ProxyError>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<ProxyError>,
    {
        match tokio::time::timeout_at(self.at, call).await {
            Ok(result) => result.map_err(Into::into),
            Err(_elapsed) => Err(ProxyError::Timeout(self.limit)),
        }
    }

    /// Wrap `body` so it fails with [`ProxyError::Timeout`] once the deadline passes.
    ///
    /// The client sees an aborted body instead of a connection held open.
    pub fn bound_body(self, body: Body) -> Body {
        let chunks = body.into_data_stream();
        let bounded = stream::unfold(Some(chunks), move |state| async move {
            let mut chunks = state?;
            match tokio::time::timeout_at(self.at, chunks.next()).await {
                Ok(Some(Ok(bytes))) => Some((Ok::<Bytes, BoxError>(bytes), Some(chunks))),
                Ok(Some(Err(e))) => Some((Err(e.into()), None)),
                Ok(None) => None,
                Err(_elapsed) => {
                    tracing::warn!(limit = ?self.limit, "Upstream body did not finish before the deadline");
                    Some((Err(ProxyError::Timeout(self.limit).into()), None))
                }
            }
        });
        Body::from_stream(bounded)
    }
}
