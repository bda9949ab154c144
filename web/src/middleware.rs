//! Correlation ids for ledger requests.
//!
//! Every request gets a [`CorrelationId`], taken from the `X-Correlation-ID`
//! header when it holds a UUID and minted otherwise. The id is stored in the
//! request extensions, where the order command handlers pick it up and attach
//! it to the position the ledger assigned. The request future runs inside an
//! `http_request` span carrying the id, so the ledger's own log lines for the
//! request carry it too. The id is echoed back on the response.
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/orders/:id/pay", post(pay_order))
//!     .layer(axum::middleware::from_fn(correlation_id));
//! ```

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::fmt;
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Identifier tying a ledger command to the request that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CorrelationId(pub Uuid);

impl CorrelationId {
    /// Read the id from request headers, or mint a fresh one.
    ///
    /// Values that are not UUIDs are replaced rather than propagated.
    #[must_use]
    pub fn from_request(request: &Request) -> Self {
        request
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .map_or_else(|| Self(Uuid::new_v4()), Self)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Middleware assigning a [`CorrelationId`] to each request.
pub async fn correlation_id(mut request: Request, next: Next) -> Response {
    let id = CorrelationId::from_request(&request);
    request.extensions_mut().insert(id);

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %id,
        method = %request.method(),
        uri = %request.uri(),
    );
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}
