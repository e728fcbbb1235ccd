//! Identity middleware.
//!
//! Applied as a route layer on the per-user routes, so the `{user_id}` path
//! parameter is available. Parses it, asks the configured
//! [`IdentityVerifier`](crate::identity::IdentityVerifier) whether the caller
//! may act as that user, and on success inserts the [`UserId`] into request
//! extensions for the handler.

use axum::extract::{Path, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use memoria_core::UserId;

use crate::context::AppContext;
use crate::error::AppError;
use crate::middleware::request_id::RequestId;

pub async fn identity_middleware(
    State(ctx): State<AppContext>,
    Path(raw_user_id): Path<String>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let reject = |e: memoria_core::Error| {
        let err = AppError::new(e);
        match request_id.clone() {
            Some(id) => err.with_request_id(id).into_response(),
            None => err.into_response(),
        }
    };

    let user_id: UserId = raw_user_id.parse().map_err(reject)?;

    if let Err(e) = ctx.identity.verify(&user_id, request.headers()) {
        tracing::warn!(user = %user_id, error = %e, "identity verification failed");
        return Err(reject(e));
    }

    request.extensions_mut().insert(user_id);
    Ok(next.run(request).await)
}
