// SPDX-License-Identifier: MIT

//! Bearer-token authentication middleware.

use crate::services::IdentityError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated user extracted from a verified ID token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
}

/// Middleware that requires a valid bearer ID token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        _ => return Err(StatusCode::UNAUTHORIZED),
    };

    let identity = state
        .identity_verifier
        .verify_id_token(token)
        .await
        .map_err(|e| match e {
            IdentityError::Unauthorized(reason) => {
                tracing::debug!(reason = %reason, "Rejected bearer token");
                StatusCode::UNAUTHORIZED
            }
            IdentityError::Transient(reason) => {
                tracing::error!(reason = %reason, "Identity provider unavailable");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        })?;

    let auth_user = AuthUser { uid: identity.uid };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
