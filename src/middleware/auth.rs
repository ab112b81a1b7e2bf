// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, models::auth::AccessScope};

/// Validates the bearer token and stashes the derived access scope in the
/// request extensions. The token is re-checked against the staff table, so a
/// deleted account stops working immediately.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let staff = app_state.auth_service.validate_token(token).await?;
            let scope = AccessScope::new(staff.staff_id, &staff.role);

            request.extensions_mut().insert(scope);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Handlers take the scope as an argument, never from ambient state.
impl<S> FromRequestParts<S> for AccessScope
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AccessScope>()
            .copied()
            .ok_or(AppError::InvalidToken)
    }
}
