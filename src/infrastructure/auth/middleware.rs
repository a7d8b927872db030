use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::AppError;

pub const X_USER_ID: &str = "x-user-id";

/// User context injected into request extensions after identification
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

/// Caller identification middleware.
///
/// Authentication happens at the gateway in front of the service; it forwards
/// the verified caller in the `x-user-id` header.
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, AppError> {
    let user_id = request
        .headers()
        .get(X_USER_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing user identity".to_string()))?
        .to_string();

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}
