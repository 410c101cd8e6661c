//! Authentication middleware and account endpoints
//!
//! The rest of the application treats identity as an opaque capability:
//! "get the current user or none." Here that capability is a bearer-token
//! lookup against the users table.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::{MeResponse, RegisterRequest, RegisterResponse};
use crate::AppState;

/// Authenticated user info stored in request extensions
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Auth middleware - resolves the current user from the Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?;

    let user = state
        .db
        .get_user_by_token(token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid token".to_string()))?;

    state.db.touch_last_seen(&user.id).await?;

    request.extensions_mut().insert(CurrentUser {
        user_id: user.id,
        name: user.name,
        email: user.email,
    });

    Ok(next.run(request).await)
}

/// POST /api/auth/register
/// Creates a new user and returns its bearer token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Option<RegisterRequest>>,
) -> Result<Json<RegisterResponse>> {
    let (name, email) = payload.map(|p| (p.name, p.email)).unwrap_or((None, None));
    let user = state
        .db
        .create_user(name.as_deref(), email.as_deref())
        .await?;

    tracing::info!("Registered new user: {}", user.id);

    Ok(Json(RegisterResponse {
        user_id: user.id,
        token: user.token,
    }))
}

/// GET /api/auth/me
pub async fn me(Extension(user): Extension<CurrentUser>) -> Result<Json<MeResponse>> {
    Ok(Json(MeResponse {
        user_id: user.user_id,
        name: user.name,
        email: user.email,
    }))
}
