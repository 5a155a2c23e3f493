// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    config::Config,
    error::AppError,
    handlers::AppJson,
    models::user::{AuthResponse, LoginRequest, RegisterRequest, User},
    services::users,
    state::DynStore,
    utils::jwt::{CurrentUser, sign_jwt},
};

fn issue_token(user: User, config: &Config) -> Result<AuthResponse, AppError> {
    let token = sign_jwt(user.id, &config.jwt_secret, config.jwt_expiration)?;
    Ok(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        token,
    })
}

/// Registers a new user.
///
/// Returns 201 Created with the user's public fields and a token.
pub async fn register(
    State(store): State<DynStore>,
    State(config): State<Config>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = users::register(store.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(issue_token(user, &config)?)))
}

/// Authenticates a user and returns a JWT token.
pub async fn login(
    State(store): State<DynStore>,
    State(config): State<Config>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = users::authenticate(store.as_ref(), payload).await?;
    Ok(Json(issue_token(user, &config)?))
}

/// The caller's own profile.
pub async fn me(
    State(store): State<DynStore>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(users::get_user(store.as_ref(), caller.id).await?))
}
