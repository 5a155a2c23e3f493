// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - the user id.
    pub sub: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// The caller identity a valid credential resolves to.
/// Inserted into request extensions by [`auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Signs a new JWT for the user.
pub fn sign_jwt(id: Uuid, secret: &str, expiration_seconds: u64) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: id.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.to_string()))
}

/// Verifies and decodes a JWT string into the user id it was issued for.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Uuid, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Authentication("Not authorized, token failed".to_string()))?;

    token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::Authentication("Not authorized, token failed".to_string()))
}

/// Axum Middleware: Authentication.
///
/// Validates the 'Authorization: Bearer <token>' header and loads the user it
/// names. On success injects [`CurrentUser`] into the request extensions;
/// otherwise the request is answered with 401 before reaching the handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Authentication("Not authorized, no token".to_string()))?;

    let user_id = verify_jwt(token, &state.config.jwt_secret)?;

    let user = state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::Authentication("Not authorized, user not found".to_string()))?;

    req.extensions_mut().insert(CurrentUser {
        id: user.id,
        name: user.name,
        email: user.email,
    });

    Ok(next.run(req).await)
}
