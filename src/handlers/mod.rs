// src/handlers/mod.rs

pub mod auth;
pub mod posts;
pub mod users;

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::AppError;

/// `Json` body extractor whose rejections go through `AppError`,
/// so bad bodies answer 400 with a `{"message"}` body.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(AppJson(value))
    }
}

/// Path ids are opaque to callers; anything that is not a UUID names nothing.
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

pub(crate) fn parse_post_id(raw: &str) -> Result<Uuid, AppError> {
    parse_id(raw).ok_or_else(|| AppError::NotFound("Post not found".to_string()))
}

pub(crate) fn parse_user_id(raw: &str) -> Result<Uuid, AppError> {
    parse_id(raw).ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
