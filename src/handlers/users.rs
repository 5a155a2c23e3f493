use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    handlers::{AppJson, parse_id, parse_user_id},
    models::user::UpdateProfileRequest,
    services::{posts, users},
    state::DynStore,
    utils::jwt::CurrentUser,
};

/// Lists all users. Passwords are never serialized.
pub async fn list_users(State(store): State<DynStore>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(users::list_users(store.as_ref()).await?))
}

pub async fn get_user(
    State(store): State<DynStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_user_id(&id)?;
    Ok(Json(users::get_user(store.as_ref(), id).await?))
}

/// Update name and bio.
/// Requires: Login + being the target user.
pub async fn update_profile(
    State(store): State<DynStore>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_user_id(&id)?;
    Ok(Json(users::update_profile(store.as_ref(), id, caller.id, payload).await?))
}

/// Same listing as `GET /api/posts/user/{id}`.
pub async fn list_user_posts(
    State(store): State<DynStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let found = match parse_id(&id) {
        Some(id) => posts::list_posts_by_author(store.as_ref(), id).await?,
        None => Vec::new(),
    };
    Ok(Json(found))
}
