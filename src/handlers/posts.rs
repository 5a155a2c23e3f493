use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    handlers::{AppJson, parse_id, parse_post_id},
    models::post::CreatePostRequest,
    services::posts,
    state::DynStore,
    utils::jwt::CurrentUser,
};

/// Create a new post.
/// Requires: Login. The caller becomes the author.
pub async fn create_post(
    State(store): State<DynStore>,
    Extension(user): Extension<CurrentUser>,
    AppJson(payload): AppJson<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let post = posts::create_post(store.as_ref(), user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// List all posts (Recent first).
pub async fn list_posts(State(store): State<DynStore>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(posts::list_posts(store.as_ref()).await?))
}

/// List posts by one author (Recent first).
/// An id that cannot name a user simply matches nothing.
pub async fn list_user_posts(
    State(store): State<DynStore>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let found = match parse_id(&user_id) {
        Some(user_id) => posts::list_posts_by_author(store.as_ref(), user_id).await?,
        None => Vec::new(),
    };
    Ok(Json(found))
}

/// Get a single post by ID.
pub async fn get_post(
    State(store): State<DynStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_post_id(&id)?;
    Ok(Json(posts::get_post(store.as_ref(), id).await?))
}

/// Delete a post permanently.
/// Requires: Login + Author.
pub async fn delete_post(
    State(store): State<DynStore>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_post_id(&id)?;
    posts::delete_post(store.as_ref(), id, user.id).await?;
    Ok(Json(json!({ "message": "Post removed" })))
}

/// Like a post. Responds with the updated likes.
pub async fn like_post(
    State(store): State<DynStore>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_post_id(&id)?;
    Ok(Json(posts::like_post(store.as_ref(), id, user.id).await?))
}

/// Unlike a post. Responds with the updated likes.
pub async fn unlike_post(
    State(store): State<DynStore>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_post_id(&id)?;
    Ok(Json(posts::unlike_post(store.as_ref(), id, user.id).await?))
}
