//! Post lifecycle: create, list, delete by author, like and unlike.

use std::collections::BTreeSet;

use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{LikeOutcome, Store},
    error::AppError,
    models::post::{CreatePostRequest, NewPost, Post, PostFilter, PostResponse},
};

fn post_not_found() -> AppError {
    AppError::NotFound("Post not found".to_string())
}

/// Expands each post's author reference to `{id, name, email}`.
pub async fn populate(store: &dyn Store, posts: Vec<Post>) -> Result<Vec<PostResponse>, AppError> {
    let author_ids: Vec<Uuid> = posts
        .iter()
        .map(|p| p.author_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let authors = store.find_authors(&author_ids).await?;

    Ok(posts
        .into_iter()
        .map(|post| {
            let author = authors.get(&post.author_id).cloned();
            PostResponse::new(post, author)
        })
        .collect())
}

async fn populate_one(store: &dyn Store, post: Post) -> Result<PostResponse, AppError> {
    populate(store, vec![post])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("populate dropped a post".to_string()))
}

/// Creates a post authored by `author_id`. Content is trimmed before validation.
pub async fn create_post(
    store: &dyn Store,
    author_id: Uuid,
    request: CreatePostRequest,
) -> Result<PostResponse, AppError> {
    let request = request.trimmed();
    request.validate()?;

    let post = store
        .insert_post(NewPost {
            author_id,
            content: request.content,
        })
        .await?;
    tracing::info!(post_id = %post.id, author_id = %author_id, "post created");

    populate_one(store, post).await
}

/// All posts, newest first. Unbounded.
pub async fn list_posts(store: &dyn Store) -> Result<Vec<PostResponse>, AppError> {
    let posts = store.list_posts(PostFilter::default()).await?;
    populate(store, posts).await
}

pub async fn list_posts_by_author(
    store: &dyn Store,
    author_id: Uuid,
) -> Result<Vec<PostResponse>, AppError> {
    let posts = store.list_posts(PostFilter::by_author(author_id)).await?;
    populate(store, posts).await
}

pub async fn get_post(store: &dyn Store, post_id: Uuid) -> Result<PostResponse, AppError> {
    let post = store.find_post(post_id).await?.ok_or_else(post_not_found)?;
    populate_one(store, post).await
}

/// Only the author may delete a post.
pub async fn delete_post(store: &dyn Store, post_id: Uuid, caller_id: Uuid) -> Result<(), AppError> {
    let post = store.find_post(post_id).await?.ok_or_else(post_not_found)?;

    if post.author_id != caller_id {
        return Err(AppError::Unauthorized("Not authorized".to_string()));
    }

    if !store.delete_post(post_id).await? {
        return Err(post_not_found());
    }
    tracing::info!(post_id = %post_id, "post deleted");

    Ok(())
}

/// Returns the updated likes, most recent first.
pub async fn like_post(store: &dyn Store, post_id: Uuid, caller_id: Uuid) -> Result<Vec<Uuid>, AppError> {
    match store.add_like(post_id, caller_id).await? {
        LikeOutcome::Updated(likes) => {
            tracing::debug!(post_id = %post_id, user_id = %caller_id, "post liked");
            Ok(likes)
        }
        LikeOutcome::Unchanged => Err(AppError::DuplicateAction("Post already liked".to_string())),
        LikeOutcome::Missing => Err(post_not_found()),
    }
}

pub async fn unlike_post(
    store: &dyn Store,
    post_id: Uuid,
    caller_id: Uuid,
) -> Result<Vec<Uuid>, AppError> {
    match store.remove_like(post_id, caller_id).await? {
        LikeOutcome::Updated(likes) => {
            tracing::debug!(post_id = %post_id, user_id = %caller_id, "post unliked");
            Ok(likes)
        }
        LikeOutcome::Unchanged => Err(AppError::InvalidState(
            "Post has not yet been liked".to_string(),
        )),
        LikeOutcome::Missing => Err(post_not_found()),
    }
}
