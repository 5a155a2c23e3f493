// src/db/mod.rs

pub mod memory;
pub mod postgres;

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        post::{Author, NewPost, Post, PostFilter},
        user::{NewUser, ProfileChanges, User},
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result of a conditional update on a post's likes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeOutcome {
    /// The update was applied; carries the new likes, most recent first.
    Updated(Vec<Uuid>),
    /// The post exists but the condition did not hold (already liked / never liked).
    Unchanged,
    /// No post with that id.
    Missing,
}

/// The interface for storing users and posts.
///
/// `add_like` and `remove_like` must be atomic: the membership test and the
/// write happen as one step, so two concurrent likes by the same user can
/// never both succeed.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `AppError::Conflict` if the email is already registered.
    async fn insert_user(&self, new_user: NewUser) -> Result<User, AppError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<User>, AppError>;
    /// Public projection (id, name, email) of every listed user that exists.
    async fn find_authors(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Author>, AppError>;

    async fn insert_post(&self, new_post: NewPost) -> Result<Post, AppError>;
    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, AppError>;
    /// Newest first.
    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>, AppError>;
    /// Returns `false` if nothing was deleted.
    async fn delete_post(&self, id: Uuid) -> Result<bool, AppError>;
    /// Prepends `user_id` unless already present.
    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeOutcome, AppError>;
    /// Removes `user_id` if present.
    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeOutcome, AppError>;
}
