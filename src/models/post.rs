use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'posts' table in the database.
/// The author is stored as a reference; see [`PostResponse`] for the expanded form.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Most recent first, never contains the same user twice.
    pub likes: Vec<Uuid>,
}

/// Public projection of a user, used to populate `Post::author_id` on read.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A post as returned by the API, with the author expanded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub content: String,
    /// `None` only if the referenced user no longer exists.
    pub author: Option<Author>,
    pub created_at: DateTime<Utc>,
    pub likes: Vec<Uuid>,
}

impl PostResponse {
    pub fn new(post: Post, author: Option<Author>) -> Self {
        Self {
            id: post.id,
            content: post.content,
            author,
            created_at: post.created_at,
            likes: post.likes,
        }
    }
}

/// Insert payload handed to the store.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub content: String,
}

/// DTO for creating a new post.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Post content must be between 1 and 1000 characters"
    ))]
    pub content: String,
}

impl CreatePostRequest {
    /// Content is stored trimmed, and the length rule applies to the trimmed text.
    pub fn trimmed(self) -> Self {
        Self {
            content: self.content.trim().to_string(),
        }
    }
}

/// Filter for listing posts. Results are always sorted newest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostFilter {
    pub author_id: Option<Uuid>,
}

impl PostFilter {
    pub fn by_author(author_id: Uuid) -> Self {
        Self {
            author_id: Some(author_id),
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.author_id.is_none_or(|id| id == post.author_id)
    }
}
