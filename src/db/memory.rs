use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{LikeOutcome, Store};
use crate::{
    error::AppError,
    models::{
        post::{Author, NewPost, Post, PostFilter},
        user::{NewUser, ProfileChanges, User},
    },
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    /// Insertion order.
    posts: Vec<Post>,
}

/// Process-local store, used when no database is configured and in tests.
#[derive(Clone, Default, Debug)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password: new_user.password,
            bio: None,
            followers: Vec::new(),
            following: Vec::new(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(bio) = changes.bio {
            user.bio = Some(bio);
        }
        Ok(Some(user.clone()))
    }

    async fn find_authors(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Author>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .map(|u| {
                let author = Author {
                    id: u.id,
                    name: u.name.clone(),
                    email: u.email.clone(),
                };
                (u.id, author)
            })
            .collect())
    }

    async fn insert_post(&self, new_post: NewPost) -> Result<Post, AppError> {
        let post = Post {
            id: Uuid::new_v4(),
            author_id: new_post.author_id,
            content: new_post.content,
            created_at: Utc::now(),
            likes: Vec::new(),
        };
        self.tables.write().await.posts.push(post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>, AppError> {
        let tables = self.tables.read().await;
        // Reverse insertion order first so equal timestamps still list newest first.
        let mut posts: Vec<Post> = tables
            .posts
            .iter()
            .rev()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        Ok(tables.posts.len() != before)
    }

    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeOutcome, AppError> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.posts.iter_mut().find(|p| p.id == post_id) else {
            return Ok(LikeOutcome::Missing);
        };
        if post.likes.contains(&user_id) {
            return Ok(LikeOutcome::Unchanged);
        }
        post.likes.insert(0, user_id);
        Ok(LikeOutcome::Updated(post.likes.clone()))
    }

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeOutcome, AppError> {
        let mut tables = self.tables.write().await;
        let Some(post) = tables.posts.iter_mut().find(|p| p.id == post_id) else {
            return Ok(LikeOutcome::Missing);
        };
        if !post.likes.contains(&user_id) {
            return Ok(LikeOutcome::Unchanged);
        }
        post.likes.retain(|id| *id != user_id);
        Ok(LikeOutcome::Updated(post.likes.clone()))
    }
}
