use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

use super::{LikeOutcome, Store};
use crate::{
    error::AppError,
    models::{
        post::{Author, NewPost, Post, PostFilter},
        user::{NewUser, ProfileChanges, User},
    },
};

const MAX_CONNECT_ATTEMPTS: u32 = 5;

const USER_COLUMNS: &str = "id, name, email, password, bio, followers, following, created_at";
const POST_COLUMNS: &str = "id, author_id, content, created_at, likes";

/// Postgres-backed store.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects, retrying while the database comes up, then applies migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let mut attempt = 0;
        let pool = loop {
            match PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(3))
                .connect(database_url)
                .await
            {
                Ok(pool) => break pool,
                Err(e) => {
                    attempt += 1;
                    if attempt >= MAX_CONNECT_ATTEMPTS {
                        return Err(e.into());
                    }
                    tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", attempt);
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        };
        tracing::info!("Database connected...");

        tracing::info!("Running migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied successfully.");

        Ok(Self::new(pool))
    }

    /// Tells `Unchanged` from `Missing` after a conditional update matched no row.
    async fn miss_reason(&self, post_id: Uuid) -> Result<LikeOutcome, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(if exists {
            LikeOutcome::Unchanged
        } else {
            LikeOutcome::Missing
        })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_user.name)
            .bind(&new_user.email)
            .bind(&new_user.password)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let unique = e
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation());
                if unique {
                    AppError::Conflict("User already exists".to_string())
                } else {
                    tracing::error!("Failed to insert user: {:?}", e);
                    AppError::from(e)
                }
            })
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY created_at", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<User>, AppError> {
        let sql = format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name), bio = COALESCE($3, bio)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.name)
            .bind(changes.bio)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_authors(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Author>, AppError> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, name, email FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(authors.into_iter().map(|a| (a.id, a)).collect())
    }

    async fn insert_post(&self, new_post: NewPost) -> Result<Post, AppError> {
        let sql = format!(
            "INSERT INTO posts (id, author_id, content) VALUES ($1, $2, $3) RETURNING {}",
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(Uuid::new_v4())
            .bind(new_post.author_id)
            .bind(&new_post.content)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create post: {:?}", e);
                AppError::from(e)
            })
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        Ok(sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>, AppError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM posts
            WHERE ($1::UUID IS NULL OR author_id = $1)
            ORDER BY created_at DESC
            "#,
            POST_COLUMNS
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(filter.author_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list posts: {:?}", e);
                AppError::from(e)
            })
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeOutcome, AppError> {
        // Membership test and write in a single statement.
        let likes: Option<Vec<Uuid>> = sqlx::query_scalar(
            r#"
            UPDATE posts
            SET likes = array_prepend($2::UUID, likes)
            WHERE id = $1 AND NOT ($2::UUID = ANY(likes))
            RETURNING likes
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match likes {
            Some(likes) => Ok(LikeOutcome::Updated(likes)),
            None => self.miss_reason(post_id).await,
        }
    }

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeOutcome, AppError> {
        let likes: Option<Vec<Uuid>> = sqlx::query_scalar(
            r#"
            UPDATE posts
            SET likes = array_remove(likes, $2::UUID)
            WHERE id = $1 AND $2::UUID = ANY(likes)
            RETURNING likes
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match likes {
            Some(likes) => Ok(LikeOutcome::Updated(likes)),
            None => self.miss_reason(post_id).await,
        }
    }
}
