//! Client-side cache of server state.
//!
//! [`ClientStore`] is an explicit state container: it owns the API client and
//! every slice, is shared by reference (wrap it in an `Arc` to hand it to
//! several views), and is cleared by [`ClientStore::logout`]. Actions await the
//! network without holding the state lock, so distinct actions can be in flight
//! at the same time; each completion only touches its own collections.

pub mod api;
pub mod posts;
pub mod users;

use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

pub use api::{ApiClient, ClientError};
pub use posts::PostSlice;
pub use users::{SessionSlice, UserSlice};

use crate::models::{
    post::PostResponse,
    user::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User},
};

/// Request bookkeeping shown by views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub is_loading: bool,
    pub is_success: bool,
    pub is_error: bool,
    pub message: String,
}

impl Status {
    fn pending(&mut self) {
        self.is_loading = true;
    }

    fn fulfilled(&mut self) {
        self.is_loading = false;
        self.is_success = true;
    }

    fn rejected(&mut self, message: String) {
        self.is_loading = false;
        self.is_error = true;
        self.message = message;
    }

    pub fn reset(&mut self) {
        *self = Status::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientState {
    pub session: SessionSlice,
    pub posts: PostSlice,
    pub users: UserSlice,
}

#[derive(Debug)]
pub struct ClientStore {
    api: ApiClient,
    state: Mutex<ClientState>,
}

impl ClientStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Mutex::new(ClientState::default()),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> ClientState {
        self.update(|state| state.clone())
    }

    fn update<R>(&self, f: impl FnOnce(&mut ClientState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn token(&self) -> Result<String, ClientError> {
        self.update(|state| state.session.token().map(str::to_string))
            .ok_or(ClientError::NotLoggedIn)
    }

    /// Clears status flags on every slice, keeping cached data.
    pub fn reset_status(&self) {
        self.update(|state| {
            state.session.status.reset();
            state.posts.status.reset();
            state.users.status.reset();
        });
    }

    // Session

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ClientError> {
        self.update(|state| state.session.status.pending());
        let result = self.api.register(&request).await;
        self.apply_session(result, "Registration failed")
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ClientError> {
        self.update(|state| state.session.status.pending());
        let result = self.api.login(&request).await;
        self.apply_session(result, "Login failed")
    }

    fn apply_session(
        &self,
        result: Result<AuthResponse, ClientError>,
        fallback: &str,
    ) -> Result<AuthResponse, ClientError> {
        self.update(|state| match &result {
            Ok(user) => {
                state.session.user = Some(user.clone());
                state.session.status.fulfilled();
            }
            Err(e) => {
                state.session.user = None;
                state.session.status.rejected(e.message_or(fallback));
            }
        });
        result
    }

    /// Refreshes the session user from the server, keeping the token.
    /// A failure only flags the session; the user stays logged in.
    pub async fn fetch_me(&self) -> Result<User, ClientError> {
        let token = self.token()?;
        self.update(|state| state.session.status.pending());
        let result = self.api.me(&token).await;
        self.update(|state| match &result {
            Ok(user) => {
                if let Some(session) = state.session.user.as_mut() {
                    session.id = user.id;
                    session.name = user.name.clone();
                    session.email = user.email.clone();
                }
                state.session.status.fulfilled();
            }
            Err(e) => state
                .session
                .status
                .rejected(e.message_or("Failed to fetch user data")),
        });
        result
    }

    /// Drops the session and every cached slice.
    pub fn logout(&self) {
        self.update(|state| *state = ClientState::default());
        tracing::debug!("client store reset");
    }

    // Posts

    pub async fn fetch_posts(&self) -> Result<(), ClientError> {
        self.update(|state| state.posts.status.pending());
        match self.api.get_posts().await {
            Ok(posts) => {
                self.update(|state| {
                    state.posts.set_posts(posts);
                    state.posts.status.fulfilled();
                });
                Ok(())
            }
            Err(e) => Err(self.posts_rejected(e, "Failed to fetch posts")),
        }
    }

    pub async fn fetch_user_posts(&self, user_id: Uuid) -> Result<(), ClientError> {
        self.update(|state| state.posts.status.pending());
        match self.api.get_user_posts(user_id).await {
            Ok(posts) => {
                self.update(|state| {
                    state.posts.set_user_posts(posts);
                    state.posts.status.fulfilled();
                });
                Ok(())
            }
            Err(e) => Err(self.posts_rejected(e, "Failed to fetch user posts")),
        }
    }

    pub async fn create_post(&self, content: &str) -> Result<PostResponse, ClientError> {
        let token = self.token()?;
        self.update(|state| state.posts.status.pending());
        match self.api.create_post(&token, content).await {
            Ok(post) => {
                self.update(|state| {
                    state.posts.prepend_post(post.clone());
                    state.posts.status.fulfilled();
                });
                Ok(post)
            }
            Err(e) => Err(self.posts_rejected(e, "Failed to create post")),
        }
    }

    pub async fn delete_post(&self, post_id: Uuid) -> Result<(), ClientError> {
        let token = self.token()?;
        self.api.delete_post(&token, post_id).await?;
        self.update(|state| state.posts.remove_post(post_id));
        Ok(())
    }

    pub async fn like_post(&self, post_id: Uuid) -> Result<Vec<Uuid>, ClientError> {
        let token = self.token()?;
        let likes = self.api.like_post(&token, post_id).await?;
        self.update(|state| state.posts.replace_likes(post_id, &likes));
        Ok(likes)
    }

    pub async fn unlike_post(&self, post_id: Uuid) -> Result<Vec<Uuid>, ClientError> {
        let token = self.token()?;
        let likes = self.api.unlike_post(&token, post_id).await?;
        self.update(|state| state.posts.replace_likes(post_id, &likes));
        Ok(likes)
    }

    fn posts_rejected(&self, error: ClientError, fallback: &str) -> ClientError {
        let message = error.message_or(fallback);
        tracing::debug!("post action failed: {}", error);
        self.update(|state| state.posts.status.rejected(message));
        error
    }

    // Users

    pub async fn fetch_user(&self, user_id: Uuid) -> Result<User, ClientError> {
        self.update(|state| state.users.status.pending());
        let result = self.api.get_user(user_id).await;
        self.update(|state| match &result {
            Ok(user) => {
                state.users.current_user = Some(user.clone());
                state.users.status.fulfilled();
            }
            Err(e) => {
                state.users.clear_current_user();
                state.users.status.rejected(e.message_or("Failed to fetch user"));
            }
        });
        result
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        changes: UpdateProfileRequest,
    ) -> Result<User, ClientError> {
        let token = self.token()?;
        self.update(|state| state.users.status.pending());
        let result = self.api.update_profile(&token, user_id, &changes).await;
        self.update(|state| match &result {
            Ok(user) => {
                state.users.current_user = Some(user.clone());
                state.users.status.fulfilled();
            }
            Err(e) => state
                .users
                .status
                .rejected(e.message_or("Failed to update profile")),
        });
        result
    }

    pub fn clear_current_user(&self) {
        self.update(|state| state.users.clear_current_user());
    }
}
