//! Typed HTTP calls against the REST API.

use std::fmt;

use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use url::Url;
use uuid::Uuid;

use crate::models::{
    post::{CreatePostRequest, PostResponse},
    user::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User},
};

#[derive(Debug)]
pub enum ClientError {
    InvalidUrl(url::ParseError),
    /// Network failure or an unreadable success body.
    Transport(reqwest::Error),
    /// Non-2xx answer. `message` is the server's `message` field, if any.
    Rejected { status: u16, message: Option<String> },
    /// The action needs a session token and there is none.
    NotLoggedIn,
}

impl ClientError {
    /// Message to show the user: the server's own message when it sent one.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ClientError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::NotLoggedIn => "Not logged in".to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidUrl(e) => write!(f, "invalid url: {}", e),
            ClientError::Transport(e) => write!(f, "request failed: {}", e),
            ClientError::Rejected { status, message } => match message {
                Some(message) => write!(f, "{} ({})", message, status),
                None => write!(f, "request rejected with status {}", status),
            },
            ClientError::NotLoggedIn => f.write_str("not logged in"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err)
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:5000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let message = response.json::<ErrorBody>().await.ok().map(|b| b.message);
        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        Self::send(self.http.post(self.url("api/auth/register")?).json(request)).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        Self::send(self.http.post(self.url("api/auth/login")?).json(request)).await
    }

    pub async fn me(&self, token: &str) -> Result<User, ClientError> {
        Self::send(self.http.get(self.url("api/auth/me")?).bearer_auth(token)).await
    }

    pub async fn get_posts(&self) -> Result<Vec<PostResponse>, ClientError> {
        Self::send(self.http.get(self.url("api/posts")?)).await
    }

    pub async fn get_user_posts(&self, user_id: Uuid) -> Result<Vec<PostResponse>, ClientError> {
        let url = self.url(&format!("api/posts/user/{}", user_id))?;
        Self::send(self.http.get(url)).await
    }

    pub async fn create_post(&self, token: &str, content: &str) -> Result<PostResponse, ClientError> {
        let body = CreatePostRequest {
            content: content.to_string(),
        };
        let request = self
            .http
            .post(self.url("api/posts")?)
            .bearer_auth(token)
            .json(&body);
        Self::send(request).await
    }

    pub async fn delete_post(&self, token: &str, post_id: Uuid) -> Result<(), ClientError> {
        let url = self.url(&format!("api/posts/{}", post_id))?;
        let _: serde_json::Value = Self::send(self.http.delete(url).bearer_auth(token)).await?;
        Ok(())
    }

    pub async fn like_post(&self, token: &str, post_id: Uuid) -> Result<Vec<Uuid>, ClientError> {
        let url = self.url(&format!("api/posts/like/{}", post_id))?;
        Self::send(self.http.put(url).bearer_auth(token)).await
    }

    pub async fn unlike_post(&self, token: &str, post_id: Uuid) -> Result<Vec<Uuid>, ClientError> {
        let url = self.url(&format!("api/posts/unlike/{}", post_id))?;
        Self::send(self.http.put(url).bearer_auth(token)).await
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, ClientError> {
        let url = self.url(&format!("api/users/{}", user_id))?;
        Self::send(self.http.get(url)).await
    }

    pub async fn update_profile(
        &self,
        token: &str,
        user_id: Uuid,
        changes: &UpdateProfileRequest,
    ) -> Result<User, ClientError> {
        let url = self.url(&format!("api/users/{}", user_id))?;
        Self::send(self.http.put(url).bearer_auth(token).json(changes)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_is_kept_when_joining() {
        let client = ApiClient::new("http://localhost:5000/backend").unwrap();
        assert_eq!(
            client.url("api/posts").unwrap().as_str(),
            "http://localhost:5000/backend/api/posts"
        );

        let client = ApiClient::new("http://localhost:5000").unwrap();
        assert_eq!(
            client.url("api/posts").unwrap().as_str(),
            "http://localhost:5000/api/posts"
        );
    }

    #[test]
    fn server_message_wins_over_fallback() {
        let err = ClientError::Rejected {
            status: 400,
            message: Some("Post already liked".to_string()),
        };
        assert_eq!(err.message_or("Failed to like post"), "Post already liked");

        let err = ClientError::Rejected {
            status: 502,
            message: None,
        };
        assert_eq!(err.message_or("Failed to like post"), "Failed to like post");
    }
}
