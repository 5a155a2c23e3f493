use super::Status;
use crate::models::user::{AuthResponse, User};

/// The profile being viewed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSlice {
    pub current_user: Option<User>,
    pub status: Status,
}

impl UserSlice {
    pub fn clear_current_user(&mut self) {
        self.current_user = None;
    }
}

/// The logged-in user and their token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSlice {
    pub user: Option<AuthResponse>,
    pub status: Status,
}

impl SessionSlice {
    pub fn token(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.token.as_str())
    }
}
