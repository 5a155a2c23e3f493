//! Registration, login and profile management.

use uuid::Uuid;
use validator::Validate;

use crate::{
    db::Store,
    error::AppError,
    models::user::{LoginRequest, NewUser, ProfileChanges, RegisterRequest, UpdateProfileRequest, User},
    utils::hash::{hash_password, verify_password},
};

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hashes the password with Argon2 before storing. Emails are unique, case-insensitively.
pub async fn register(store: &dyn Store, request: RegisterRequest) -> Result<User, AppError> {
    let request = RegisterRequest {
        name: request.name.trim().to_string(),
        email: normalize_email(&request.email),
        password: request.password,
    };
    request.validate()?;

    let password = hash_password(&request.password)?;
    let user = store
        .insert_user(NewUser {
            name: request.name,
            email: request.email,
            password,
        })
        .await?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok(user)
}

/// Checks the credentials. Unknown email and wrong password fail identically.
pub async fn authenticate(store: &dyn Store, request: LoginRequest) -> Result<User, AppError> {
    request.validate()?;

    let invalid = || AppError::Authentication("Invalid credentials".to_string());

    let user = store
        .find_user_by_email(&normalize_email(&request.email))
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&request.password, &user.password)? {
        return Err(invalid());
    }

    Ok(user)
}

pub async fn list_users(store: &dyn Store) -> Result<Vec<User>, AppError> {
    store.list_users().await
}

pub async fn get_user(store: &dyn Store, id: Uuid) -> Result<User, AppError> {
    store.find_user(id).await?.ok_or_else(user_not_found)
}

/// Only name and bio can change, and only the user themselves may change them.
pub async fn update_profile(
    store: &dyn Store,
    target_id: Uuid,
    caller_id: Uuid,
    request: UpdateProfileRequest,
) -> Result<User, AppError> {
    if store.find_user(target_id).await?.is_none() {
        return Err(user_not_found());
    }
    if target_id != caller_id {
        return Err(AppError::Unauthorized("Not authorized".to_string()));
    }
    request.validate()?;

    let user = store
        .update_profile(target_id, ProfileChanges::from(request))
        .await?
        .ok_or_else(user_not_found)?;
    tracing::info!(user_id = %user.id, "profile updated");

    Ok(user)
}
