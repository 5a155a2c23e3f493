// src/lib.rs

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use std::sync::Arc;

pub use routes::create_router;

use crate::{
    config::Config,
    db::{MemoryStore, PgStore},
    error::AppError,
    state::DynStore,
};

/// Postgres when `DATABASE_URL` is set, otherwise the in-memory store.
pub async fn connect_store(config: &Config) -> Result<DynStore, AppError> {
    match &config.database_url {
        Some(url) => Ok(Arc::new(PgStore::connect(url).await?)),
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
