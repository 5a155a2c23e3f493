//! Domain operations. Each takes the store as `&dyn Store` and fails with a
//! typed [`AppError`](crate::error::AppError); handlers only translate.

pub mod posts;
pub mod users;
