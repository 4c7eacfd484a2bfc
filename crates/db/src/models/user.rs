//! User entity model and DTOs.

use captionary_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Unique constraint on `users.email`.
pub const UQ_USERS_EMAIL: &str = "uq_users_email";
/// Unique constraint on `users.user_name`.
pub const UQ_USERS_USER_NAME: &str = "uq_users_user_name";

/// Full user row from the `users` table.
///
/// Contains the password hash and email, so it deliberately has no
/// `Serialize` impl. Use [`UserSummary`] for anything leaving the process.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub user_name: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

/// Public author info attached to captions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: DbId,
    pub user_name: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name.clone(),
        }
    }
}

/// DTO for creating a new user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password_hash: String,
}
