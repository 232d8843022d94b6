//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::User;
use crate::interfaces::http::common::Payload;

pub const USERS_NOT_FOUND: &str = "users were not found";
pub const USER_NOT_FOUND: &str = "user with the given ID is not found";

/// User API representation. The password hash never leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub user_status: i32,
    pub user_role: String,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            created_at: u.created_at,
            updated_at: u.updated_at,
            email: u.email,
            user_status: u.user_status,
            user_role: u.user_role.as_str().to_string(),
        }
    }
}

/// Payload of `GET /api/v1/users`, rendered beside `error` and `msg`
#[derive(Debug, Serialize, ToSchema)]
pub struct UsersPayload {
    pub count: usize,
    pub users: Option<Vec<UserDto>>,
}

impl UsersPayload {
    pub fn new(users: Vec<UserDto>) -> Self {
        Self {
            count: users.len(),
            users: Some(users),
        }
    }
}

impl Payload for UsersPayload {
    fn empty() -> Self {
        Self {
            count: 0,
            users: None,
        }
    }
}

/// Payload of `GET /api/v1/user/{id}`
#[derive(Debug, Serialize, ToSchema)]
pub struct UserPayload {
    pub user: Option<UserDto>,
}

impl Payload for UserPayload {
    fn empty() -> Self {
        Self { user: None }
    }
}

/// Body of `DELETE /api/v1/user`. Any other user fields are ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteUserRequest {
    pub id: Uuid,
}
