//! User management API handlers
//!
//! Each handler checks a repository out of the provider, runs one query
//! and renders an [`ApiEnvelope`]. Failures are mapped to status codes by
//! the configured [`StatusPolicy`].

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Response,
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{
    DeleteUserRequest, UserDto, UserPayload, UsersPayload, USERS_NOT_FOUND, USER_NOT_FOUND,
};
use crate::auth::AuthClaims;
use crate::domain::{DomainError, RepositoryProvider, UserRepository};
use crate::interfaces::http::common::{ApiEnvelope, ApiError, NoPayload, Payload, StatusPolicy};

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub status_policy: StatusPolicy,
}

impl UserHandlerState {
    pub fn new(repos: Arc<dyn RepositoryProvider>, status_policy: StatusPolicy) -> Self {
        Self {
            repos,
            status_policy,
        }
    }

    async fn open<P: Payload>(&self) -> Result<Box<dyn UserRepository>, Response> {
        self.repos
            .open()
            .await
            .map_err(|e| self.status_policy.reject::<P>(ApiError::Connection(e.to_string())))
    }

    /// A lost connection is always a connection error. Other read failures
    /// are reported as "not found" in legacy mode.
    fn query_failed<P: Payload>(&self, err: DomainError, not_found: &'static str) -> Response {
        let api_err = match err {
            DomainError::Connection(msg) => ApiError::Connection(msg),
            other if self.status_policy.is_strict() => ApiError::Query(other.to_string()),
            other => {
                warn!("Query failed: {}", other);
                ApiError::NotFound(not_found)
            }
        };
        self.status_policy.reject::<P>(api_err)
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "Every user, oldest first", body = UsersPayload),
        (status = 404, description = "No users (or the query failed)", body = UsersPayload),
        (status = 500, description = "Database connection failed")
    )
)]
pub async fn get_users(
    State(state): State<UserHandlerState>,
) -> Result<Json<ApiEnvelope<UsersPayload>>, Response> {
    let repo = state.open::<UsersPayload>().await?;

    let users = match repo.list_users().await {
        Ok(users) if users.is_empty() => {
            return Err(state
                .status_policy
                .reject::<UsersPayload>(ApiError::NotFound(USERS_NOT_FOUND)))
        }
        Ok(users) => users,
        Err(e) => return Err(state.query_failed::<UsersPayload>(e, USERS_NOT_FOUND)),
    };

    info!(count = users.len(), "Listed users");
    let users: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();
    Ok(Json(ApiEnvelope::success(UsersPayload::new(users))))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User details", body = UserPayload),
        (status = 404, description = "Not found", body = UserPayload),
        (status = 500, description = "Malformed id or database connection failed")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiEnvelope<UserPayload>>, Response> {
    let id = Uuid::parse_str(&raw_id).map_err(|e| {
        state
            .status_policy
            .reject::<UserPayload>(ApiError::InvalidInput(e.to_string()))
    })?;

    let repo = state.open::<UserPayload>().await?;

    match repo.get_user(id).await {
        Ok(Some(user)) => Ok(Json(ApiEnvelope::success(UserPayload {
            user: Some(UserDto::from(user)),
        }))),
        Ok(None) => Err(state
            .status_policy
            .reject::<UserPayload>(ApiError::NotFound(USER_NOT_FOUND))),
        Err(e) => Err(state.query_failed::<UserPayload>(e, USER_NOT_FOUND)),
    }
}

/// Admin only. The body is parsed after the connection is acquired so a
/// malformed body and a dead database are reported in that order.
#[utoipa::path(
    delete,
    path = "/api/v1/user",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = DeleteUserRequest,
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Permission denied, malformed body or delete failed")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    claims: AuthClaims,
    body: Bytes,
) -> Result<Json<ApiEnvelope>, Response> {
    let policy = state.status_policy;

    let is_admin = claims
        .is_admin()
        .map_err(|e| policy.reject::<NoPayload>(ApiError::Auth(e)))?;
    if !is_admin {
        return Err(policy.reject::<NoPayload>(ApiError::PermissionDenied));
    }

    let repo = state.open::<NoPayload>().await?;

    let request: DeleteUserRequest = serde_json::from_slice(&body)
        .map_err(|e| policy.reject::<NoPayload>(ApiError::InvalidInput(e.to_string())))?;

    repo.delete_user(request.id)
        .await
        .map_err(|e| policy.reject::<NoPayload>(ApiError::Operation(e.to_string())))?;

    info!(user_id = %request.id, by = claims.subject().unwrap_or("unknown"), "Deleted user");
    Ok(Json(ApiEnvelope::success(NoPayload {})))
}
