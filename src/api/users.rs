//! User listing and social-graph endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::user::{CreateFollow, Follow, UserProfile, UserSummary},
};

use super::AuthenticatedUser;

#[derive(Deserialize, utoipa::IntoParams)]
pub struct UserListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    params(UserListQuery),
    responses(
        (status = 200, description = "Users", body = Vec<UserSummary>)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<Vec<UserSummary>>> {
    let users = state
        .services
        .users
        .list(query.limit.unwrap_or(50), query.offset.unwrap_or(0))
        .await?;
    Ok(Json(users))
}

/// Get a user's public profile
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<UserProfile>> {
    let user = state.services.users.get_by_id(user_id).await?;
    Ok(Json(user))
}

/// Follow another user
#[utoipa::path(
    post,
    path = "/follows",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateFollow,
    responses(
        (status = 201, description = "Follow created", body = Follow),
        (status = 404, description = "User not found"),
        (status = 409, description = "Already following")
    )
)]
pub async fn create_follow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateFollow>,
) -> AppResult<(StatusCode, Json<Follow>)> {
    let follow = state
        .services
        .users
        .follow(claims.user_id, request.following_id)
        .await?;
    Ok((StatusCode::CREATED, Json(follow)))
}

/// List own follows
#[utoipa::path(
    get,
    path = "/follows",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Follows", body = Vec<Follow>)
    )
)]
pub async fn list_follows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Follow>>> {
    let follows = state.services.users.follows_of(claims.user_id).await?;
    Ok(Json(follows))
}

/// Stop following
#[utoipa::path(
    delete,
    path = "/follows/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Follow ID")),
    responses(
        (status = 204, description = "Follow removed"),
        (status = 404, description = "Follow not found")
    )
)]
pub async fn delete_follow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(follow_id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.users.unfollow(follow_id, claims.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
