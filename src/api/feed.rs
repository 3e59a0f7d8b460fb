//! Discovery feed endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::feed::{ActivityDetails, BookRankingDetails, FeedQuery},
};

/// List book rankings
#[utoipa::path(
    get,
    path = "/rankings",
    tag = "feed",
    params(FeedQuery),
    responses(
        (status = 200, description = "Book rankings, highest score first", body = Vec<BookRankingDetails>)
    )
)]
pub async fn list_rankings(
    State(state): State<crate::AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Vec<BookRankingDetails>>> {
    let rankings = state
        .services
        .feed
        .rankings(query.limit.unwrap_or(50), query.offset.unwrap_or(0))
        .await?;
    Ok(Json(rankings))
}

/// List recent user activity
#[utoipa::path(
    get,
    path = "/activities",
    tag = "feed",
    params(FeedQuery),
    responses(
        (status = 200, description = "Recent activity, newest first", body = Vec<ActivityDetails>)
    )
)]
pub async fn list_activities(
    State(state): State<crate::AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<Json<Vec<ActivityDetails>>> {
    let activities = state
        .services
        .feed
        .activities(query.limit.unwrap_or(50), query.offset.unwrap_or(0))
        .await?;
    Ok(Json(activities))
}
