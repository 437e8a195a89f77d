//! Favorite and rating routes.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use streamcat_common::{ContentId, ViewerId};
use streamcat_db::models::RatingSummary;

use super::caller::{Caller, ViewerKey};
use super::error::AppError;
use super::AppContext;
use crate::catalog::{self, Score};

/// Create favorite and rating routes.
pub fn catalog_routes() -> Router<AppContext> {
    Router::new()
        .route(
            "/content/:id/favorite",
            post(add_favorite).delete(remove_favorite),
        )
        .route("/content/:id/rating", get(get_rating).post(submit_rating))
        .route("/viewers/:viewer_id/favorites", get(list_favorites))
        .route(
            "/viewers/:viewer_id/favorites/:content_id",
            get(get_favorite),
        )
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub content_id: ContentId,
    pub viewer_id: ViewerId,
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub average: f64,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rated_by_caller: Option<bool>,
}

impl From<RatingSummary> for RatingResponse {
    fn from(summary: RatingSummary) -> Self {
        Self {
            average: summary.average,
            count: summary.count,
            rated_by_caller: None,
        }
    }
}

// ============================================================================
// Favorites
// ============================================================================

/// POST /content/:id/favorite
async fn add_favorite(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    caller: Caller,
) -> Result<Response, AppError> {
    let content_id: ContentId = id.parse()?;
    let created = catalog::add_favorite(&ctx.db, &content_id, &caller.viewer_id, caller.role)?;
    if created {
        tracing::debug!(content_id = %content_id, viewer = %caller.viewer_id, "Favorite added");
    }

    let location = favorite_location(&caller.viewer_id, &content_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(FavoriteResponse {
            content_id,
            viewer_id: caller.viewer_id,
        }),
    )
        .into_response())
}

/// Path of the membership probe for a favorite, with each id as one segment.
fn favorite_location(viewer: &ViewerId, content_id: &ContentId) -> String {
    format!(
        "/viewers/{}/favorites/{}",
        urlencoding::encode(viewer.as_str()),
        urlencoding::encode(content_id.as_str())
    )
}

/// DELETE /content/:id/favorite
async fn remove_favorite(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    ViewerKey(viewer): ViewerKey,
) -> Result<StatusCode, AppError> {
    let content_id: ContentId = id.parse()?;
    catalog::remove_favorite(&ctx.db, &content_id, &viewer)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /viewers/:viewer_id/favorites
async fn list_favorites(
    State(ctx): State<AppContext>,
    Path(viewer_id): Path<String>,
) -> Result<Json<Vec<ContentId>>, AppError> {
    let viewer: ViewerId = viewer_id.parse()?;
    Ok(Json(catalog::list_favorite_ids(&ctx.db, &viewer)?))
}

/// GET /viewers/:viewer_id/favorites/:content_id
async fn get_favorite(
    State(ctx): State<AppContext>,
    Path((viewer_id, content_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let viewer: ViewerId = viewer_id.parse()?;
    let content_id: ContentId = content_id.parse()?;
    if catalog::is_favorite(&ctx.db, &content_id, &viewer)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

// ============================================================================
// Ratings
// ============================================================================

/// POST /content/:id/rating
async fn submit_rating(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    ViewerKey(viewer): ViewerKey,
    Json(request): Json<RatingRequest>,
) -> Result<Json<RatingResponse>, AppError> {
    let content_id: ContentId = id.parse()?;
    let score = Score::new(request.score)?;
    let summary = catalog::submit_rating(&ctx.db, &content_id, &viewer, score)?;
    Ok(Json(summary.into()))
}

/// GET /content/:id/rating
async fn get_rating(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    viewer: Option<ViewerKey>,
) -> Result<Json<RatingResponse>, AppError> {
    let content_id: ContentId = id.parse()?;
    let mut response = RatingResponse::from(catalog::rating_summary(&ctx.db, &content_id)?);
    if let Some(ViewerKey(viewer)) = viewer {
        response.rated_by_caller = Some(catalog::has_rated(&ctx.db, &content_id, &viewer)?);
    }
    Ok(Json(response))
}
