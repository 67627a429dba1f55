use axum::{debug_handler, extract::State, http::HeaderMap, response::Response};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::{
    auth::{back, OwnedCampground},
    db::campgrounds,
    flash, AppResult, AppState, SharedImageHost,
};

/// Deletes the campground and its comments, then asks the image host to drop
/// the picture. A failing image delete does not fail the request.
#[debug_handler(state = AppState)]
pub(crate) async fn destroy(
    State(db_pool): State<SqlitePool>,
    State(images): State<SharedImageHost>,
    session: Session,
    headers: HeaderMap,
    OwnedCampground { account, campground }: OwnedCampground,
) -> AppResult<Response> {
    let comments = match campgrounds::delete(&db_pool, campground.id).await {
        Ok(comments) => comments,
        Err(e) => return flash::error(&session, e.to_string(), &back(&headers)).await,
    };

    if let Err(e) = images.destroy(&campground.image_id).await {
        warn!("campground {} deleted but image {} stays: {e}", campground.id, campground.image_id);
    }

    info!("{} deleted campground {} with {comments} comments", account.username, campground.id);
    flash::success(&session, "Campground removed successfully!", "/campgrounds").await
}
