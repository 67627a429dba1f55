use axum::{
    debug_handler,
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::info;

use crate::{
    auth::{back, parse_id, LoggedIn, CAMPGROUND_NOT_FOUND},
    db::{campgrounds, comments, Campground, NewComment},
    flash, include_res,
    res::{self, escape},
    AppResult, AppState,
};

pub(crate) const TEXT_REQUIRED: &str = "A comment cannot be empty";

#[derive(Deserialize)]
pub(crate) struct CommentForm {
    pub(crate) text: String,
}

async fn campground(db_pool: &SqlitePool, id: &str) -> Option<Campground> {
    campgrounds::find(db_pool, parse_id(id)?).await.ok().flatten()
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_page(
    State(db_pool): State<SqlitePool>,
    session: Session,
    LoggedIn(account): LoggedIn,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let Some(campground) = campground(&db_pool, &id).await else {
        return flash::error(&session, CAMPGROUND_NOT_FOUND, "/campgrounds").await;
    };

    let content = include_res!(str, "/pages/comments/new.html")
        .replace("{campground_id}", &campground.id.to_string())
        .replace("{campground_name}", &escape(&campground.name));

    Ok(res::page(&session, Some(&account), "New Comment", &content).await?.into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn create(
    State(db_pool): State<SqlitePool>,
    session: Session,
    headers: HeaderMap,
    LoggedIn(account): LoggedIn,
    Path(id): Path<String>,
    Form(CommentForm { text }): Form<CommentForm>,
) -> AppResult<Response> {
    let Some(campground) = campground(&db_pool, &id).await else {
        return flash::error(&session, CAMPGROUND_NOT_FOUND, "/campgrounds").await;
    };
    if text.trim().is_empty() {
        return flash::error(&session, TEXT_REQUIRED, &back(&headers)).await;
    }

    let show = format!("/campgrounds/{}", campground.id);
    match comments::create(&db_pool, campground.id, &account, NewComment { text: &text }).await {
        Ok(comment) => {
            info!("{} commented {} on campground {}", account.username, comment.id, campground.id);
            flash::success(&session, "Successfully added comment", &show).await
        }
        Err(e) => flash::error(&session, e.to_string(), &show).await,
    }
}
