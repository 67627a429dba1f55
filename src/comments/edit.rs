use axum::{
    debug_handler,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{
    auth::{back, OwnedComment},
    db::comments,
    flash, include_res,
    res::{self, escape},
    AppResult, AppState,
};

use super::new::{CommentForm, TEXT_REQUIRED};

#[debug_handler(state = AppState)]
pub(crate) async fn edit_page(
    session: Session,
    OwnedComment { account, campground_id, comment }: OwnedComment,
) -> AppResult<Response> {
    let content = include_res!(str, "/pages/comments/edit.html")
        .replace("{campground_id}", &campground_id.to_string())
        .replace("{comment_id}", &comment.id.to_string())
        .replace("{text}", &escape(&comment.text));

    Ok(res::page(&session, Some(&account), "Edit Comment", &content).await?.into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn update(
    State(db_pool): State<SqlitePool>,
    session: Session,
    headers: HeaderMap,
    OwnedComment { campground_id, comment, .. }: OwnedComment,
    Form(CommentForm { text }): Form<CommentForm>,
) -> AppResult<Response> {
    if text.trim().is_empty() {
        return flash::error(&session, TEXT_REQUIRED, &back(&headers)).await;
    }

    match comments::update_text(&db_pool, comment.id, &text).await {
        Ok(()) => Ok(Redirect::to(&format!("/campgrounds/{campground_id}")).into_response()),
        Err(e) => flash::error(&session, e.to_string(), &back(&headers)).await,
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn destroy(
    State(db_pool): State<SqlitePool>,
    session: Session,
    headers: HeaderMap,
    OwnedComment { campground_id, comment, .. }: OwnedComment,
) -> AppResult<Response> {
    match comments::delete(&db_pool, comment.id).await {
        Ok(()) => flash::success(&session, "Comment deleted", &format!("/campgrounds/{campground_id}")).await,
        Err(e) => flash::error(&session, e.to_string(), &back(&headers)).await,
    }
}
