use axum::{debug_handler, response::{IntoResponse, Response}};
use tower_sessions::Session;

use crate::{auth::CurrentUser, include_res, res, AppResult, AppState};

#[debug_handler(state = AppState)]
pub async fn landing(
    session: Session,
    CurrentUser(user): CurrentUser,
) -> AppResult<Response> {
    Ok(
        res::page(&session, user.as_ref(), "YelpCamp", include_res!(str, "/pages/landing.html"))
            .await?
            .into_response()
    )
}
