use axum::{debug_handler, extract::State, response::{IntoResponse, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::info;

use crate::{db::accounts, flash, include_res, res, AppResult, AppState};

use super::{password, sign_in, CurrentUser};

const BAD_CREDENTIALS: &str = "Password or username is incorrect";

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    username: String,
    password: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn login_page(
    session: Session,
    CurrentUser(user): CurrentUser,
) -> AppResult<Response> {
    Ok(res::page(&session, user.as_ref(), "Login", include_res!(str, "/pages/auth/login.html"))
        .await?
        .into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(LoginForm { username, password }): Form<LoginForm>,
) -> AppResult<Response> {
    let Some(account) = accounts::find_by_username(&db_pool, username.trim()).await? else {
        return flash::error(&session, BAD_CREDENTIALS, "/login").await;
    };

    if !password::verify(password, account.password_hash.clone()).await? {
        return flash::error(&session, BAD_CREDENTIALS, "/login").await;
    }

    info!("welcome back {}#{}", account.username, account.id);
    sign_in(&session, &account).await?;
    flash::success(&session, format!("Welcome back, {}!", account.username), "/campgrounds").await
}
