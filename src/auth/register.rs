use axum::{debug_handler, extract::State, response::{IntoResponse, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::info;

use crate::{db::{accounts, NewAccount}, flash, include_res, res, AppResult, AppState};

use super::{password, sign_in, CurrentUser};

#[derive(Deserialize)]
pub(crate) struct RegisterForm {
    username: String,
    password: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn register_page(
    session: Session,
    CurrentUser(user): CurrentUser,
) -> AppResult<Response> {
    Ok(res::page(&session, user.as_ref(), "Sign Up", include_res!(str, "/pages/auth/register.html"))
        .await?
        .into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn register(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Form(RegisterForm { username, password }): Form<RegisterForm>,
) -> AppResult<Response> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return flash::error(&session, "Username and password are required", "/register").await;
    }

    let password_hash = password::hash(password).await?;
    let created = accounts::create(&db_pool, NewAccount { username, password_hash: &password_hash }).await;
    let account = match created {
        Ok(Some(account)) => account,
        Ok(None) => {
            return flash::error(&session, "A user with the given username is already registered", "/register").await;
        }
        Err(e) => return flash::error(&session, e.to_string(), "/register").await,
    };

    info!("registered {}#{}", account.username, account.id);
    sign_in(&session, &account).await?;
    flash::success(&session, format!("Welcome to YelpCamp {}", account.username), "/campgrounds").await
}
