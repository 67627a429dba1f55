//! Local username/password accounts kept in the session by id.

mod extract;
mod login;
mod logout;
mod password;
mod register;

use axum::{routing::get, Router};
use tower_sessions::Session;

use crate::{db::Account, session::USER_ID, AppResult, AppState};

pub use extract::{
    back, parse_id, CurrentUser, LoggedIn, OwnedCampground, OwnedComment, CAMPGROUND_NOT_FOUND,
    COMMENT_NOT_FOUND, LOGIN_REQUIRED, NOT_PERMITTED,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(register::register_page).post(register::register))
        .route("/login", get(login::login_page).post(login::login))
        .route("/logout", get(logout::logout))
}

/// Binds the session to `account`. The session id changes on every login.
pub(crate) async fn sign_in(session: &Session, account: &Account) -> AppResult<()> {
    session.cycle_id().await?;
    session.insert(USER_ID, account.id).await?;
    Ok(())
}
