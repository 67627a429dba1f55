//! Identity and gating, as extractors: handlers that name `LoggedIn` or one
//! of the `Owned*` types only run once the check has passed.

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Path},
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    db::{accounts, campgrounds, comments, Account, Campground, Comment},
    flash,
    session::USER_ID,
    AppError, AppResult, AppState,
};

pub const LOGIN_REQUIRED: &str = "You need to be logged in to do that";
pub const NOT_PERMITTED: &str = "You don't have permission to do that";
pub const CAMPGROUND_NOT_FOUND: &str = "Campground not found";
pub const COMMENT_NOT_FOUND: &str = "Comment not found";

/// The account behind the session cookie, if any.
pub struct CurrentUser(pub Option<Account>);

/// The account behind the session cookie; anonymous requests are sent to the
/// login page.
pub struct LoggedIn(pub Account);

/// A campground the logged-in requester owns.
pub struct OwnedCampground {
    pub account: Account,
    pub campground: Campground,
}

/// A comment, on the campground named in the path, that the requester owns.
pub struct OwnedComment {
    pub account: Account,
    pub campground_id: Uuid,
    pub comment: Comment,
}

#[derive(Deserialize)]
struct CampgroundPath {
    id: String,
}

#[derive(Deserialize)]
struct CommentPath {
    id: String,
    comment_id: String,
}

/// Where "go back" leads: the referring page on this site, or the listing.
pub fn back(headers: &HeaderMap) -> String {
    headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| {
            if referer.starts_with('/') && !referer.starts_with("//") {
                return Some(referer.to_owned());
            }
            let url = reqwest::Url::parse(referer).ok()?;
            Some(match url.query() {
                Some(query) => format!("{}?{query}", url.path()),
                None => url.path().to_owned(),
            })
        })
        .unwrap_or_else(|| "/campgrounds".to_owned())
}

pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

async fn session(parts: &mut Parts, state: &AppState) -> AppResult<Session> {
    Session::from_request_parts(parts, state)
        .await
        .map_err(|(_, msg)| AppError(anyhow!(msg)))
}

async fn refuse(session: &Session, message: &str, to: &str) -> Response {
    flash::error(session, message, to)
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = session(parts, state).await?;
        let Some(user_id) = session.get::<Uuid>(USER_ID).await? else {
            return Ok(Self(None));
        };

        Ok(Self(accounts::find(&state.db_pool, user_id).await?))
    }
}

impl FromRequestParts<AppState> for LoggedIn {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(account) = CurrentUser::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        if let Some(account) = account {
            return Ok(Self(account));
        }

        let session = session(parts, state).await.map_err(IntoResponse::into_response)?;
        Err(refuse(&session, LOGIN_REQUIRED, "/login").await)
    }
}

impl FromRequestParts<AppState> for OwnedCampground {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let LoggedIn(account) = LoggedIn::from_request_parts(parts, state).await?;
        let session = session(parts, state).await.map_err(IntoResponse::into_response)?;
        let back = back(&parts.headers);

        let id = Path::<CampgroundPath>::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|Path(path)| parse_id(&path.id));
        let found = match id {
            Some(id) => campgrounds::find(&state.db_pool, id)
                .await
                .map_err(|e| AppError::from(e).into_response())?,
            None => None,
        };

        let Some(campground) = found else {
            return Err(refuse(&session, CAMPGROUND_NOT_FOUND, &back).await);
        };
        if !campground.is_owned_by(&account) {
            return Err(refuse(&session, NOT_PERMITTED, &back).await);
        }

        Ok(Self { account, campground })
    }
}

impl FromRequestParts<AppState> for OwnedComment {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let LoggedIn(account) = LoggedIn::from_request_parts(parts, state).await?;
        let session = session(parts, state).await.map_err(IntoResponse::into_response)?;
        let back = back(&parts.headers);

        let ids = Path::<CommentPath>::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|Path(path)| Some((parse_id(&path.id)?, parse_id(&path.comment_id)?)));
        let found = match ids {
            Some((campground_id, comment_id)) => comments::find(&state.db_pool, campground_id, comment_id)
                .await
                .map_err(|e| AppError::from(e).into_response())?,
            None => None,
        };

        let Some(comment) = found else {
            return Err(refuse(&session, COMMENT_NOT_FOUND, &back).await);
        };
        if !comment.is_owned_by(&account) {
            return Err(refuse(&session, NOT_PERMITTED, &back).await);
        }

        Ok(Self { account, campground_id: comment.campground_id, comment })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, "/campgrounds")]
    #[case(Some("http://localhost:3000/campgrounds/abc"), "/campgrounds/abc")]
    #[case(Some("https://evil.example/phish?x=1"), "/phish?x=1")]
    #[case(Some("/campgrounds/new"), "/campgrounds/new")]
    #[case(Some("//evil.example"), "/campgrounds")]
    #[case(Some("not a url"), "/campgrounds")]
    fn back_stays_on_site(#[case] referer: Option<&str>, #[case] expected: &str) {
        let mut headers = HeaderMap::new();
        if let Some(referer) = referer {
            headers.insert(header::REFERER, HeaderValue::from_str(referer).unwrap());
        }
        assert_eq!(back(&headers), expected);
    }

    #[test]
    fn ids_must_be_uuids() {
        assert!(parse_id("nope").is_none());
        let id = Uuid::now_v7();
        assert_eq!(parse_id(&id.to_string()), Some(id));
    }
}
