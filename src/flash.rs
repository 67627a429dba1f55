//! One-shot notices carried across a redirect.
//!
//! A handler pushes a message into the session and redirects; the next page
//! that renders the layout drains every pending message.

use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::{session::FLASH, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Error,
    Success,
}

impl Level {
    pub fn css_class(self) -> &'static str {
        match self {
            Level::Error => "flash flash-error",
            Level::Success => "flash flash-success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

pub async fn push(session: &Session, level: Level, message: impl Into<String>) -> AppResult<()> {
    let mut pending = session.get::<Vec<Flash>>(FLASH).await?.unwrap_or_default();
    pending.push(Flash { level, message: message.into() });
    session.insert(FLASH, pending).await?;
    Ok(())
}

pub async fn take(session: &Session) -> AppResult<Vec<Flash>> {
    Ok(session.remove::<Vec<Flash>>(FLASH).await?.unwrap_or_default())
}

/// Flash an error and redirect, the usual way out of a handler.
pub async fn error(session: &Session, message: impl Into<String>, to: &str) -> AppResult<Response> {
    push(session, Level::Error, message).await?;
    Ok(Redirect::to(to).into_response())
}

pub async fn success(session: &Session, message: impl Into<String>, to: &str) -> AppResult<Response> {
    push(session, Level::Success, message).await?;
    Ok(Redirect::to(to).into_response())
}
