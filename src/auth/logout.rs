use axum::{debug_handler, response::Response};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{flash, session::USER_ID, AppResult};

#[debug_handler]
pub(crate) async fn logout(session: Session) -> AppResult<Response> {
    session.remove::<Uuid>(USER_ID).await?;
    session.cycle_id().await?;
    flash::success(&session, "Logged you out!", "/campgrounds").await
}
