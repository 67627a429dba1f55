use axum::{debug_handler, extract::State, response::{IntoResponse, Response}};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::warn;

use crate::{
    auth::CurrentUser,
    db::{campgrounds, Campground},
    flash::{self, Level},
    include_res,
    res::{self, escape},
    AppResult, AppState,
};

#[debug_handler(state = AppState)]
pub(crate) async fn index(
    State(db_pool): State<SqlitePool>,
    session: Session,
    CurrentUser(user): CurrentUser,
) -> AppResult<Response> {
    let all = match campgrounds::all(&db_pool).await {
        Ok(all) => all,
        Err(e) => {
            warn!("listing campgrounds: {e}");
            // this is the page everything else falls back to, so no redirect
            flash::push(&session, Level::Error, e.to_string()).await?;
            Vec::new()
        }
    };

    let mut cards = String::new();
    for campground in &all {
        cards += &card(campground);
    }
    if all.is_empty() {
        cards = include_res!(str, "/pages/campgrounds/empty.html").to_owned();
    }

    let content = include_res!(str, "/pages/campgrounds/index.html")
        .replace("{cards}", &cards);

    Ok(res::page(&session, user.as_ref(), "Campgrounds", &content).await?.into_response())
}

fn card(campground: &Campground) -> String {
    include_res!(str, "/pages/campgrounds/card.html")
        .replace("{id}", &campground.id.to_string())
        .replace("{name}", &escape(&campground.name))
        .replace("{image}", &escape(&campground.image))
}
