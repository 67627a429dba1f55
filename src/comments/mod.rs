//! Comments, always addressed through the campground they belong to.

mod edit;
mod new;

use axum::{routing::{get, post, put}, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(new::create))
        .route("/new", get(new::new_page))
        .route("/{comment_id}", put(edit::update).delete(edit::destroy))
        .route("/{comment_id}/edit", get(edit::edit_page))
}
