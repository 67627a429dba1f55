mod delete;
mod edit;
mod form;
mod index;
mod new;
mod show;

use axum::{routing::get, Router};

use crate::{comments, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index::index).post(new::create))
        .route("/new", get(new::new_page))
        .route("/{id}", get(show::show).put(edit::update).delete(delete::destroy))
        .route("/{id}/edit", get(edit::edit_page))
        .nest("/{id}/comments", comments::router())
}
