use axum::{
    debug_handler,
    extract::{Multipart, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::{
    auth::{back, LoggedIn},
    db::{campgrounds, NewCampground},
    flash, include_res, res, AppResult, AppState, SharedImageHost,
};

use super::form::CampgroundForm;

#[debug_handler(state = AppState)]
pub(crate) async fn new_page(
    session: Session,
    LoggedIn(account): LoggedIn,
) -> AppResult<Response> {
    Ok(
        res::page(&session, Some(&account), "New Campground", include_res!(str, "/pages/campgrounds/new.html"))
            .await?
            .into_response()
    )
}

#[debug_handler(state = AppState)]
pub(crate) async fn create(
    State(db_pool): State<SqlitePool>,
    State(images): State<SharedImageHost>,
    session: Session,
    headers: HeaderMap,
    LoggedIn(account): LoggedIn,
    multipart: Multipart,
) -> AppResult<Response> {
    let back = back(&headers);

    let form = match CampgroundForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => return flash::error(&session, e.body_text(), &back).await,
    };
    if let Some(problem) = form.problem(true) {
        return flash::error(&session, problem, &back).await;
    }
    let Some(upload) = form.image else {
        return flash::error(&session, super::form::IMAGE_REQUIRED, &back).await;
    };

    let hosted = match images.upload(&upload.hosted_name(), upload.bytes).await {
        Ok(hosted) => hosted,
        Err(e) => {
            warn!("uploading {}: {e}", upload.filename);
            return flash::error(&session, e.to_string(), &back).await;
        }
    };

    let created = campgrounds::create(
        &db_pool,
        &account,
        NewCampground {
            name: &form.name,
            description: &form.description,
            image: &hosted.url,
            image_id: &hosted.public_id,
        },
    )
    .await;

    match created {
        Ok(campground) => {
            info!("{} created campground {}", account.username, campground.id);
            Ok(Redirect::to(&format!("/campgrounds/{}", campground.id)).into_response())
        }
        Err(e) => {
            // the stored image would otherwise be orphaned
            if let Err(destroy_err) = images.destroy(&hosted.public_id).await {
                warn!("could not remove orphaned image {}: {destroy_err}", hosted.public_id);
            }
            flash::error(&session, e.to_string(), &back).await
        }
    }
}
