use axum::{
    debug_handler,
    extract::{Multipart, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::{
    auth::{back, OwnedCampground},
    db::{campgrounds, CampgroundChanges},
    flash, include_res,
    res::{self, escape},
    AppResult, AppState, SharedImageHost,
};

use super::form::CampgroundForm;

#[debug_handler(state = AppState)]
pub(crate) async fn edit_page(
    session: Session,
    OwnedCampground { account, campground }: OwnedCampground,
) -> AppResult<Response> {
    let content = include_res!(str, "/pages/campgrounds/edit.html")
        .replace("{id}", &campground.id.to_string())
        .replace("{name}", &escape(&campground.name))
        .replace("{description}", &escape(&campground.description));

    Ok(res::page(&session, Some(&account), "Edit Campground", &content).await?.into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn update(
    State(db_pool): State<SqlitePool>,
    State(images): State<SharedImageHost>,
    session: Session,
    headers: HeaderMap,
    OwnedCampground { account, campground }: OwnedCampground,
    multipart: Multipart,
) -> AppResult<Response> {
    let back = back(&headers);

    let form = match CampgroundForm::read(multipart).await {
        Ok(form) => form,
        Err(e) => return flash::error(&session, e.body_text(), &back).await,
    };
    if let Some(problem) = form.problem(false) {
        return flash::error(&session, problem, &back).await;
    }

    let CampgroundForm { name, description, image } = form;

    // the new picture goes up before the old one is let go
    let replacement = match image {
        Some(upload) => match images.upload(&upload.hosted_name(), upload.bytes).await {
            Ok(hosted) => Some(hosted),
            Err(e) => {
                warn!("uploading {}: {e}", upload.filename);
                return flash::error(&session, e.to_string(), &back).await;
            }
        },
        None => None,
    };

    let updated = campgrounds::update(
        &db_pool,
        campground.id,
        CampgroundChanges {
            name: &name,
            description: &description,
            image: replacement.as_ref().map(|hosted| (hosted.url.as_str(), hosted.public_id.as_str())),
        },
    )
    .await;

    let stale_image = match updated {
        Ok(()) => replacement.as_ref().map(|_| campground.image_id.as_str()),
        Err(e) => {
            if let Some(hosted) = &replacement {
                if let Err(destroy_err) = images.destroy(&hosted.public_id).await {
                    warn!("could not remove orphaned image {}: {destroy_err}", hosted.public_id);
                }
            }
            return flash::error(&session, e.to_string(), &back).await;
        }
    };
    if let Some(stale_image) = stale_image {
        if let Err(e) = images.destroy(stale_image).await {
            warn!("could not remove replaced image {stale_image}: {e}");
        }
    }

    info!("{} updated campground {}", account.username, campground.id);
    flash::success(&session, "Successfully Updated!", &format!("/campgrounds/{}", campground.id)).await
}
