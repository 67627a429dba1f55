use axum::{debug_handler, extract::{Path, State}, response::{IntoResponse, Response}};
use sqlx::SqlitePool;
use time::OffsetDateTime;
use tower_sessions::Session;

use crate::{
    auth::{parse_id, CurrentUser, CAMPGROUND_NOT_FOUND},
    db::{campgrounds, comments, Account, Campground, Comment},
    flash, include_res,
    res::{self, escape, markdown, time_ago},
    AppResult, AppState,
};

#[debug_handler(state = AppState)]
pub(crate) async fn show(
    State(db_pool): State<SqlitePool>,
    session: Session,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let not_found = || flash::error(&session, CAMPGROUND_NOT_FOUND, "/campgrounds");

    let Some(id) = parse_id(&id) else {
        return not_found().await;
    };
    let campground = match campgrounds::find(&db_pool, id).await {
        Ok(Some(campground)) => campground,
        Ok(None) => return not_found().await,
        Err(e) => return flash::error(&session, e.to_string(), "/campgrounds").await,
    };
    let comments = match comments::for_campground(&db_pool, id).await {
        Ok(comments) => comments,
        Err(e) => return flash::error(&session, e.to_string(), "/campgrounds").await,
    };
    let all = match campgrounds::all(&db_pool).await {
        Ok(all) => all,
        Err(e) => return flash::error(&session, e.to_string(), "/campgrounds").await,
    };

    let now = OffsetDateTime::now_utc();
    let content = render(&campground, &comments, &all, user.as_ref(), now);

    Ok(res::page(&session, user.as_ref(), &campground.name, &content).await?.into_response())
}

fn render(
    campground: &Campground,
    comments: &[Comment],
    all: &[Campground],
    viewer: Option<&Account>,
    now: OffsetDateTime,
) -> String {
    let owner_controls = match viewer {
        Some(account) if campground.is_owned_by(account) => {
            include_res!(str, "/pages/campgrounds/owner_controls.html")
                .replace("{id}", &campground.id.to_string())
        }
        _ => String::new(),
    };

    let mut comment_items = String::new();
    for comment in comments {
        let controls = match viewer {
            Some(account) if comment.is_owned_by(account) => {
                include_res!(str, "/pages/comments/controls.html")
                    .replace("{campground_id}", &campground.id.to_string())
                    .replace("{comment_id}", &comment.id.to_string())
            }
            _ => String::new(),
        };
        comment_items += &include_res!(str, "/pages/comments/comment.html")
            .replace("{author}", &escape(&comment.author_username))
            .replace("{created}", &time_ago(comment.created(), now))
            .replace("{controls}", &controls)
            .replace("{body}", &markdown(&comment.text));
    }

    let mut sidebar = String::new();
    for other in all {
        let active = if other.id == campground.id { "active" } else { "" };
        sidebar += &include_res!(str, "/pages/campgrounds/sidebar_item.html")
            .replace("{id}", &other.id.to_string())
            .replace("{active}", active)
            .replace("{name}", &escape(&other.name));
    }

    include_res!(str, "/pages/campgrounds/show.html")
        .replace("{id}", &campground.id.to_string())
        .replace("{image}", &escape(&campground.image))
        .replace("{author}", &escape(&campground.author_username))
        .replace("{created}", &time_ago(campground.created(), now))
        .replace("{owner_controls}", &owner_controls)
        .replace("{sidebar}", &sidebar)
        .replace("{comments}", &comment_items)
        .replace("{name}", &escape(&campground.name))
        .replace("{description}", &escape(&campground.description))
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn account(username: &str) -> Account {
        Account { id: Uuid::now_v7(), username: username.to_owned(), password_hash: String::new(), created_at: 0 }
    }

    fn campground(author: &Account, name: &str) -> Campground {
        Campground {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            description: "<b>lakeside</b>".to_owned(),
            image: "https://img.example/x.png".to_owned(),
            image_id: "x".to_owned(),
            author_id: author.id,
            author_username: author.username.clone(),
            created_at: 0,
        }
    }

    fn comment(site: &Campground, author: &Account, text: &str) -> Comment {
        Comment {
            id: Uuid::now_v7(),
            campground_id: site.id,
            text: text.to_owned(),
            author_id: author.id,
            author_username: author.username.clone(),
            created_at: 0,
        }
    }

    #[test]
    fn owners_see_their_controls_and_others_do_not() {
        let owner = account("owner");
        let stranger = account("stranger");
        let site = campground(&owner, "Salmon Creek");
        let now = OffsetDateTime::UNIX_EPOCH;
        let edit_link = format!("/campgrounds/{}/edit", site.id);

        assert!(render(&site, &[], &[], Some(&owner), now).contains(&edit_link));
        assert!(!render(&site, &[], &[], Some(&stranger), now).contains(&edit_link));
        assert!(!render(&site, &[], &[], None, now).contains(&edit_link));
    }

    #[test]
    fn comments_render_in_order_with_escaped_fields() {
        let owner = account("owner");
        let commenter = account("<i>sneaky</i>");
        let site = campground(&owner, "Salmon Creek");
        let comments = [comment(&site, &commenter, "first *post*"), comment(&site, &owner, "closing remark")];

        let html = render(&site, &comments, &[site.clone()], None, OffsetDateTime::UNIX_EPOCH);

        let first = html.find("first <em>post</em>").unwrap();
        let second = html.find("closing remark").unwrap();
        assert!(first < second);
        assert!(html.contains("&lt;i&gt;sneaky&lt;/i&gt;"));
        assert!(html.contains("&lt;b&gt;lakeside&lt;/b&gt;"));
    }
}
