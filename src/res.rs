use axum::{debug_handler, http::header, response::{Html, IntoResponse}};
use time::OffsetDateTime;
use tower_sessions::Session;

use crate::{db::Account, flash, AppResult};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

#[debug_handler]
pub async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        include_res!(str, "/style.css"),
    )
}

/// Wraps `content` in the shared layout: navigation for `user` and any flash
/// messages still waiting in the session.
pub async fn page(
    session: &Session,
    user: Option<&Account>,
    title: &str,
    content: &str,
) -> AppResult<Html<String>> {
    let nav = match user {
        Some(account) => include_res!(str, "/pages/nav_user.html")
            .replace("{username}", &escape(&account.username)),
        None => include_res!(str, "/pages/nav_guest.html").to_owned(),
    };

    let mut flashes = String::new();
    for msg in flash::take(session).await? {
        flashes += &format!(
            r#"<div class="{}" role="alert">{}</div>"#,
            msg.level.css_class(),
            escape(&msg.message)
        );
    }

    // content last: it is the only part that may legitimately contain braces
    Ok(Html(
        include_res!(str, "/pages/layout.html")
            .replace("{title}", &escape(title))
            .replace("{nav}", &nav)
            .replace("{flashes}", &flashes)
            .replace("{content}", content),
    ))
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // placeholders are `{name}`; keep user text from ever forming one
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            c => out.push(c),
        }
    }
    out
}

/// Renders markdown with raw HTML demoted to text and scripted links disarmed.
pub fn markdown(source: &str) -> String {
    use pulldown_cmark::{Event, Parser, Tag};

    let parser = Parser::new(source).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) if !safe_url(&dest_url) => {
            Event::Start(Tag::Link { link_type, dest_url: "#".into(), title, id })
        }
        Event::Start(Tag::Image { link_type, dest_url, title, id }) if !safe_url(&dest_url) => {
            Event::Start(Tag::Image { link_type, dest_url: "#".into(), title, id })
        }
        _ => event,
    });

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output.replace('{', "&#123;").replace('}', "&#125;")
}

/// Relative links, or absolute ones on http, https or mailto.
fn safe_url(url: &str) -> bool {
    // browsers ignore these inside a scheme, so `java\tscript:` still runs
    let cleaned: String = url.chars().filter(|c| !c.is_ascii_whitespace() && !c.is_control()).collect();
    match cleaned.split_once(':') {
        Some((scheme, _)) if !scheme.contains(['/', '?', '#']) => {
            matches!(scheme.to_ascii_lowercase().as_str(), "http" | "https" | "mailto")
        }
        _ => true,
    }
}

/// "5 minutes ago" style rendering of a past instant.
pub fn time_ago(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let seconds = (now - then).whole_seconds().max(0);

    let (amount, unit) = match seconds {
        0..45 => return "a few seconds ago".to_owned(),
        45..90 => return "a minute ago".to_owned(),
        90..2_700 => ((seconds + 30) / 60, "minutes"),
        2_700..5_400 => return "an hour ago".to_owned(),
        5_400..79_200 => ((seconds + 1_800) / 3_600, "hours"),
        79_200..129_600 => return "a day ago".to_owned(),
        129_600..2_246_400 => ((seconds + 43_200) / 86_400, "days"),
        2_246_400..3_974_400 => return "a month ago".to_owned(),
        3_974_400..27_648_000 => ((seconds + 1_296_000) / 2_592_000, "months"),
        27_648_000..47_304_000 => return "a year ago".to_owned(),
        _ => ((seconds + 15_768_000) / 31_536_000, "years"),
    };
    format!("{amount} {unit} ago")
}
