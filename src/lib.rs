pub mod appresult;
pub mod auth;
pub mod campgrounds;
pub mod comments;
pub mod config;
pub mod db;
pub mod flash;
pub mod images;
pub mod landing;
pub mod method_override;
pub mod res;
pub mod session;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    middleware,
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

pub use appresult::{AppError, AppResult};
pub use config::Config;
pub use images::SharedImageHost;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub images: SharedImageHost,
}

/// Cookie and upload settings the router needs beyond [`AppState`].
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub session_ttl: time::Duration,
    pub cookie_secure: bool,
    pub max_upload_bytes: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            session_ttl: time::Duration::days(1),
            cookie_secure: false,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl From<&Config> for HttpSettings {
    fn from(config: &Config) -> Self {
        Self {
            session_ttl: time::Duration::minutes(config.session_ttl_minutes),
            cookie_secure: config.cookie_secure,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// The whole site. Method override wraps the routes from the outside so the
/// rewritten verb is what routing sees.
pub fn app(app_state: AppState, settings: HttpSettings) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(settings.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(settings.session_ttl));

    let routes = Router::new()
        .route("/", get(landing::landing))
        .route("/style.css", get(res::stylesheet))

        .merge(auth::router())
        .nest("/campgrounds", campgrounds::router())

        .with_state(app_state)
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .layer(session_layer);

    Router::new()
        .fallback_service(routes)
        .layer(middleware::from_fn(method_override::method_override))
        .layer(TraceLayer::new_for_http())
}
