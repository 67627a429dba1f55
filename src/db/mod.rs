//! SQLite persistence for accounts, campgrounds and their comments.
//!
//! Owner references are copied onto campgrounds and comments when they are
//! created (`author_id` + `author_username`) and are never re-synced.

pub mod accounts;
pub mod campgrounds;
pub mod comments;

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    FromRow, SqlitePool,
};
use time::OffsetDateTime;
use uuid::Uuid;

pub use accounts::NewAccount;
pub use campgrounds::{CampgroundChanges, NewCampground};
pub use comments::NewComment;

/// Opens (creating if needed) and migrates the database. An in-memory url
/// needs `max_connections == 1`, every connection would otherwise see its own
/// empty database.
pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;
    migrate(&db_pool).await?;
    Ok(db_pool)
}

pub async fn migrate(db_pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!().run(db_pool).await?;
    Ok(())
}

#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct Campground {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image: String,
    pub image_id: String,
    pub author_id: Uuid,
    pub author_username: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub campground_id: Uuid,
    pub text: String,
    pub author_id: Uuid,
    pub author_username: String,
    pub created_at: i64,
}

impl Campground {
    pub fn is_owned_by(&self, account: &Account) -> bool {
        self.author_id == account.id
    }

    pub fn created(&self) -> OffsetDateTime {
        from_unix(self.created_at)
    }
}

impl Comment {
    pub fn is_owned_by(&self, account: &Account) -> bool {
        self.author_id == account.id
    }

    pub fn created(&self) -> OffsetDateTime {
        from_unix(self.created_at)
    }
}

pub(crate) fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

fn from_unix(seconds: i64) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(seconds).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    connect("sqlite::memory:", 1).await.unwrap()
}
