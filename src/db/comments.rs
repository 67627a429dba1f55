use sqlx::SqlitePool;
use uuid::Uuid;

use super::{now, Account, Comment};

const COLUMNS: &str = "id,campground_id,text,author_id,author_username,created_at";

pub struct NewComment<'a> {
    pub text: &'a str,
}

pub async fn create(
    db_pool: &SqlitePool,
    campground_id: Uuid,
    author: &Account,
    new: NewComment<'_>,
) -> Result<Comment, sqlx::Error> {
    let comment = Comment {
        id: Uuid::now_v7(),
        campground_id,
        text: new.text.to_owned(),
        author_id: author.id,
        author_username: author.username.clone(),
        created_at: now(),
    };

    sqlx::query(&format!("INSERT INTO comments ({COLUMNS}) VALUES (?,?,?,?,?,?)"))
        .bind(comment.id)
        .bind(comment.campground_id)
        .bind(&comment.text)
        .bind(comment.author_id)
        .bind(&comment.author_username)
        .bind(comment.created_at)
        .execute(db_pool)
        .await?;

    Ok(comment)
}

/// The campground's comments in the order they were posted.
pub async fn for_campground(db_pool: &SqlitePool, campground_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {COLUMNS} FROM comments WHERE campground_id=? ORDER BY created_at, rowid"))
        .bind(campground_id)
        .fetch_all(db_pool)
        .await
}

/// Looks a comment up only within the campground it is supposed to belong to.
pub async fn find(db_pool: &SqlitePool, campground_id: Uuid, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {COLUMNS} FROM comments WHERE id=? AND campground_id=?"))
        .bind(id)
        .bind(campground_id)
        .fetch_optional(db_pool)
        .await
}

pub async fn update_text(db_pool: &SqlitePool, id: Uuid, text: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE comments SET text=? WHERE id=?")
        .bind(text)
        .bind(id)
        .execute(db_pool)
        .await?;
    Ok(())
}

pub async fn delete(db_pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM comments WHERE id=?")
        .bind(id)
        .execute(db_pool)
        .await?;
    Ok(())
}
