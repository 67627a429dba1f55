use sqlx::SqlitePool;
use uuid::Uuid;

use super::{now, Account, Campground};

const COLUMNS: &str = "id,name,description,image,image_id,author_id,author_username,created_at";

pub struct NewCampground<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub image: &'a str,
    pub image_id: &'a str,
}

/// Fields an owner may change. A `None` image keeps the current one.
pub struct CampgroundChanges<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub image: Option<(&'a str, &'a str)>,
}

pub async fn create(db_pool: &SqlitePool, author: &Account, new: NewCampground<'_>) -> Result<Campground, sqlx::Error> {
    let campground = Campground {
        id: Uuid::now_v7(),
        name: new.name.to_owned(),
        description: new.description.to_owned(),
        image: new.image.to_owned(),
        image_id: new.image_id.to_owned(),
        author_id: author.id,
        author_username: author.username.clone(),
        created_at: now(),
    };

    sqlx::query(&format!("INSERT INTO campgrounds ({COLUMNS}) VALUES (?,?,?,?,?,?,?,?)"))
        .bind(campground.id)
        .bind(&campground.name)
        .bind(&campground.description)
        .bind(&campground.image)
        .bind(&campground.image_id)
        .bind(campground.author_id)
        .bind(&campground.author_username)
        .bind(campground.created_at)
        .execute(db_pool)
        .await?;

    Ok(campground)
}

pub async fn all(db_pool: &SqlitePool) -> Result<Vec<Campground>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {COLUMNS} FROM campgrounds ORDER BY created_at DESC, id DESC"))
        .fetch_all(db_pool)
        .await
}

pub async fn find(db_pool: &SqlitePool, id: Uuid) -> Result<Option<Campground>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {COLUMNS} FROM campgrounds WHERE id=?"))
        .bind(id)
        .fetch_optional(db_pool)
        .await
}

pub async fn update(db_pool: &SqlitePool, id: Uuid, changes: CampgroundChanges<'_>) -> Result<(), sqlx::Error> {
    match changes.image {
        Some((image, image_id)) => {
            sqlx::query("UPDATE campgrounds SET name=?,description=?,image=?,image_id=? WHERE id=?")
                .bind(changes.name)
                .bind(changes.description)
                .bind(image)
                .bind(image_id)
                .bind(id)
                .execute(db_pool)
                .await?;
        }
        None => {
            sqlx::query("UPDATE campgrounds SET name=?,description=? WHERE id=?")
                .bind(changes.name)
                .bind(changes.description)
                .bind(id)
                .execute(db_pool)
                .await?;
        }
    }
    Ok(())
}

/// Removes the campground together with every comment attached to it.
/// Returns how many comments went with it.
pub async fn delete(db_pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
    let mut tx = db_pool.begin().await?;

    let comments = sqlx::query("DELETE FROM comments WHERE campground_id=?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM campgrounds WHERE id=?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(comments)
}
