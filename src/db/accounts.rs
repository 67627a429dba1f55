use sqlx::SqlitePool;
use uuid::Uuid;

use super::{now, Account};

pub struct NewAccount<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// `Ok(None)` when the username is already registered.
pub async fn create(db_pool: &SqlitePool, new: NewAccount<'_>) -> Result<Option<Account>, sqlx::Error> {
    let account = Account {
        id: Uuid::now_v7(),
        username: new.username.to_owned(),
        password_hash: new.password_hash.to_owned(),
        created_at: now(),
    };

    let inserted = sqlx::query("INSERT INTO accounts (id,username,password_hash,created_at) VALUES (?,?,?,?)")
        .bind(account.id)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.created_at)
        .execute(db_pool)
        .await;

    match inserted {
        Ok(_) => Ok(Some(account)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn find(db_pool: &SqlitePool, id: Uuid) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as("SELECT id,username,password_hash,created_at FROM accounts WHERE id=?")
        .bind(id)
        .fetch_optional(db_pool)
        .await
}

pub async fn find_by_username(db_pool: &SqlitePool, username: &str) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as("SELECT id,username,password_hash,created_at FROM accounts WHERE username=?")
        .bind(username)
        .fetch_optional(db_pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn usernames_are_unique() {
        let db_pool = test_pool().await;
        let first = create(&db_pool, NewAccount { username: "ranger", password_hash: "x" })
            .await
            .unwrap()
            .unwrap();
        let second = create(&db_pool, NewAccount { username: "ranger", password_hash: "y" })
            .await
            .unwrap();

        assert!(second.is_none());
        let found = find_by_username(&db_pool, "ranger").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(found.password_hash, "x");
        assert!(find(&db_pool, Uuid::now_v7()).await.unwrap().is_none());
    }
}
