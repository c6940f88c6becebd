//! Subscriber persistence over sqlite

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use thiserror::Error;

use super::subscriber::{Subscriber, SubscriberEmail};

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// What a subscribe call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// New record inserted
    Created,
    /// Inactive record flipped back to active
    Reactivated,
    /// Already subscribed and active; callers report this as a conflict
    AlreadyActive,
}

/// Pool-owning subscriber store
#[derive(Debug, Clone)]
pub struct SubscriberStore {
    pool: SqlitePool,
}

impl SubscriberStore {
    /// Connect and run the schema migration
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        // SQLite serializes writes anyway; a single connection also keeps
        // in-memory databases coherent across queries
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS subscribers (
                email TEXT PRIMARY KEY,
                subscribed_at TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert a new subscriber or reactivate an inactive one.
    /// One record per email, always.
    pub async fn subscribe(&self, email: &SubscriberEmail) -> Result<SubscribeOutcome> {
        let existing: Option<Subscriber> = sqlx::query_as(
            "SELECT email, subscribed_at, is_active FROM subscribers WHERE email = ?",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match existing {
            Some(subscriber) if subscriber.is_active => Ok(SubscribeOutcome::AlreadyActive),
            Some(_) => {
                sqlx::query("UPDATE subscribers SET is_active = 1 WHERE email = ?")
                    .bind(email.as_str())
                    .execute(&self.pool)
                    .await?;
                Ok(SubscribeOutcome::Reactivated)
            }
            None => {
                sqlx::query(
                    "INSERT INTO subscribers (email, subscribed_at, is_active) VALUES (?, ?, 1)",
                )
                .bind(email.as_str())
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;
                Ok(SubscribeOutcome::Created)
            }
        }
    }

    /// Soft-delete: flip the active flag. Returns whether a row changed.
    pub async fn unsubscribe(&self, email: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE subscribers SET is_active = 0 WHERE email = ?")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All active subscribers, newest first
    pub async fn active(&self) -> Result<Vec<Subscriber>> {
        let subscribers = sqlx::query_as(
            "SELECT email, subscribed_at, is_active FROM subscribers
             WHERE is_active = 1 ORDER BY subscribed_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(subscribers)
    }

    /// Every subscriber, newest first
    pub async fn all(&self) -> Result<Vec<Subscriber>> {
        let subscribers = sqlx::query_as(
            "SELECT email, subscribed_at, is_active FROM subscribers
             ORDER BY subscribed_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(subscribers)
    }

    /// Hard-delete a subscriber. Returns whether a row was removed.
    pub async fn delete(&self, email: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subscribers WHERE email = ?")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SubscriberStore {
        SubscriberStore::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_double_subscribe_conflicts() {
        let store = store().await;
        let email = SubscriberEmail::parse("a@b.com").unwrap();

        assert_eq!(
            store.subscribe(&email).await.unwrap(),
            SubscribeOutcome::Created
        );
        assert_eq!(
            store.subscribe(&email).await.unwrap(),
            SubscribeOutcome::AlreadyActive
        );
        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_resubscribe_reactivates_single_record() {
        let store = store().await;
        // The subscription form normalizes before storage
        let email = SubscriberEmail::parse("USER@Example.com ").unwrap();

        store.subscribe(&email).await.unwrap();
        assert!(store.unsubscribe("user@example.com").await.unwrap());

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].is_active);
        assert!(store.active().await.unwrap().is_empty());

        assert_eq!(
            store.subscribe(&email).await.unwrap(),
            SubscribeOutcome::Reactivated
        );
        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].email, "user@example.com");
        assert!(all[0].is_active);
    }

    #[tokio::test]
    async fn test_unsubscribe_unknown_changes_nothing() {
        let store = store().await;
        assert!(!store.unsubscribe("nobody@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_is_hard() {
        let store = store().await;
        let email = SubscriberEmail::parse("gone@example.com").unwrap();
        store.subscribe(&email).await.unwrap();

        assert!(store.delete("gone@example.com").await.unwrap());
        assert!(store.all().await.unwrap().is_empty());
        assert!(!store.delete("gone@example.com").await.unwrap());
    }
}
