use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::database::Item;

#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// All reads and writes against the items table go through this service.
/// It is the sole owner of item persistence; handlers never touch the pool
/// directly.
#[derive(Clone)]
pub struct ItemService {
    pool: PgPool,
}

impl ItemService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the items table if this is a fresh database.
    pub async fn ensure_schema(&self) -> Result<(), ItemError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                value TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All items, unordered. Ordering is a presentation concern.
    pub async fn list(&self) -> Result<Vec<Item>, ItemError> {
        let items = sqlx::query_as::<_, Item>("SELECT id, name, value FROM items")
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn create(&self, name: &str, value: &str) -> Result<Item, ItemError> {
        let id = Uuid::new_v4().to_string();

        let item = sqlx::query_as::<_, Item>(
            "INSERT INTO items (id, name, value) VALUES ($1, $2, $3) RETURNING id, name, value",
        )
        .bind(&id)
        .bind(name)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        info!("Created item {}", item.id);
        Ok(item)
    }

    /// Update an existing item in place. The id never changes.
    pub async fn update(&self, id: &str, name: &str, value: &str) -> Result<Item, ItemError> {
        let updated = sqlx::query_as::<_, Item>(
            "UPDATE items SET name = $2, value = $3 WHERE id = $1 RETURNING id, name, value",
        )
        .bind(id)
        .bind(name)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(item) => Ok(item),
            None => Err(ItemError::NotFound(id.to_string())),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), ItemError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ItemError::NotFound(id.to_string()));
        }

        info!("Deleted item {}", id);
        Ok(())
    }
}
