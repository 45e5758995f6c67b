use std::collections::BTreeSet;

use async_trait::async_trait;
use libreria_db::{DbPool, StoreError};
use serde_json::Value;

use super::models::{Category, NewCategory};

/// Persistence capability for categories
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Every category, ordered by id
    async fn list(&self) -> Result<Vec<Category>, StoreError>;

    /// Persist a new category; a duplicate name is a `Conflict`
    async fn create(&self, new: NewCategory) -> Result<Category, StoreError>;

    async fn find(&self, id: i64) -> Result<Option<Category>, StoreError>;

    /// Categories whose name is one of `names`. Names without a match are
    /// simply absent from the result.
    async fn filter_by_names(&self, names: &[String]) -> Result<Vec<Category>, StoreError>;
}

/// SQLite-backed category store
#[derive(Clone)]
pub struct SqlCategoryStore {
    pool: DbPool,
}

impl SqlCategoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for SqlCategoryStore {
    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        let categorias =
            sqlx::query_as::<_, Category>("SELECT id, nombre_categoria FROM categoria ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(categorias)
    }

    async fn create(&self, new: NewCategory) -> Result<Category, StoreError> {
        let categoria = sqlx::query_as::<_, Category>(
            "INSERT INTO categoria (nombre_categoria) VALUES (?) RETURNING id, nombre_categoria",
        )
        .bind(&new.nombre_categoria)
        .fetch_one(&self.pool)
        .await?;
        Ok(categoria)
    }

    async fn find(&self, id: i64) -> Result<Option<Category>, StoreError> {
        let categoria = sqlx::query_as::<_, Category>(
            "SELECT id, nombre_categoria FROM categoria WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(categoria)
    }

    async fn filter_by_names(&self, names: &[String]) -> Result<Vec<Category>, StoreError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        // One JSON array parameter, however many names arrive
        let unique: BTreeSet<&str> = names.iter().map(String::as_str).collect();
        let names_json = Value::Array(unique.into_iter().map(Value::from).collect()).to_string();

        let categorias = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, nombre_categoria
            FROM categoria
            WHERE nombre_categoria IN (SELECT value FROM json_each(?))
            ORDER BY id
            "#,
        )
        .bind(names_json)
        .fetch_all(&self.pool)
        .await?;
        Ok(categorias)
    }
}
