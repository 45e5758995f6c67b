use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use libreria_db::{DbPool, StoreError};

use super::models::{Book, BookDraft, BookFields};
use crate::modules::categorias::Category;

/// Persistence capability for books
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Every book with its categories, ordered by id
    async fn list(&self) -> Result<Vec<Book>, StoreError>;

    async fn find(&self, id: i64) -> Result<Option<Book>, StoreError>;

    /// Insert or overwrite a book and replace its category set atomically.
    /// Overwriting a book that no longer exists yields `StoreError::Missing`.
    async fn save(&self, draft: BookDraft) -> Result<Book, StoreError>;

    /// Hard delete. Returns whether a book was removed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    titulo: String,
    autor: Option<String>,
    paginas: Option<i64>,
    fecha_publicacion: Option<String>,
}

impl BookRow {
    fn into_book(self, categorias: Vec<Category>) -> Book {
        Book {
            id: self.id,
            fields: BookFields {
                titulo: self.titulo,
                autor: self.autor,
                paginas: self.paginas,
                fecha_publicacion: self.fecha_publicacion,
            },
            categorias,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AssociationRow {
    libro_id: i64,
    id: i64,
    nombre_categoria: String,
}

/// SQLite-backed book store
#[derive(Clone)]
pub struct SqlBookStore {
    pool: DbPool,
}

impl SqlBookStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn categorias_of(&self, libro_id: i64) -> Result<Vec<Category>, StoreError> {
        let categorias = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.nombre_categoria
            FROM categoria c
            JOIN libro_categorias lc ON lc.categoria_id = c.id
            WHERE lc.libro_id = ?
            ORDER BY c.id
            "#,
        )
        .bind(libro_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categorias)
    }
}

#[async_trait]
impl BookStore for SqlBookStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query_as::<_, BookRow>(
            "SELECT id, titulo, autor, paginas, fecha_publicacion FROM libro ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let associations = sqlx::query_as::<_, AssociationRow>(
            r#"
            SELECT lc.libro_id, c.id, c.nombre_categoria
            FROM libro_categorias lc
            JOIN categoria c ON c.id = lc.categoria_id
            ORDER BY lc.libro_id, c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_book: HashMap<i64, Vec<Category>> = HashMap::new();
        for row in associations {
            by_book.entry(row.libro_id).or_default().push(Category {
                id: row.id,
                nombre_categoria: row.nombre_categoria,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let categorias = by_book.remove(&row.id).unwrap_or_default();
                row.into_book(categorias)
            })
            .collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query_as::<_, BookRow>(
            "SELECT id, titulo, autor, paginas, fecha_publicacion FROM libro WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let categorias = self.categorias_of(row.id).await?;
                Ok(Some(row.into_book(categorias)))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, draft: BookDraft) -> Result<Book, StoreError> {
        let BookDraft {
            id,
            fields,
            categoria_ids,
        } = draft;

        // Rolled back on drop unless committed
        let mut tx = self.pool.begin().await?;

        let libro_id = match id {
            None => sqlx::query(
                "INSERT INTO libro (titulo, autor, paginas, fecha_publicacion) VALUES (?, ?, ?, ?)",
            )
            .bind(&fields.titulo)
            .bind(&fields.autor)
            .bind(fields.paginas)
            .bind(&fields.fecha_publicacion)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid(),
            Some(id) => {
                let updated = sqlx::query(
                    r#"
                    UPDATE libro
                    SET titulo = ?, autor = ?, paginas = ?, fecha_publicacion = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&fields.titulo)
                .bind(&fields.autor)
                .bind(fields.paginas)
                .bind(&fields.fecha_publicacion)
                .bind(id)
                .execute(&mut *tx)
                .await?;

                if updated.rows_affected() == 0 {
                    return Err(StoreError::Missing { entity: "Libro", id });
                }
                id
            }
        };

        sqlx::query("DELETE FROM libro_categorias WHERE libro_id = ?")
            .bind(libro_id)
            .execute(&mut *tx)
            .await?;

        let unique: BTreeSet<i64> = categoria_ids.into_iter().collect();
        for categoria_id in unique {
            sqlx::query("INSERT INTO libro_categorias (libro_id, categoria_id) VALUES (?, ?)")
                .bind(libro_id)
                .bind(categoria_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.find(libro_id)
            .await?
            .ok_or(StoreError::Missing {
                entity: "Libro",
                id: libro_id,
            })
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let deleted = sqlx::query("DELETE FROM libro WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(deleted.rows_affected() > 0)
    }
}
