//! In-memory catalog implementing both store traits.
//!
//! Behaves like the SQLite stores (unique category names, atomic saves,
//! id-ordered listings) so handlers can be exercised without a database.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use libreria_db::StoreError;
use tokio::sync::RwLock;

use super::categorias::store::CategoryStore;
use super::categorias::{Category, NewCategory};
use super::libros::store::BookStore;
use super::libros::{Book, BookDraft, BookFields};

#[derive(Default)]
pub struct MemoryCatalog {
    inner: RwLock<Catalog>,
}

#[derive(Default)]
struct Catalog {
    categorias: BTreeMap<i64, Category>,
    libros: BTreeMap<i64, StoredBook>,
    last_categoria_id: i64,
    last_libro_id: i64,
}

struct StoredBook {
    fields: BookFields,
    categoria_ids: BTreeSet<i64>,
}

impl Catalog {
    fn hydrate(&self, id: i64, stored: &StoredBook) -> Book {
        Book {
            id,
            fields: stored.fields.clone(),
            categorias: stored
                .categoria_ids
                .iter()
                .filter_map(|categoria_id| self.categorias.get(categoria_id).cloned())
                .collect(),
        }
    }
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryStore for MemoryCatalog {
    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        let catalog = self.inner.read().await;
        Ok(catalog.categorias.values().cloned().collect())
    }

    async fn create(&self, new: NewCategory) -> Result<Category, StoreError> {
        let mut catalog = self.inner.write().await;

        if catalog
            .categorias
            .values()
            .any(|c| c.nombre_categoria == new.nombre_categoria)
        {
            return Err(StoreError::Conflict(format!(
                "categoria '{}' already exists",
                new.nombre_categoria
            )));
        }

        catalog.last_categoria_id += 1;
        let categoria = Category {
            id: catalog.last_categoria_id,
            nombre_categoria: new.nombre_categoria,
        };
        catalog.categorias.insert(categoria.id, categoria.clone());
        Ok(categoria)
    }

    async fn find(&self, id: i64) -> Result<Option<Category>, StoreError> {
        let catalog = self.inner.read().await;
        Ok(catalog.categorias.get(&id).cloned())
    }

    async fn filter_by_names(&self, names: &[String]) -> Result<Vec<Category>, StoreError> {
        let catalog = self.inner.read().await;
        Ok(catalog
            .categorias
            .values()
            .filter(|c| names.contains(&c.nombre_categoria))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookStore for MemoryCatalog {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let catalog = self.inner.read().await;
        Ok(catalog
            .libros
            .iter()
            .map(|(id, stored)| catalog.hydrate(*id, stored))
            .collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let catalog = self.inner.read().await;
        Ok(catalog
            .libros
            .get(&id)
            .map(|stored| catalog.hydrate(id, stored)))
    }

    async fn save(&self, draft: BookDraft) -> Result<Book, StoreError> {
        let mut catalog = self.inner.write().await;

        // Everything is checked before anything is written
        if let Some(missing) = draft
            .categoria_ids
            .iter()
            .find(|id| !catalog.categorias.contains_key(*id))
        {
            return Err(StoreError::Missing {
                entity: "Categoria",
                id: *missing,
            });
        }

        let id = match draft.id {
            Some(id) if !catalog.libros.contains_key(&id) => {
                return Err(StoreError::Missing { entity: "Libro", id });
            }
            Some(id) => id,
            None => {
                catalog.last_libro_id += 1;
                catalog.last_libro_id
            }
        };

        let stored = StoredBook {
            fields: draft.fields,
            categoria_ids: draft.categoria_ids.into_iter().collect(),
        };
        let book = catalog.hydrate(id, &stored);
        catalog.libros.insert(id, stored);
        Ok(book)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut catalog = self.inner.write().await;
        Ok(catalog.libros.remove(&id).is_some())
    }
}
