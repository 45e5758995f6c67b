pub mod categorias;
pub mod fields;
pub mod libros;
pub mod memory;

use std::sync::Arc;

use libreria_db::DbPool;
use libreria_kernel::ModuleRegistry;

use self::categorias::store::CategoryStore;
use self::libros::store::BookStore;

/// Store handles injected into the modules
#[derive(Clone)]
pub struct Stores {
    pub categorias: Arc<dyn CategoryStore>,
    pub libros: Arc<dyn BookStore>,
}

impl Stores {
    /// Stores backed by the SQLite pool
    pub fn sql(pool: DbPool) -> Self {
        Self {
            categorias: Arc::new(categorias::SqlCategoryStore::new(pool.clone())),
            libros: Arc::new(libros::SqlBookStore::new(pool)),
        }
    }

    /// Both stores served by one shared in-memory catalog
    pub fn memory() -> Self {
        let catalog = Arc::new(memory::MemoryCatalog::new());
        Self {
            categorias: catalog.clone(),
            libros: catalog,
        }
    }
}

/// Register all catalog modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, stores: &Stores) {
    registry.register(categorias::create_module(stores.categorias.clone()));
    registry.register(libros::create_module(
        stores.libros.clone(),
        stores.categorias.clone(),
    ));
}

#[cfg(test)]
pub(crate) async fn migrated_pool() -> DbPool {
    let pool = libreria_db::connect_in_memory().await.unwrap();
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, &Stores::sql(pool.clone()));
    libreria_db::run_migrations(&pool, &registry.collect_migrations())
        .await
        .unwrap();
    pool
}
