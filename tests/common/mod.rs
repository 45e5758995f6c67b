//! Shared fixtures for the integration tests

#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use libreria_app::{register_all, Stores};
use libreria_kernel::{settings::Settings, ModuleRegistry};

/// Router over `stores`, built exactly as `serve` builds it
pub fn app(stores: &Stores) -> Router {
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, stores);
    libreria_http::build_router(&registry, &Settings::default())
}

/// Stores over a freshly migrated in-memory SQLite database
pub async fn sql_stores() -> Stores {
    let pool = libreria_db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");

    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, &Stores::sql(pool.clone()));
    libreria_db::run_migrations(&pool, &registry.collect_migrations())
        .await
        .expect("Failed to migrate");

    Stores::sql(pool)
}

pub fn memory_server() -> TestServer {
    TestServer::new(app(&Stores::memory())).expect("Failed to create test server")
}

pub async fn sql_server() -> TestServer {
    TestServer::new(app(&sql_stores().await)).expect("Failed to create test server")
}
