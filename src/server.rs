//! Application bootstrap: database, modules, migrations, HTTP.

use anyhow::Context;
use libreria_db::DbPool;
use libreria_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules::{self, Stores};

/// Serve the catalog until shutdown, then stop every module.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "libreria bootstrap starting"
    );

    let pool = connect(&settings).await?;
    let registry = registry_for(&pool);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;

    if settings.database.run_migrations {
        apply_migrations(&pool, &registry).await?;
    } else {
        tracing::info!("automatic migrations disabled");
    }

    registry.start_all(&ctx).await?;
    tracing::info!("libreria bootstrap complete");

    let served = libreria_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    pool.close().await;

    served
}

/// Apply pending migrations and exit. Returns how many were applied.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let pool = connect(settings).await?;
    let registry = registry_for(&pool);
    let applied = apply_migrations(&pool, &registry).await?;
    pool.close().await;
    Ok(applied)
}

async fn connect(settings: &Settings) -> anyhow::Result<DbPool> {
    libreria_db::connect(&settings.database)
        .await
        .with_context(|| format!("failed to open database '{}'", settings.database.url))
}

fn registry_for(pool: &DbPool) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &Stores::sql(pool.clone()));
    registry
}

async fn apply_migrations(pool: &DbPool, registry: &ModuleRegistry) -> anyhow::Result<usize> {
    let migrations = registry.collect_migrations();
    let applied = libreria_db::run_migrations(pool, &migrations)
        .await
        .context("failed to apply migrations")?;
    tracing::info!(
        applied,
        known = migrations.len(),
        "migrations up to date"
    );
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "sqlite::memory:".to_string();
        settings
    }

    #[tokio::test]
    async fn migrate_applies_every_module_migration() {
        let settings = in_memory_settings();
        let applied = migrate(&settings).await.unwrap();
        assert_eq!(applied, 2);
    }

    #[tokio::test]
    async fn migrations_are_idempotent_on_one_pool() {
        let settings = in_memory_settings();
        let pool = connect(&settings).await.unwrap();
        let registry = registry_for(&pool);

        assert_eq!(apply_migrations(&pool, &registry).await.unwrap(), 2);
        assert_eq!(apply_migrations(&pool, &registry).await.unwrap(), 0);
    }
}
