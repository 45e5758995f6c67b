use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// What a module can see while it boots
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// One schema step owned by a module.
///
/// `id` is unique within the module and sorts in application order
/// (`001_init`, `002_...`). `up` may hold several SQL statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A catalog feature: its routes, schema, and API documentation.
///
/// The registry drives the lifecycle: `init` on every module, then the
/// collected migrations, then `start`; `stop` runs in reverse
/// registration order on shutdown.
#[async_trait]
pub trait Module: Sync + Send {
    /// Stable name, used as the migration ledger key
    fn name(&self) -> &'static str;

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Resource routes (`/libros/{id}`). The HTTP layer nests them under the
    /// configured API prefix.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment with `paths` and `components.schemas`; paths are
    /// prefixed on merge
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    fn migrations(&self) -> Vec<Migration> {
        Vec::new()
    }

    /// Runs once migrations are applied
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
