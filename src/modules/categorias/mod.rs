//! Categories: a flat list of names books are filed under.

pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use libreria_kernel::{InitCtx, Migration, Module};

use self::store::CategoryStore;

pub use models::{Category, NewCategory};
pub use store::SqlCategoryStore;

pub struct CategoriasModule {
    store: Arc<dyn CategoryStore>,
}

impl CategoriasModule {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for CategoriasModule {
    fn name(&self) -> &'static str {
        "categorias"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "categorias module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/categorias/": {
                    "get": {
                        "summary": "List categories",
                        "tags": ["Categorias"],
                        "responses": {
                            "200": {
                                "description": "Every category",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Categoria" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/categorias/crear": {
                    "post": {
                        "summary": "Create a category",
                        "tags": ["Categorias"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CrearCategoria" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Category created",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Categoria" }
                                    }
                                }
                            },
                            "400": { "$ref": "#/components/responses/Error" },
                            "409": { "$ref": "#/components/responses/Error" }
                        }
                    }
                },
                "/categorias/{id}/": {
                    "get": {
                        "summary": "Get a category",
                        "tags": ["Categorias"],
                        "parameters": [
                            { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } }
                        ],
                        "responses": {
                            "200": {
                                "description": "The category",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Categoria" }
                                    }
                                }
                            },
                            "404": { "$ref": "#/components/responses/Error" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Categoria": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "nombre_categoria": { "type": "string" }
                        },
                        "required": ["id", "nombre_categoria"]
                    },
                    "CrearCategoria": {
                        "type": "object",
                        "properties": {
                            "nombre_categoria": { "type": "string" }
                        },
                        "required": ["nombre_categoria"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE categoria (
                    id               INTEGER PRIMARY KEY AUTOINCREMENT,
                    nombre_categoria TEXT NOT NULL UNIQUE
                );
                "#,
        }]
    }
}

/// Create a new instance of the categorias module
pub fn create_module(store: Arc<dyn CategoryStore>) -> Arc<dyn Module> {
    Arc::new(CategoriasModule::new(store))
}
