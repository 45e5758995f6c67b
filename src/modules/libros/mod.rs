//! Books and their category associations.

pub mod models;
pub mod routes;
pub mod serializer;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use libreria_kernel::{InitCtx, Migration, Module};

use self::routes::LibrosState;
use self::store::BookStore;
use crate::modules::categorias::store::CategoryStore;

pub use models::{Book, BookDraft, BookFields};
pub use serializer::BookRepresentation;
pub use store::SqlBookStore;

pub struct LibrosModule {
    state: LibrosState,
}

impl LibrosModule {
    pub fn new(libros: Arc<dyn BookStore>, categorias: Arc<dyn CategoryStore>) -> Self {
        Self {
            state: LibrosState { libros, categorias },
        }
    }
}

#[async_trait]
impl Module for LibrosModule {
    fn name(&self) -> &'static str {
        "libros"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "libros module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let id_parameter = serde_json::json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer" }
        });
        let libro = serde_json::json!({
            "description": "The book",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Libro" }
                }
            }
        });
        let escritura = serde_json::json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/EscribirLibro" }
                }
            }
        });
        let error = serde_json::json!({ "$ref": "#/components/responses/Error" });

        Some(serde_json::json!({
            "paths": {
                "/libros": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Libros"],
                        "responses": {
                            "200": {
                                "description": "Every book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Libro" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/libros/crear": {
                    "post": {
                        "summary": "Create a book",
                        "description": "Category names without a matching category are dropped.",
                        "tags": ["Libros"],
                        "requestBody": escritura,
                        "responses": {
                            "201": libro,
                            "400": error
                        }
                    }
                },
                "/libros/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Libros"],
                        "parameters": [id_parameter],
                        "responses": {
                            "200": libro,
                            "404": error
                        }
                    },
                    "put": {
                        "summary": "Replace a book",
                        "description": "Every scalar and the whole category set are replaced.",
                        "tags": ["Libros"],
                        "parameters": [id_parameter],
                        "requestBody": escritura,
                        "responses": {
                            "200": libro,
                            "400": error,
                            "404": error
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Libros"],
                        "parameters": [id_parameter],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "404": error
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Libro": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "titulo": { "type": "string" },
                            "autor": { "type": ["string", "null"] },
                            "paginas": { "type": ["integer", "null"] },
                            "fecha_publicacion": { "type": ["string", "null"] },
                            "categorias": { "type": "array", "items": { "type": "string" } }
                        },
                        "required": ["id", "titulo", "autor", "paginas", "fecha_publicacion", "categorias"]
                    },
                    "EscribirLibro": {
                        "type": "object",
                        "properties": {
                            "titulo": { "type": "string" },
                            "autor": { "type": ["string", "null"] },
                            "paginas": { "type": ["integer", "null"] },
                            "fecha_publicacion": { "type": ["string", "null"] },
                            "categorias": { "type": "array", "items": { "type": "string" } }
                        },
                        "required": ["titulo"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE libro (
                    id                INTEGER PRIMARY KEY AUTOINCREMENT,
                    titulo            TEXT NOT NULL,
                    autor             TEXT,
                    paginas           INTEGER,
                    fecha_publicacion TEXT
                );
                CREATE TABLE libro_categorias (
                    libro_id     INTEGER NOT NULL REFERENCES libro (id) ON DELETE CASCADE,
                    categoria_id INTEGER NOT NULL REFERENCES categoria (id) ON DELETE RESTRICT,
                    PRIMARY KEY (libro_id, categoria_id)
                );
                CREATE INDEX libro_categorias_categoria ON libro_categorias (categoria_id);
                "#,
        }]
    }
}

/// Create a new instance of the libros module
pub fn create_module(
    libros: Arc<dyn BookStore>,
    categorias: Arc<dyn CategoryStore>,
) -> Arc<dyn Module> {
    Arc::new(LibrosModule::new(libros, categorias))
}
