use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use libreria_http::{AppError, IdPath, JsonObject};

use super::models::{Category, NewCategory};
use super::store::CategoryStore;

/// Category routes. List and detail answer with or without a trailing slash.
pub fn router(store: Arc<dyn CategoryStore>) -> Router {
    Router::new()
        .route("/categorias", get(list_categories))
        .route("/categorias/", get(list_categories))
        .route("/categorias/crear", post(create_category))
        .route("/categorias/{id}", get(get_category))
        .route("/categorias/{id}/", get(get_category))
        .with_state(store)
}

async fn list_categories(
    State(store): State<Arc<dyn CategoryStore>>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(store.list().await?))
}

async fn create_category(
    State(store): State<Arc<dyn CategoryStore>>,
    JsonObject(payload): JsonObject,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let new = NewCategory::from_payload(&payload)
        .map_err(|errors| errors.into_app_error("Categoría inválida"))?;

    let categoria = store.create(new).await?;
    tracing::info!(
        categoria_id = categoria.id,
        nombre = %categoria.nombre_categoria,
        "categoria creada"
    );

    Ok((StatusCode::CREATED, Json(categoria)))
}

async fn get_category(
    State(store): State<Arc<dyn CategoryStore>>,
    IdPath(id): IdPath,
) -> Result<Json<Category>, AppError> {
    store
        .find(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Categoría no encontrada"))
}
