use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use libreria_http::{AppError, IdPath, JsonObject};
use serde_json::{Map, Value};

use super::serializer::{self, BookPayload, BookRepresentation};
use super::store::BookStore;
use crate::modules::categorias::{store::CategoryStore, Category};

/// Stores the book handlers work against
#[derive(Clone)]
pub struct LibrosState {
    pub libros: Arc<dyn BookStore>,
    pub categorias: Arc<dyn CategoryStore>,
}

pub fn router(state: LibrosState) -> Router {
    Router::new()
        .route("/libros", get(list_books))
        .route("/libros/crear", post(create_book))
        .route(
            "/libros/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(state)
}

/// Validate a payload and resolve its category names to stored categories.
/// Unknown names are dropped.
async fn read_payload(
    state: &LibrosState,
    payload: &Map<String, Value>,
) -> Result<(BookPayload, Vec<Category>), AppError> {
    let payload = BookPayload::from_transport(payload)
        .map_err(|errors| errors.into_app_error("Libro inválido"))?;

    let categorias = state.categorias.filter_by_names(&payload.categorias).await?;
    if categorias.len() < payload.categorias.len() {
        tracing::debug!(
            requested = payload.categorias.len(),
            matched = categorias.len(),
            "unknown category names dropped"
        );
    }

    Ok((payload, categorias))
}

async fn list_books(
    State(state): State<LibrosState>,
) -> Result<Json<Vec<BookRepresentation>>, AppError> {
    let libros = state.libros.list().await?;
    Ok(Json(libros.iter().map(BookRepresentation::from).collect()))
}

async fn create_book(
    State(state): State<LibrosState>,
    JsonObject(payload): JsonObject,
) -> Result<(StatusCode, Json<BookRepresentation>), AppError> {
    let (payload, categorias) = read_payload(&state, &payload).await?;

    let libro = serializer::create(state.libros.as_ref(), payload.fields, &categorias).await?;
    tracing::info!(
        libro_id = libro.id,
        categorias = libro.categorias.len(),
        "libro creado"
    );

    Ok((StatusCode::CREATED, Json(BookRepresentation::from(&libro))))
}

async fn get_book(
    State(state): State<LibrosState>,
    IdPath(id): IdPath,
) -> Result<Json<BookRepresentation>, AppError> {
    let libro = state
        .libros
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found("Libro no encontrado"))?;
    Ok(Json(BookRepresentation::from(&libro)))
}

async fn update_book(
    State(state): State<LibrosState>,
    IdPath(id): IdPath,
    body: Result<JsonObject, AppError>,
) -> Result<Json<BookRepresentation>, AppError> {
    // Existence is checked before the body is even looked at
    let existing = state
        .libros
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found("Libro no encontrado"))?;

    let JsonObject(payload) = body?;
    let (payload, categorias) = read_payload(&state, &payload).await?;

    let libro =
        serializer::update(state.libros.as_ref(), &existing, payload.fields, &categorias).await?;
    tracing::info!(
        libro_id = libro.id,
        categorias = libro.categorias.len(),
        "libro actualizado"
    );

    Ok(Json(BookRepresentation::from(&libro)))
}

async fn delete_book(
    State(state): State<LibrosState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, AppError> {
    if !state.libros.delete(id).await? {
        return Err(AppError::not_found("Libro no encontrado"));
    }

    tracing::info!(libro_id = id, "libro borrado");
    Ok(StatusCode::NO_CONTENT)
}
