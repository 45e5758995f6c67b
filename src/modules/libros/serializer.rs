//! Mapping between stored books and their JSON transport shape.
//!
//! Reads accept category *names*; writes to the store take category
//! references. Name resolution happens in the handler, between the two.

use libreria_db::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::models::{Book, BookDraft, BookFields};
use super::store::BookStore;
use crate::modules::categorias::Category;
use crate::modules::fields::{self, FieldErrors};

/// The JSON shape of a book on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRepresentation {
    pub id: i64,
    pub titulo: String,
    pub autor: Option<String>,
    pub paginas: Option<i64>,
    pub fecha_publicacion: Option<String>,
    /// Category names, not ids
    pub categorias: Vec<String>,
}

impl From<&Book> for BookRepresentation {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            titulo: book.fields.titulo.clone(),
            autor: book.fields.autor.clone(),
            paginas: book.fields.paginas,
            fecha_publicacion: book.fields.fecha_publicacion.clone(),
            categorias: book
                .categorias
                .iter()
                .map(|categoria| categoria.nombre_categoria.clone())
                .collect(),
        }
    }
}

/// A validated create/update payload, categories still unresolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPayload {
    pub fields: BookFields,
    pub categorias: Vec<String>,
}

impl BookPayload {
    /// Check field presence and types. Every scalar is read: optional ones
    /// absent from the payload come back as `None`. `id` and unknown keys
    /// are ignored.
    pub fn from_transport(payload: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let titulo = fields::required_string(payload, "titulo", &mut errors);
        let autor = fields::optional_string(payload, "autor", &mut errors);
        let paginas = fields::optional_integer(payload, "paginas", &mut errors);
        let fecha_publicacion = fields::optional_string(payload, "fecha_publicacion", &mut errors);
        let categorias = fields::string_list(payload, "categorias", &mut errors);

        errors.finish(|| Self {
            fields: BookFields {
                titulo: titulo.unwrap_or_default(),
                autor,
                paginas,
                fecha_publicacion,
            },
            categorias,
        })
    }
}

/// Persist a new book filed under exactly `categorias`
pub async fn create(
    store: &dyn BookStore,
    fields: BookFields,
    categorias: &[Category],
) -> Result<Book, StoreError> {
    store
        .save(BookDraft {
            id: None,
            fields,
            categoria_ids: categorias.iter().map(|c| c.id).collect(),
        })
        .await
}

/// Overwrite every scalar of `existing` and replace its category set
pub async fn update(
    store: &dyn BookStore,
    existing: &Book,
    fields: BookFields,
    categorias: &[Category],
) -> Result<Book, StoreError> {
    store
        .save(BookDraft {
            id: Some(existing.id),
            fields,
            categoria_ids: categorias.iter().map(|c| c.id).collect(),
        })
        .await
}
