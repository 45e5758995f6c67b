use crate::modules::categorias::Category;

/// Scalar fields of a book, exactly as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub titulo: String,
    pub autor: Option<String>,
    pub paginas: Option<i64>,
    pub fecha_publicacion: Option<String>,
}

impl BookFields {
    /// Fields with only a title set
    pub fn titled(titulo: impl Into<String>) -> Self {
        Self {
            titulo: titulo.into(),
            autor: None,
            paginas: None,
            fecha_publicacion: None,
        }
    }
}

/// A stored book together with the categories it is filed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub fields: BookFields,
    /// Ordered by category id
    pub categorias: Vec<Category>,
}

/// A write request for the book store.
///
/// `id: None` inserts a new book; `Some(id)` overwrites that book. Either
/// way the association set becomes exactly `categoria_ids`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub id: Option<i64>,
    pub fields: BookFields,
    pub categoria_ids: Vec<i64>,
}
