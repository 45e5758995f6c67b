use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::modules::fields::{self, FieldErrors};

/// A named category books can be filed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub nombre_categoria: String,
}

/// Fields accepted when creating a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub nombre_categoria: String,
}

impl NewCategory {
    pub fn new(nombre_categoria: impl Into<String>) -> Self {
        Self {
            nombre_categoria: nombre_categoria.into(),
        }
    }

    /// Read a create payload; `id` and unknown keys are ignored
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let nombre_categoria = fields::required_string(payload, "nombre_categoria", &mut errors);
        errors.finish(|| Self {
            nombre_categoria: nombre_categoria.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_requires_name() {
        let payload = json!({ "id": 99 }).as_object().cloned().unwrap();
        let errors = NewCategory::from_payload(&payload).unwrap_err();
        assert_eq!(errors.errors()[0].field, "nombre_categoria");
    }

    #[test]
    fn payload_ignores_client_id() {
        let payload = json!({ "id": 99, "nombre_categoria": "Ficción" })
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(
            NewCategory::from_payload(&payload).unwrap(),
            NewCategory::new("Ficción")
        );
    }
}
