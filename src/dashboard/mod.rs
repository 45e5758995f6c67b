//! Text dashboard over the book API.
//!
//! Lists book titles with per-row "ver detalle" and "borrar" actions. All
//! calls are sequential and never retried.

use std::io::{self, Write};

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("request to the book API failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("book API answered {0}")]
    Status(StatusCode),
}

/// HTTP client for the dashboard
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: String,
}

impl DashboardClient {
    /// `base_url` includes the API prefix, e.g. `http://127.0.0.1:8000/v1`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the book list once. Anything but a 200 is an error.
    pub async fn fetch_books(&self) -> Result<Vec<Value>, DashboardError> {
        let response = self
            .http
            .get(format!("{}/libros", self.base_url))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(DashboardError::Status(response.status()));
        }

        Ok(response.json::<Vec<Value>>().await?)
    }

    /// Render the book list with the actions available for each row
    pub async fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Bienvenidxs a mi librería")?;

        let libros = match self.fetch_books().await {
            Ok(libros) => libros,
            Err(err) => {
                tracing::warn!(error = %err, base_url = %self.base_url, "book list unavailable");
                return writeln!(out, "No se encontraron libros");
            }
        };

        writeln!(out, "Estos son mis libros desde mi API:")?;
        for libro in &libros {
            let id = display_id(libro);
            writeln!(out, "Titulo: {}", display_title(libro))?;
            writeln!(out, "  [ver detalle {id}] [borrar {id}]")?;
        }

        Ok(())
    }

    /// Print the full entry for `id` from the fetched list; no per-book request is made
    pub async fn show_detail<W: Write>(&self, id: i64, out: &mut W) -> io::Result<()> {
        let libros = match self.fetch_books().await {
            Ok(libros) => libros,
            Err(err) => {
                tracing::warn!(error = %err, base_url = %self.base_url, "book list unavailable");
                return writeln!(out, "No se encontraron libros");
            }
        };

        match libros.iter().find(|libro| libro["id"].as_i64() == Some(id)) {
            Some(libro) => {
                let pretty = serde_json::to_string_pretty(libro).map_err(io::Error::other)?;
                writeln!(out, "{pretty}")
            }
            None => writeln!(out, "No se encontró el libro {id}"),
        }
    }

    /// Delete a book and report the outcome. Returns whether the API answered 204.
    pub async fn delete<W: Write>(&self, id: i64, out: &mut W) -> io::Result<bool> {
        let deleted = match self
            .http
            .delete(format!("{}/libros/{}", self.base_url, id))
            .send()
            .await
        {
            Ok(response) => response.status() == StatusCode::NO_CONTENT,
            Err(err) => {
                tracing::warn!(error = %err, libro_id = id, "delete request failed");
                false
            }
        };

        if deleted {
            writeln!(out, "Libro {id} borrado")?;
        } else {
            writeln!(out, "No se pudo borrar el libro {id}")?;
        }
        Ok(deleted)
    }
}

fn display_id(libro: &Value) -> String {
    match &libro["id"] {
        Value::Null => "?".to_string(),
        id => id.to_string(),
    }
}

fn display_title(libro: &Value) -> &str {
    libro["titulo"].as_str().unwrap_or("(sin título)")
}
