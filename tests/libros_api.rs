//! Integration tests for the book endpoints, run against both store backends

mod common;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

async fn servers() -> Vec<TestServer> {
    vec![common::memory_server(), common::sql_server().await]
}

async fn create_category(server: &TestServer, nombre: &str) {
    server
        .post("/v1/categorias/crear")
        .json(&json!({ "nombre_categoria": nombre }))
        .await
        .assert_status(StatusCode::CREATED);
}

async fn create_book(server: &TestServer, body: Value) -> Value {
    let response = server.post("/v1/libros/crear").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_list_books_empty() {
    for server in servers().await {
        let response = server.get("/v1/libros").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body, json!([]));
    }
}

#[tokio::test]
async fn test_create_drops_unknown_categories() {
    for server in servers().await {
        create_category(&server, "Ficción").await;

        let libro = create_book(
            &server,
            json!({ "titulo": "Dune", "categorias": ["Ficción", "NoExiste"] }),
        )
        .await;

        assert!(libro["id"].is_i64());
        assert_eq!(libro["titulo"], "Dune");
        assert_eq!(libro["autor"], Value::Null);
        assert_eq!(libro["paginas"], Value::Null);
        assert_eq!(libro["categorias"], json!(["Ficción"]));
    }
}

#[tokio::test]
async fn test_get_book_round_trips_scalars() {
    for server in servers().await {
        let created = create_book(
            &server,
            json!({
                "titulo": "Rayuela",
                "autor": "Julio Cortázar",
                "paginas": 600,
                "fecha_publicacion": "1963-06-28"
            }),
        )
        .await;

        let response = server.get(&format!("/v1/libros/{}", created["id"])).await;
        response.assert_status_ok();
        let fetched: Value = response.json();

        assert_eq!(fetched, created);
        assert_eq!(fetched["autor"], "Julio Cortázar");
        assert_eq!(fetched["paginas"], 600);
        assert_eq!(fetched["categorias"], json!([]));
    }
}

#[tokio::test]
async fn test_list_orders_books_by_id() {
    for server in servers().await {
        let first = create_book(&server, json!({ "titulo": "Uno" })).await;
        let second = create_book(&server, json!({ "titulo": "Dos" })).await;

        let libros: Vec<Value> = server.get("/v1/libros").await.json();
        let ids: Vec<&Value> = libros.iter().map(|libro| &libro["id"]).collect();
        assert_eq!(ids, vec![&first["id"], &second["id"]]);
    }
}

#[tokio::test]
async fn test_update_replaces_category_set() {
    for server in servers().await {
        for nombre in ["A", "B", "C"] {
            create_category(&server, nombre).await;
        }
        let libro = create_book(
            &server,
            json!({ "titulo": "Dune", "autor": "Frank Herbert", "categorias": ["A", "B"] }),
        )
        .await;
        let url = format!("/v1/libros/{}", libro["id"]);

        let response = server
            .put(&url)
            .json(&json!({ "titulo": "Dune Messiah", "categorias": ["C"] }))
            .await;

        response.assert_status_ok();
        let updated: Value = response.json();
        assert_eq!(updated["id"], libro["id"]);
        assert_eq!(updated["titulo"], "Dune Messiah");
        assert_eq!(updated["autor"], Value::Null);
        assert_eq!(updated["categorias"], json!(["C"]));

        let fetched: Value = server.get(&url).await.json();
        assert_eq!(fetched, updated);
    }
}

#[tokio::test]
async fn test_update_with_empty_list_clears_categories() {
    for server in servers().await {
        create_category(&server, "Ensayo").await;
        let libro = create_book(&server, json!({ "titulo": "X", "categorias": ["Ensayo"] })).await;

        let response = server
            .put(&format!("/v1/libros/{}", libro["id"]))
            .json(&json!({ "titulo": "X", "categorias": [] }))
            .await;

        response.assert_status_ok();
        let updated: Value = response.json();
        assert_eq!(updated["categorias"], json!([]));
    }
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    for server in servers().await {
        let libro = create_book(&server, json!({ "titulo": "Efímero" })).await;
        let url = format!("/v1/libros/{}", libro["id"]);

        let response = server.delete(&url).await;
        response.assert_status(StatusCode::NO_CONTENT);
        assert!(response.as_bytes().is_empty());

        server.get(&url).await.assert_status(StatusCode::NOT_FOUND);
        server.delete(&url).await.assert_status(StatusCode::NOT_FOUND);

        let libros: Vec<Value> = server.get("/v1/libros").await.json();
        assert!(libros.is_empty());
    }
}

#[tokio::test]
async fn test_missing_book_is_not_found() {
    for server in servers().await {
        let response = server.get("/v1/libros/9999").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "not_found");
        assert_eq!(body["error"]["message"], "Libro no encontrado");
    }
}

#[tokio::test]
async fn test_update_missing_book_is_not_found_even_with_bad_body() {
    for server in servers().await {
        server
            .put("/v1/libros/9999")
            .json(&json!({ "titulo": "Nada" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .put("/v1/libros/9999")
            .bytes(Bytes::from_static(b"{not json"))
            .content_type("application/json")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_create_without_title_lists_field_errors() {
    for server in servers().await {
        let response = server
            .post("/v1/libros/crear")
            .json(&json!({ "paginas": "300", "categorias": "Ficción" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(
            body["error"]["details"],
            json!([
                { "field": "titulo", "error": "required" },
                { "field": "paginas", "error": "invalid_type" },
                { "field": "categorias", "error": "invalid_list" }
            ])
        );

        let libros: Vec<Value> = server.get("/v1/libros").await.json();
        assert!(libros.is_empty());
    }
}

#[tokio::test]
async fn test_update_with_null_title_is_rejected() {
    for server in servers().await {
        let libro = create_book(&server, json!({ "titulo": "Original" })).await;
        let url = format!("/v1/libros/{}", libro["id"]);

        let response = server.put(&url).json(&json!({ "titulo": null })).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(
            body["error"]["details"],
            json!([{ "field": "titulo", "error": "null" }])
        );

        let fetched: Value = server.get(&url).await.json();
        assert_eq!(fetched["titulo"], "Original");
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    for server in servers().await {
        let response = server
            .post("/v1/libros/crear")
            .bytes(Bytes::from_static(b"{\"titulo\": "))
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "bad_request");
    }
}

#[tokio::test]
async fn test_non_object_body_is_bad_request() {
    for server in servers().await {
        server
            .post("/v1/libros/crear")
            .json(&json!(["Dune"]))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_non_integer_id_is_bad_request() {
    for server in servers().await {
        let response = server.get("/v1/libros/abc").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "bad_request");
    }
}

#[tokio::test]
async fn test_client_supplied_id_is_ignored() {
    for server in servers().await {
        let libro = create_book(&server, json!({ "id": 777, "titulo": "Dune" })).await;
        assert_ne!(libro["id"], 777);
    }
}

#[tokio::test]
async fn test_long_category_list_keeps_only_known_names() {
    for server in servers().await {
        create_category(&server, "Ficción").await;

        let mut categorias: Vec<String> = (0..40_000).map(|i| format!("NoExiste-{i}")).collect();
        categorias.push("Ficción".to_string());

        let libro = create_book(&server, json!({ "titulo": "Dune", "categorias": categorias })).await;
        assert_eq!(libro["categorias"], json!(["Ficción"]));

        let response = server
            .put(&format!("/v1/libros/{}", libro["id"]))
            .json(&json!({ "titulo": "Dune", "categorias": categorias }))
            .await;
        response.assert_status_ok();
        let updated: Value = response.json();
        assert_eq!(updated["categorias"], json!(["Ficción"]));
    }
}
