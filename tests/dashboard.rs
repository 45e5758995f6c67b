//! Dashboard client against a live catalog server

mod common;

use libreria_app::dashboard::DashboardClient;
use libreria_app::modules::categorias::NewCategory;
use libreria_app::modules::libros::{serializer, BookFields};
use libreria_app::Stores;
use tokio::net::TcpListener;

/// Serve `stores` on an ephemeral port and return the API base URL
async fn spawn_catalog(stores: &Stores) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let address = listener.local_addr().unwrap();
    let app = common::app(stores);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{address}/v1")
}

async fn seeded_stores() -> Stores {
    let stores = Stores::memory();
    let ficcion = stores
        .categorias
        .create(NewCategory::new("Ficción"))
        .await
        .unwrap();
    serializer::create(stores.libros.as_ref(), BookFields::titled("Dune"), &[ficcion])
        .await
        .unwrap();
    serializer::create(stores.libros.as_ref(), BookFields::titled("Rayuela"), &[])
        .await
        .unwrap();
    stores
}

fn printed(out: Vec<u8>) -> String {
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_render_lists_titles_with_actions() {
    let base_url = spawn_catalog(&seeded_stores().await).await;
    let client = DashboardClient::new(base_url);

    let mut out = Vec::new();
    client.render(&mut out).await.unwrap();
    let text = printed(out);

    assert!(text.starts_with("Bienvenidxs a mi librería\n"));
    assert!(text.contains("Estos son mis libros desde mi API:"));
    assert!(text.contains("Titulo: Dune"));
    assert!(text.contains("[ver detalle 1] [borrar 1]"));
    assert!(text.contains("Titulo: Rayuela"));
    assert!(text.contains("[ver detalle 2] [borrar 2]"));
    assert!(!text.contains("No se encontraron libros"));
}

#[tokio::test]
async fn test_render_with_empty_catalog_prints_header_only() {
    let base_url = spawn_catalog(&Stores::memory()).await;
    let client = DashboardClient::new(base_url);

    let mut out = Vec::new();
    client.render(&mut out).await.unwrap();

    assert_eq!(
        printed(out),
        "Bienvenidxs a mi librería\nEstos son mis libros desde mi API:\n"
    );
}

#[tokio::test]
async fn test_show_detail_prints_the_full_entry() {
    let base_url = spawn_catalog(&seeded_stores().await).await;
    let client = DashboardClient::new(base_url);

    let mut out = Vec::new();
    client.show_detail(1, &mut out).await.unwrap();
    let text = printed(out);

    let entry: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(entry["titulo"], "Dune");
    assert_eq!(entry["categorias"], serde_json::json!(["Ficción"]));

    let mut out = Vec::new();
    client.show_detail(99, &mut out).await.unwrap();
    assert_eq!(printed(out), "No se encontró el libro 99\n");
}

#[tokio::test]
async fn test_delete_reports_outcome_and_removes_row() {
    let stores = seeded_stores().await;
    let base_url = spawn_catalog(&stores).await;
    let client = DashboardClient::new(base_url);

    let mut out = Vec::new();
    assert!(client.delete(1, &mut out).await.unwrap());
    assert_eq!(printed(out), "Libro 1 borrado\n");

    let mut out = Vec::new();
    assert!(!client.delete(1, &mut out).await.unwrap());
    assert_eq!(printed(out), "No se pudo borrar el libro 1\n");

    let remaining = client.fetch_books().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["titulo"], "Rayuela");
}
