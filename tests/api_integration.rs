//! HTTP-level tests driving the full router in-process.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use form_dashboard::services::{DocumentConverter, DocxConverter};
use form_dashboard::{build_router, AppState, Config};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "----form-dashboard-test";

struct TestApp {
    router: Router,
    dir: TempDir,
}

async fn build_test_app() -> TestApp {
    build_test_app_with(|_| {}).await
}

async fn build_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let templates = dir.path().join("templates");
    std::fs::create_dir_all(&templates).unwrap();
    std::fs::write(
        templates.join("contato.toml"),
        r#"
name = "contato"

[[fields]]
name = "Idade"
kind = "number"

[[fields]]
name = "Cor"
kind = "list"
options = ["Azul", "Verde"]
"#,
    )
    .unwrap();

    let mut config = Config {
        upload_dir: dir.path().join("uploads").display().to_string(),
        export_dir: dir.path().join("exports").display().to_string(),
        template_dir: templates.display().to_string(),
        ..Config::default()
    };
    configure(&mut config);
    let state = AppState::initialize(config).await.unwrap();

    TestApp {
        router: build_router(Arc::new(state)),
        dir,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes.to_vec())
}

async fn get_json(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, _, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn multipart_body(filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(filename: &str, content: &[u8]) -> Request<Body> {
    Request::post("/documents/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(filename, content)))
        .unwrap()
}

fn files_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ── Navigation ─────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let app = build_test_app().await;
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_menu_lists_six_entries() {
    let app = build_test_app().await;
    let (status, body) = get_json(&app, "/api/menu").await;
    assert_eq!(status, StatusCode::OK);

    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 6);
    assert_eq!(body["default_index"], 0);
    assert_eq!(entries[0]["slug"], "dashboard");
    assert_eq!(entries[2]["slug"], "criacao-form");
}

#[tokio::test]
async fn test_views_resolve_builder_or_placeholder() {
    let app = build_test_app().await;

    let (status, body) = get_json(&app, "/api/views/criacao-form").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "form_builder");

    let (status, body) = get_json(&app, "/api/views/historico").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["view"], "placeholder");

    let (status, body) = get_json(&app, "/api/views/nada").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "view_not_found");
}

// ── Form sessions ──────────────────────────────────────────────

#[tokio::test]
async fn test_session_build_and_submit() {
    let app = build_test_app().await;

    let (status, page) = post_json(&app, "/api/sessions", json!({})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(page["state"], "empty");
    assert!(page["form"].is_null());
    let id = page["session_id"].as_str().unwrap().to_string();

    let (status, page) = post_json(
        &app,
        &format!("/api/sessions/{}/actions", id),
        json!({ "action": "add_field" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["state"], "has_fields");
    let field = &page["schema"]["fields"][0];
    assert_eq!(field["name"], "Campo 1");
    assert_eq!(field["kind"], "text");
    let field_id = field["id"].as_u64().unwrap();

    let (status, page) = post_json(
        &app,
        &format!("/api/sessions/{}/actions", id),
        json!({ "action": "rename", "field": field_id, "name": "Nome" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["schema"]["fields"][0]["name"], "Nome");

    let (status, submission) = post_json(
        &app,
        &format!("/api/sessions/{}/submit", id),
        json!({ "answers": { (field_id.to_string()): "Ana" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submission["message"], "Respostas registradas com sucesso!");
    assert_eq!(submission["responses"], json!({ "Nome": "Ana" }));
}

#[tokio::test]
async fn test_session_from_template_uses_defaults_on_submit() {
    let app = build_test_app().await;

    let (status, names) = get_json(&app, "/api/templates").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names, json!(["contato"]));

    let (status, page) = post_json(&app, "/api/sessions", json!({ "template": "contato" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = page["session_id"].as_str().unwrap().to_string();

    let (status, submission) =
        post_json(&app, &format!("/api/sessions/{}/submit", id), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submission["responses"], json!({ "Idade": 0, "Cor": "Azul" }));
}

#[tokio::test]
async fn test_session_errors() {
    let app = build_test_app().await;

    let (status, body) = get_json(&app, "/api/sessions/00000000-0000-0000-0000-000000000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "session_not_found");

    let (status, body) = post_json(&app, "/api/sessions", json!({ "template": "nope" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "template_not_found");

    let (_, page) = post_json(&app, "/api/sessions", json!({})).await;
    let id = page["session_id"].as_str().unwrap().to_string();
    let (status, body) = post_json(
        &app,
        &format!("/api/sessions/{}/actions", id),
        json!({ "action": "remove_field_at", "index": -1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "index_out_of_range");
}

#[tokio::test]
async fn test_delete_session() {
    let app = build_test_app().await;
    let (_, page) = post_json(&app, "/api/sessions", json!({})).await;
    let id = page["session_id"].as_str().unwrap().to_string();

    let request = Request::delete(format!("/api/sessions/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get_json(&app, &format!("/api/sessions/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Documents ──────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_page_shows_flash() {
    let app = build_test_app().await;
    let request = Request::get("/documents?flash=invalid_format")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Formato inválido. Envie um arquivo .docx."));
}

#[tokio::test]
async fn test_upload_docx_returns_edit_page_and_persists() {
    let app = build_test_app().await;
    let docx = DocxConverter
        .html_to_docx("<h1>Relatório</h1><p>Corpo do texto</p>", "Teste")
        .unwrap();

    let (status, _, body) = send(&app, upload_request("Relatório Final.docx", &docx)).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("Corpo do texto"));
    assert!(html.contains("name=\"html_content\""));

    assert_eq!(
        files_in(&app.dir.path().join("uploads")),
        vec!["Relatorio_Final.docx".to_string()]
    );
}

#[tokio::test]
async fn test_upload_rejects_wrong_extension_without_persisting() {
    let app = build_test_app().await;

    let (status, headers, _) = send(&app, upload_request("notas.txt", b"hello")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        headers[header::LOCATION],
        "/documents?flash=invalid_format"
    );
    assert!(files_in(&app.dir.path().join("uploads")).is_empty());
}

#[tokio::test]
async fn test_upload_rejects_corrupt_docx_without_persisting() {
    let app = build_test_app().await;

    let (status, headers, _) = send(&app, upload_request("quebrado.docx", b"not a zip")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        headers[header::LOCATION],
        "/documents?flash=invalid_format"
    );
    assert!(files_in(&app.dir.path().join("uploads")).is_empty());
}

#[tokio::test]
async fn test_upload_over_size_limit_is_rejected_without_persisting() {
    let app = build_test_app_with(|config| config.max_upload_bytes = 1024).await;
    let oversized = vec![b'x'; 4096];

    let (status, _, _) = send(&app, upload_request("grande.docx", &oversized)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(files_in(&app.dir.path().join("uploads")).is_empty());
}

#[tokio::test]
async fn test_upload_with_empty_filename() {
    let app = build_test_app().await;

    let (status, headers, _) = send(&app, upload_request("", b"")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        headers[header::LOCATION],
        "/documents?flash=empty_filename"
    );
}

#[tokio::test]
async fn test_export_returns_docx_and_keeps_copy() {
    let app = build_test_app().await;

    let request = Request::post("/documents/export")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(
            "html_content=%3Cp%3EOl%C3%A1%3C%2Fp%3E&original_filename=Relatorio.docx",
        ))
        .unwrap();
    let (status, headers, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"relatorio-editado-"));
    assert!(disposition.ends_with(".docx\""));

    let conversion = DocxConverter.docx_to_html(&body).unwrap();
    assert!(conversion.html.contains("Olá"));

    let exported = files_in(&app.dir.path().join("exports"));
    assert_eq!(exported.len(), 1);
    assert!(exported[0].starts_with("relatorio-editado-"));
}
