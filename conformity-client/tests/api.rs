//! Client tests against an in-process stub of the comparison service

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use conformity_client::{ClientError, ComparisonClient};
use conformity_core::domain::job::{JobStatus, SessionId};
use serde_json::{Value, json};

async fn status(Path(id): Path<String>) -> impl IntoResponse {
    match id.as_str() {
        "running" => Json(json!({"status": "processing", "progress": 40})).into_response(),
        "embedded" => Json(json!({
            "status": "completed",
            "total_compliance": 87,
            "conclusion": "OK",
            "report": [{
                "requirement": "Пункт 1.2",
                "status": "не соответствует ТЗ",
                "criticality": "Критическое",
                "analysis": "Используется MySQL вместо PostgreSQL"
            }]
        }))
        .into_response(),
        "legacy" => Json(json!({"status": "completed"})).into_response(),
        "broken" => Json(json!({"status": "error", "error_message": "disk full"})).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"detail": "Сессия не найдена"}))).into_response(),
    }
}

async fn errors(Path(_id): Path<String>) -> Json<Value> {
    Json(json!({
        "errors": [
            {"requirement": "A", "status": "соответствует", "criticality": "low", "analysis": "ok"},
            {"requirement": "B", "status": "не соответствует", "criticality": "high", "analysis": "no", "section": "Раздел 2"}
        ]
    }))
}

async fn download(Path(id): Path<String>) -> impl IntoResponse {
    match id.as_str() {
        "empty" => Vec::<u8>::new().into_response(),
        "missing" => (StatusCode::NOT_FOUND, Json(json!({"detail": "Отчет не найден"}))).into_response(),
        _ => b"%PDF-1.4 report".to_vec().into_response(),
    }
}

async fn explain(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"explanation": format!("simple: {}", body["requirement"].as_str().unwrap_or(""))}))
}

async fn detailed_explain(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "explanation": format!(
            "- Причина: {}\n- Рекомендация: {}",
            body["requirement"].as_str().unwrap_or(""),
            body["session_id"].as_str().unwrap_or("")
        )
    }))
}

async fn find_in_document(Json(body): Json<Value>) -> Json<Value> {
    if body["requirement"] == "present" {
        Json(json!({"found": true, "results": [{"content": "4.2 Хранилище: PostgreSQL 15"}]}))
    } else {
        Json(json!({"found": false, "results": []}))
    }
}

async fn compare() -> Json<Value> {
    Json(json!({"status": "processing", "session_id": "new-session"}))
}

async fn spawn_stub() -> ComparisonClient {
    let app = Router::new()
        .route("/status/{id}", get(status))
        .route("/errors/{id}", get(errors))
        .route("/download-report/{id}", get(download))
        .route("/explain", post(explain))
        .route("/detailed-explain", post(detailed_explain))
        .route("/find-in-document", post(find_in_document))
        .route("/compare", post(compare));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("stub address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    ComparisonClient::new(format!("http://{}", addr))
}

fn session(id: &str) -> SessionId {
    SessionId::parse(id).unwrap()
}

#[tokio::test]
async fn test_get_status_normalizes_payloads() {
    let client = spawn_stub().await;

    assert_eq!(
        client.get_status(&session("running")).await.unwrap(),
        JobStatus::Processing { progress: 40.0 }
    );
    assert_eq!(
        client.get_status(&session("broken")).await.unwrap(),
        JobStatus::Failed {
            message: "disk full".to_string()
        }
    );
}

#[tokio::test]
async fn test_api_error_carries_detail() {
    let client = spawn_stub().await;

    let err = client.get_status(&session("nope")).await.unwrap_err();
    assert!(err.is_not_found());
    match err {
        ClientError::ApiError { message, .. } => assert_eq!(message, "Сессия не найдена"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_report_prefers_embedded_report() {
    let client = spawn_stub().await;

    let report = client.fetch_report(&session("embedded")).await.unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].analysis, "Используется MySQL вместо PostgreSQL");
}

#[tokio::test]
async fn test_fetch_report_falls_back_to_errors_endpoint() {
    let client = spawn_stub().await;

    let report = client.fetch_report(&session("legacy")).await.unwrap();
    assert_eq!(report.len(), 2);
    assert!(report[0].is_compliant());
    assert_eq!(report[1].section(), "Раздел 2");
}

#[tokio::test]
async fn test_fetch_report_refuses_running_job() {
    let client = spawn_stub().await;

    let err = client.fetch_report(&session("running")).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_download_report() {
    let client = spawn_stub().await;
    let dir = tempfile::tempdir().unwrap();

    let path = client.save_report(&session("ready"), dir.path()).await.unwrap();
    assert_eq!(path.file_name().unwrap(), "report_ready.pdf");
    assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4 report");
}

#[tokio::test]
async fn test_download_rejects_empty_file() {
    let client = spawn_stub().await;

    let err = client.download_report(&session("empty")).await.unwrap_err();
    assert!(matches!(err, ClientError::EmptyBody));

    let err = client.download_report(&session("missing")).await.unwrap_err();
    assert!(err.to_string().contains("Отчет не найден"));
}

#[tokio::test]
async fn test_explain_endpoints() {
    let client = spawn_stub().await;

    assert_eq!(client.explain("R1").await.unwrap(), "simple: R1");
    assert_eq!(
        client.detailed_explain("R1", &session("s-9")).await.unwrap(),
        "- Причина: R1\n- Рекомендация: s-9"
    );
}

#[tokio::test]
async fn test_find_in_document() {
    let client = spawn_stub().await;

    let found = client
        .find_in_document("present", &session("s"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found[0].content, "4.2 Хранилище: PostgreSQL 15");

    assert!(
        client
            .find_in_document("absent", &session("s"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_submit_comparison() -> anyhow::Result<()> {
    let client = spawn_stub().await;
    let dir = tempfile::tempdir()?;
    let spec = dir.path().join("tz.docx");
    let project = dir.path().join("project.pdf");
    std::fs::write(&spec, b"spec")?;
    std::fs::write(&project, b"project")?;

    let session = client.submit_comparison(&spec, &project).await?;
    assert_eq!(session.as_str(), "new-session");

    let bad = dir.path().join("notes.xlsx");
    std::fs::write(&bad, b"x")?;
    let err = client.submit_comparison(&spec, &bad).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));
    Ok(())
}
