//! Web form and JSON API for running research queries.

mod pages;

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::InquestorError;
use crate::orchestrator::Orchestrator;
use crate::research::{ExtractionStrategy, ResearchExport, ResearchResult};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
    save_by_default: bool,
    log_name: String,
}

/// Run the web server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'inquestor doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Orchestrator::new(&settings)?;
    let log_name = orchestrator.log().path().display().to_string();

    let state = Arc::new(AppState {
        orchestrator,
        save_by_default: settings.output.save_by_default,
        log_name,
    });

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Inquestor");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Form", "GET  /");
    Output::kv("Research (JSON)", "POST /api/research");
    Output::kv("Health", "GET  /health");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(form_page).post(submit_form))
        .route("/download", post(download))
        .route("/api/research", post(research_api))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ResearchForm {
    #[serde(default)]
    query: String,
    /// Present only when the checkbox is ticked.
    save: Option<String>,
}

#[derive(Deserialize)]
struct DownloadForm {
    payload: String,
}

#[derive(Deserialize)]
struct ResearchRequest {
    query: String,
    #[serde(default)]
    save: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResearchResponse {
    structured: Option<ResearchResult>,
    raw_text: String,
    strategy: Option<ExtractionStrategy>,
    tool_calls: Vec<String>,
    iterations: usize,
    saved: bool,
    export: ResearchExport,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_status(e: &InquestorError) -> StatusCode {
    match e {
        InquestorError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn form_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(pages::form_page(state.save_by_default, &state.log_name))
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ResearchForm>,
) -> Response {
    let save = form.save.is_some();

    match state.orchestrator.research(&form.query, save).await {
        Ok(outcome) => Html(pages::result_page(
            &form.query,
            &outcome,
            save,
            &state.log_name,
        ))
        .into_response(),
        Err(e) => (
            error_status(&e),
            Html(pages::error_page(
                &form.query,
                &e.to_string(),
                save,
                &state.log_name,
            )),
        )
            .into_response(),
    }
}

async fn download(Form(form): Form<DownloadForm>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"research_result.json\"",
            ),
        ],
        form.payload,
    )
        .into_response()
}

async fn research_api(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResearchRequest>,
) -> Response {
    let save = req.save.unwrap_or(state.save_by_default);

    match state.orchestrator.research(&req.query, save).await {
        Ok(outcome) => Json(ResearchResponse {
            export: outcome.export(),
            structured: outcome.structured().cloned(),
            strategy: outcome.extraction.strategy,
            tool_calls: outcome.tool_calls.iter().map(|c| c.name.clone()).collect(),
            iterations: outcome.iterations,
            saved: outcome.saved_to.is_some(),
            raw_text: outcome.raw_text,
        })
        .into_response(),
        Err(e) => (
            error_status(&e),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentResponse, ResearchAgent};
    use crate::research::ResearchLog;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    struct FixedAgent(&'static str);

    #[async_trait]
    impl ResearchAgent for FixedAgent {
        async fn invoke(&self, _query: &str) -> crate::error::Result<AgentResponse> {
            Ok(AgentResponse {
                content: self.0.to_string(),
                tool_calls: Vec::new(),
                iterations: 1,
            })
        }
    }

    fn app(answer: &'static str, dir: &tempfile::TempDir) -> Router {
        let log = ResearchLog::new(dir.path().join("research_output.txt"));
        router(Arc::new(AppState {
            orchestrator: Orchestrator::with_agent(Arc::new(FixedAgent(answer)), log),
            save_by_default: false,
            log_name: "research_output.txt".to_string(),
        }))
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_api_structured() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(
            r#"Sure! {"topic":"X","summary":"Y","sources":["a"],"toolsUsed":[]}"#,
            &dir,
        );

        let response = app
            .oneshot(
                Request::post("/api/research")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"query":"x"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["structured"]["topic"], "X");
        assert_eq!(json["strategy"], "lenient");
        assert_eq!(json["export"]["sources"][0], "a");
        assert_eq!(json["saved"], false);
    }

    #[tokio::test]
    async fn test_api_empty_query_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let response = app("unused", &dir)
            .oneshot(
                Request::post("/api/research")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"query":"  "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_form_submit_raw_fallback_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let response = app("I could not complete the research.", &dir)
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("query=quantum+dots&save=on"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_string(response).await;
        assert!(page.contains("Could not parse structured output"));
        assert!(page.contains("I could not complete the research."));
        // Raw-only outcomes are never saved.
        assert!(!dir.path().join("research_output.txt").exists());
    }

    #[tokio::test]
    async fn test_download_is_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let response = app("unused", &dir)
            .oneshot(
                Request::post("/download")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("payload=%7B%22rawText%22%3A%22hi%22%7D"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"research_result.json\""
        );
        assert_eq!(body_string(response).await, r#"{"rawText":"hi"}"#);
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let response = app("unused", &dir)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
