//! HTTP endpoint layer
//!
//! - `GET /`: service information
//! - `POST /analyze`: dead functions and classes of a repository
//! - `POST /create-pr`: analyze, then open a pull request removing them
//!
//! Every failure leaves here as a status code with a `{detail}` body.

use crate::analysis::AnalysisInvoker;
use crate::error::ServiceError;
use crate::pr_workflow::PrWorkflowDriver;
use crate::schema::{
    AnalyzeRequest, ApiInfo, CreatePrResponse, DeadSymbol, ErrorBody, RepositoryReference,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use std::sync::Arc;
use std::time::Instant;

/// Shared, read-only state of all handlers
#[derive(Clone)]
pub struct AppState {
    pub invoker: AnalysisInvoker,
    pub driver: Arc<PrWorkflowDriver>,
    /// GitHub host repository URLs must point at
    pub github_host: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api_info))
        .route("/analyze", post(analyze))
        .route("/create-pr", post(create_pr))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo::current())
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Vec<DeadSymbol>>, ServiceError> {
    let (repo, request) = parse_request(&state, payload)?;
    let symbols = state.invoker.analyze(&repo, request.language).await?;
    Ok(Json(symbols))
}

async fn create_pr(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<CreatePrResponse>, ServiceError> {
    let (repo, request) = parse_request(&state, payload)?;
    let symbols = state.invoker.analyze(&repo, request.language).await?;

    if symbols.is_empty() {
        info!("No dead code in {}, no pull request opened", repo);
        return Ok(Json(CreatePrResponse::nothing_to_remove()));
    }

    let result = state.driver.create_removal_pr(&repo, &symbols).await?;
    Ok(Json(CreatePrResponse::Created(result)))
}

fn parse_request(
    state: &AppState,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<(RepositoryReference, AnalyzeRequest), ServiceError> {
    let Json(request) = payload.map_err(|e| ServiceError::Validation(e.body_text()))?;
    let repo = RepositoryReference::parse(&request.repo_url, &state.github_host)?;
    Ok((repo, request))
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            detail: "Not Found".to_string(),
        }),
    )
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            detail: "Method Not Allowed".to_string(),
        }),
    )
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
