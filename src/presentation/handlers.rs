// HTTP request handlers
use crate::domain::query::DateRange;
use crate::infrastructure::http_response::{accepts_brotli, csv_download_response, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::page::{render_dashboard, render_notice};
use axum::{
    Form,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct FilterForm {
    #[serde(rename = "patientId", default)]
    pub patient_id: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Dashboard page (page load)
pub async fn dashboard_page(
    RawQuery(query): RawQuery,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let service = &state.dashboard_service;
    let view = service.load_page(query.as_deref().unwrap_or_default()).await;
    let context = service.context().await;
    let range = service.date_range().await;

    Html(render_dashboard(
        &view,
        context.patient_id.as_deref(),
        &range,
        &context.to_query_string(),
        state.refresh_interval_secs,
    ))
}

/// Apply the filter form, then send the browser to the canonical URL
pub async fn apply_filter(
    RawQuery(query): RawQuery,
    State(state): State<Arc<AppState>>,
    Form(form): Form<FilterForm>,
) -> impl IntoResponse {
    let range = DateRange::new(form.from.as_deref(), form.to.as_deref());
    let canonical = state
        .dashboard_service
        .apply_filter(query.as_deref().unwrap_or_default(), &form.patient_id, range)
        .await;

    Redirect::to(&format!("/?{}", canonical))
}

/// Re-fetch and download the history as CSV
pub async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.export().await {
        Ok(export) => match csv_download_response(export) {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) => {
            let context = state.dashboard_service.context().await;
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render_notice(&e.to_string(), &context.to_query_string())),
            )
                .into_response()
        }
    }
}

/// Latest presentation model as JSON
pub async fn dashboard_view(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    let view = state.dashboard_service.view().await;

    match json_response(&view, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
