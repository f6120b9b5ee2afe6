// Route table for the dashboard service
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    apply_filter, dashboard_page, dashboard_view, export_csv, health_check,
};
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/apply", post(apply_filter))
        .route("/export", get(export_csv))
        .route("/api/view", get(dashboard_view))
        .route("/healthz", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::reading_source::{ReadingSource, SourceError};
    use crate::domain::query::{DateRange, QueryContext};
    use crate::domain::reading::Reading;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use tower::ServiceExt;

    struct FakeSource {
        rows: Vec<Reading>,
        fail: bool,
        seen: Mutex<Vec<(QueryContext, DateRange)>>,
    }

    #[async_trait]
    impl ReadingSource for FakeSource {
        async fn fetch_readings(
            &self,
            context: &QueryContext,
            range: &DateRange,
        ) -> Result<Vec<Reading>, SourceError> {
            self.seen
                .lock()
                .unwrap()
                .push((context.clone(), range.clone()));
            if self.fail {
                Err(SourceError::NotOk)
            } else {
                Ok(self.rows.clone())
            }
        }
    }

    fn fake_source(rows: Vec<Reading>, fail: bool) -> Arc<FakeSource> {
        Arc::new(FakeSource {
            rows,
            fail,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn app(source: Arc<FakeSource>) -> Router {
        let state = Arc::new(AppState {
            dashboard_service: DashboardService::new(source, "DEFAULT".to_string()),
            refresh_interval_secs: 60,
        });
        build_router(state)
    }

    fn sample_rows() -> Vec<Reading> {
        vec![Reading::new("2024-01-01", "10:00", Some(70.0), Some(97.0), Some(3.0))]
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = app(fake_source(Vec::new(), false))
            .oneshot(get_request("/healthz"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");
    }

    #[tokio::test]
    async fn page_load_resolves_context_from_url() {
        let source = fake_source(sample_rows(), false);
        let response = app(source.clone())
            .oneshot(get_request("/?key=abc&patientId=P1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Conectado"));
        assert!(html.contains("<td>70</td>"));

        let (context, _) = source.seen.lock().unwrap()[0].clone();
        assert_eq!(context, QueryContext::new("abc", Some("P1".to_string())));
    }

    #[tokio::test]
    async fn failed_fetch_renders_error_state() {
        let response = app(fake_source(Vec::new(), true))
            .oneshot(get_request("/"))
            .await
            .unwrap();

        let html = body_string(response).await;
        assert!(html.contains("Error de conexión"));
        assert!(html.contains("Sin datos…"));
    }

    #[tokio::test]
    async fn apply_redirects_to_canonical_url_and_forwards_filters() {
        let source = fake_source(sample_rows(), false);
        let request = Request::builder()
            .method("POST")
            .uri("/apply?key=abc&lang=es")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("patientId=P-2&from=2024-01-01&to="))
            .unwrap();

        let response = app(source.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/?key=abc&lang=es&patientId=P-2"
        );

        let (context, range) = source.seen.lock().unwrap().last().cloned().unwrap();
        assert_eq!(context.key, "abc");
        assert_eq!(context.patient_id.as_deref(), Some("P-2"));
        assert_eq!(range.from.as_deref(), Some("2024-01-01"));
        assert_eq!(range.to, None);
    }

    #[tokio::test]
    async fn apply_after_load_keeps_url_key() {
        let source = fake_source(sample_rows(), false);
        let router = app(source.clone());

        let response = router
            .clone()
            .oneshot(get_request("/?key=X"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .method("POST")
            .uri("/apply?key=X")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("patientId=P-3&from=&to="))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/?key=X&patientId=P-3");

        let seen = source.seen.lock().unwrap();
        assert!(seen.iter().all(|(context, _)| context.key == "X"));
        assert_eq!(
            seen.last().map(|(context, _)| context.clone()),
            Some(QueryContext::new("X", Some("P-3".to_string())))
        );
    }

    #[tokio::test]
    async fn export_downloads_csv() {
        let response = app(fake_source(sample_rows(), false))
            .oneshot(get_request("/export"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"historial_fetalalert.csv\""
        );
        assert_eq!(
            body_string(response).await,
            "FECHA,HORA,FC,SpO2,PATADAS\n2024-01-01,10:00,70,97,3"
        );
    }

    #[tokio::test]
    async fn export_without_rows_shows_notice() {
        let response = app(fake_source(Vec::new(), false))
            .oneshot(get_request("/export"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
        assert!(body_string(response).await.contains("No hay datos para exportar"));
    }

    #[tokio::test]
    async fn view_endpoint_returns_json_model() {
        let router = app(fake_source(sample_rows(), false));
        router
            .clone()
            .oneshot(get_request("/"))
            .await
            .unwrap();

        let response = router.oneshot(get_request("/api/view")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["connection"], "ok");
        assert_eq!(json["banner"], "in_range");
        assert_eq!(json["summary"]["heart_rate"], "70");
        assert_eq!(json["table"].as_array().unwrap().len(), 1);
    }
}
