// Dashboard service - Resolve, fetch, present and export for one dashboard session
use crate::application::reading_source::ReadingSource;
use crate::domain::connection::ConnectionState;
use crate::domain::export::{CsvExport, ExportError, export_csv};
use crate::domain::query::{DateRange, QueryContext, canonical_query};
use crate::domain::reading::Reading;
use crate::domain::view::DashboardView;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
struct Session {
    context: QueryContext,
    range: DateRange,
    rows: Vec<Reading>,
    connection: ConnectionState,
    refreshed_at: Option<DateTime<Utc>>,
    fetched: bool,
}

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn ReadingSource>,
    default_key: String,
    session: Arc<RwLock<Session>>,
    generation: Arc<AtomicU64>,
}

impl DashboardService {
    pub fn new(source: Arc<dyn ReadingSource>, default_key: String) -> Self {
        let session = Session {
            context: QueryContext::new(default_key.clone(), None),
            range: DateRange::default(),
            rows: Vec::new(),
            connection: ConnectionState::Idle,
            refreshed_at: None,
            fetched: false,
        };

        Self {
            source,
            default_key,
            session: Arc::new(RwLock::new(session)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn context(&self) -> QueryContext {
        self.session.read().await.context.clone()
    }

    pub async fn date_range(&self) -> DateRange {
        self.session.read().await.range.clone()
    }

    /// Page load: resolve the context from the URL query and fetch when it
    /// changed or nothing has been fetched yet.
    pub async fn load_page(&self, query: &str) -> DashboardView {
        let context = QueryContext::from_query_string(query, &self.default_key);

        let needs_fetch = {
            let mut session = self.session.write().await;
            let changed = session.context != context;
            if changed {
                tracing::info!(
                    "Dashboard context changed: patient={:?}",
                    context.patient_id
                );
                session.context = context;
            }
            changed || !session.fetched
        };

        if needs_fetch {
            self.refresh().await;
        }

        self.view().await
    }

    /// Apply the filter form and return the canonical query string to show
    /// in the address bar. The key comes from `current_query`, falling back
    /// to the default one. The date range is kept in the session only.
    pub async fn apply_filter(
        &self,
        current_query: &str,
        patient_id: &str,
        range: DateRange,
    ) -> String {
        let canonical = {
            let context = QueryContext::from_query_string(current_query, &self.default_key)
                .with_patient_id(Some(patient_id.to_string()));
            let canonical =
                canonical_query(current_query, context.patient_id.as_deref(), &context.key);

            tracing::info!(
                "Applying filter: patient={:?}, from={:?}, to={:?}",
                context.patient_id,
                range.from,
                range.to
            );

            let mut session = self.session.write().await;
            session.context = context;
            session.range = range;
            canonical
        };

        self.refresh().await;
        canonical
    }

    /// One fetch cycle. Returns the rows of this fetch (empty on failure).
    ///
    /// The result is only applied to the session when no newer refresh was
    /// started in the meantime.
    pub async fn refresh(&self) -> Vec<Reading> {
        // Generation is issued under the lock that sets Idle.
        let (generation, context, range) = {
            let mut session = self.session.write().await;
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            session.connection = ConnectionState::Idle;
            (generation, session.context.clone(), session.range.clone())
        };

        let (rows, connection) = match self.source.fetch_readings(&context, &range).await {
            Ok(rows) => {
                tracing::debug!("Fetched {} readings (generation {})", rows.len(), generation);
                (rows, ConnectionState::Ok)
            }
            Err(e) => {
                tracing::warn!("Error fetching readings: {}", e);
                (Vec::new(), ConnectionState::Err)
            }
        };

        let mut session = self.session.write().await;
        if self.generation.load(Ordering::SeqCst) == generation {
            session.rows = rows.clone();
            session.connection = connection;
            session.refreshed_at = Some(Utc::now());
            session.fetched = true;
        } else {
            tracing::debug!("Discarding stale response from generation {}", generation);
        }

        rows
    }

    /// Re-fetch with the current filters and serialize the result.
    pub async fn export(&self) -> Result<CsvExport, ExportError> {
        let rows = self.refresh().await;
        export_csv(&rows).inspect_err(|e| tracing::info!("Export skipped: {}", e))
    }

    pub async fn view(&self) -> DashboardView {
        let session = self.session.read().await;
        DashboardView::build(&session.rows, session.connection, session.refreshed_at)
    }

    /// Refresh on every tick, without waiting for earlier cycles to finish.
    pub fn spawn_auto_refresh(&self, period: Duration) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let cycle = service.clone();
                tokio::spawn(async move {
                    cycle.refresh().await;
                });
            }
        })
    }
}
