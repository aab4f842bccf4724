use crate::config::ReportConfig;
use crate::handlers;
use crate::services::ReportService;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::metrics_middleware;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: ReportConfig,
    pub reports: Arc<ReportService>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: ReportConfig) -> Result<Self, AppError> {
        let reports = Arc::new(ReportService::new(&config.template.path));

        // A broken template artifact must not take the process down:
        // probes keep answering and renders surface the defect as 503.
        if let Err(e) = reports.warm_up() {
            tracing::error!(
                error = %e,
                path = %config.template.path,
                "Report template failed to compile at startup"
            );
        }

        let state = AppState {
            config: config.clone(),
            reports,
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            .route("/reports/usage", post(handlers::generate_usage_report))
            .layer(middleware::from_fn(metrics_middleware))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
