//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the front-controller handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Resolve each request path through the route table
//! - Swap in new route tables on config reload
//!
//! # Design Decisions
//! - The route table lives behind `ArcSwap`: handlers never block on reload
//! - A reloaded config whose routes fail to compile is dropped and the
//!   previous table keeps serving

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    routing::any,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, ApplicationConfig};
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::response::DispatchResponse;
use crate::routing::{Dispatch, LinkBuilder, RouteError, RouteTable};

/// Everything a request needs that can change on reload.
#[derive(Debug, Clone)]
pub struct Runtime {
    pub table: RouteTable,
    /// Optional route names, parallel to the table's rules.
    pub names: Vec<Option<String>>,
    pub app: ApplicationConfig,
    pub links: LinkBuilder,
}

impl Runtime {
    pub fn from_config(config: &AppConfig) -> Result<Self, RouteError> {
        Ok(Self {
            table: RouteTable::from_config(&config.routes)?,
            names: config.routes.iter().map(|r| r.name.clone()).collect(),
            app: config.app.clone(),
            links: LinkBuilder::new(&config.app.base_url).with_named(config.app.urls.clone()),
        })
    }

    /// Resolve `path` and split the result into a dispatch decision.
    pub fn dispatch(&self, path: &str, request_id: Option<String>) -> DispatchResponse {
        let matched = self.table.find(path);
        let (rule, resolved) = match matched {
            Some(m) => (Some(m.index), m.path),
            None => (None, path.strip_suffix('/').unwrap_or(path).to_string()),
        };

        let dispatch = Dispatch::from_path(
            &resolved,
            &self.app.default_controller,
            &self.app.default_action,
        );
        let link = self.links.link_to_dispatch(&dispatch);

        DispatchResponse {
            request_id,
            path: path.to_string(),
            resolved,
            rule,
            rule_name: rule.and_then(|i| self.names.get(i).cloned().flatten()),
            dispatch,
            link,
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<Runtime>>,
}

/// HTTP front controller.
pub struct HttpServer {
    state: AppState,
    request_timeout: Duration,
}

impl HttpServer {
    /// Compile the configured routes. Fails if any route is invalid.
    pub fn new(config: &AppConfig) -> Result<Self, RouteError> {
        let runtime = Runtime::from_config(config)?;
        tracing::info!(routes = runtime.table.len(), "Route table compiled");

        Ok(Self {
            state: AppState {
                inner: Arc::new(ArcSwap::from_pointee(runtime)),
            },
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(&self) -> Router {
        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(self.state.clone())
            .layer(TimeoutLayer::new(self.request_timeout))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Configurations arriving on `config_updates` replace the live route
    /// table. Listener and timeout changes need a restart.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match Runtime::from_config(&config) {
                    Ok(runtime) => {
                        let routes = runtime.table.len();
                        state.inner.store(Arc::new(runtime));
                        tracing::info!(routes, "Route table reloaded");
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            "Reloaded routes failed to compile, keeping current table"
                        );
                    }
                }
            }
        });

        let app = self.build_router();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Front-controller handler: every path lands here.
async fn dispatch_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Json<DispatchResponse> {
    let runtime = state.inner.load();
    let path = request.uri().path();
    let id = request_id(&request).map(str::to_string);

    let response = runtime.dispatch(path, id);

    tracing::debug!(
        request_id = response.request_id.as_deref().unwrap_or("unknown"),
        path = %response.path,
        resolved = %response.resolved,
        rule = ?response.rule,
        controller = %response.dispatch.controller,
        action = %response.dispatch.action,
        "Request dispatched"
    );

    Json(response)
}
