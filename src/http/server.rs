//! HTTP server setup and composition root.
//!
//! # Responsibilities
//! - Build the Axum router with one explicit stage list per route
//! - Wire Recovery → Instrumentation → Handler, in that nesting order
//! - Bind the server to a listener and serve with graceful shutdown
//!
//! The telemetry emitter arrives here by value and is cloned into the
//! per-route state; the server never reaches for process-global providers.

use axum::{
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{InjectionConfig, ServiceConfig};
use crate::http::handlers;
use crate::http::middleware::{instrument_request, recover_panics, RouteLabel};
use crate::telemetry::Emitter;

/// Application state injected into the pipeline and handlers.
#[derive(Clone)]
pub struct AppState {
    pub telemetry: Emitter,
    pub injection: InjectionConfig,
}

/// Wrap a route in the standard stage list.
///
/// Stages are listed outermost first: recovery guards everything below it,
/// instrumentation sits closest to the handler so business failures are
/// recorded before any guard can intervene. Built once at startup, reused
/// for every request.
pub fn instrumented_route(
    route: MethodRouter<AppState>,
    state: &AppState,
    label: &'static str,
) -> MethodRouter<AppState> {
    route.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(recover_panics))
            .layer(middleware::from_fn_with_state(
                (state.clone(), RouteLabel(label)),
                instrument_request,
            )),
    )
}

/// HTTP server for the instrumented API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and emitter.
    pub fn new(config: &ServiceConfig, telemetry: Emitter) -> Self {
        let state = AppState {
            telemetry,
            injection: config.injection.clone(),
        };
        Self {
            router: build_router(state),
        }
    }

    /// Run the server, accepting connections on the given listener until the
    /// shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all routes and middleware stages.
fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", instrumented_route(get(handlers::home_handler), &state, "home"))
        .route(
            "/user",
            instrumented_route(get(handlers::user_handler), &state, "user"),
        )
        .route(
            "/health",
            instrumented_route(get(handlers::health_handler), &state, "health"),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use opentelemetry_sdk::trace::TracerProvider;
    use tower::ServiceExt;

    fn test_state(injection: InjectionConfig) -> AppState {
        AppState {
            telemetry: Emitter::new(TracerProvider::builder().build()),
            injection,
        }
    }

    fn quick_injection(error_rate: f64) -> InjectionConfig {
        InjectionConfig {
            home_delay_max_ms: 1,
            backend_delay_max_ms: 1,
            error_rate,
        }
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn home_returns_fixed_body() {
        let app = build_router(test_state(quick_injection(0.0)));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, handlers::HOME_BODY);
    }

    #[tokio::test]
    async fn health_always_ok() {
        let app = build_router(test_state(quick_injection(1.0)));
        for _ in 0..5 {
            let response = app
                .clone()
                .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_string(response).await, "OK");
        }
    }

    #[tokio::test]
    async fn user_success_body_is_json() {
        let app = build_router(test_state(quick_injection(0.0)));
        let response = app
            .oneshot(Request::builder().uri("/user").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert_eq!(body, handlers::USER_BODY);
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["id"], 1);
        assert_eq!(parsed["name"], "Test User");
    }

    #[tokio::test]
    async fn user_error_path_is_500_with_fixed_body() {
        // error_rate 1.0 makes the simulated failure deterministic
        let app = build_router(test_state(quick_injection(1.0)));
        let response = app
            .oneshot(Request::builder().uri("/user").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, handlers::USER_ERROR_BODY);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = build_router(test_state(quick_injection(0.0)));
        let response = app
            .oneshot(Request::builder().uri("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
