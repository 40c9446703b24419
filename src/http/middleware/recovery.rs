//! Recovery middleware.
//!
//! Outermost pipeline stage. Converts a panic anywhere in the inner stages
//! into a generic 500 response and one logged diagnostic, so a faulting
//! handler can never tear down the serving process or reset the connection.

use std::any::Any;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;

/// Guard the inner stages against panics.
///
/// A response produced by the inner stages passes through untouched; the
/// 500 here is written only when the panic left no response behind (first
/// writer wins). Holds no state between invocations.
pub async fn recover_panics(request: Request, next: Next) -> Response {
    // AssertUnwindSafe: the inner future owns all its state, nothing outside
    // this frame can observe it after an unwind.
    match std::panic::AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            tracing::error!(panic = panic_message(&panic), "handler panicked");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("opaque panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn faulty_handler() -> &'static str {
        panic!("injected fault");
    }

    fn app() -> Router {
        Router::new()
            .route("/boom", get(faulty_handler))
            .route("/ok", get(|| async { "fine" }))
            .layer(middleware::from_fn(recover_panics))
    }

    #[tokio::test]
    async fn panic_becomes_500() {
        let response = app()
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Internal Server Error");
    }

    #[tokio::test]
    async fn serving_continues_after_panic() {
        let app = app();
        let _ = app
            .clone()
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let response = app
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn success_response_passes_through() {
        let response = app()
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"fine");
    }

    #[test]
    fn panic_message_handles_common_payloads() {
        let s: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(panic_message(s.as_ref()), "static str");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let other: Box<dyn Any + Send> = Box::new(7u32);
        assert_eq!(panic_message(other.as_ref()), "opaque panic payload");
    }
}
