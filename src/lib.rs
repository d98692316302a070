use std::any::Any;

use axum::http;
use axum::http::header;
use axum::http::{HeaderValue, StatusCode};
use axum::routing::get;
use axum::{Extension, Router};
use bytes::Bytes;
use http_body_util::Full;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::structs::{Settings, R};

pub mod envs;
pub mod handlers;
pub mod info;
pub mod ip;
pub mod structs;

pub use ip::{resolve, ForwardingInfo, HeaderLookup, Source, ValidationError};

/// The HTTP service configured from the environment.
pub fn app() -> Router {
    router(Settings::from_env())
}

/// Handlers need `ConnectInfo<SocketAddr>`, so serve the router with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn router(settings: Settings) -> Router {
    Router::new()
        .route("/", get(handlers::handle_ip))
        .route("/ip", get(handlers::handle_ip_text))
        .route("/info", get(handlers::handle_info))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(handle_panic))
                .layer(TraceLayer::new_for_http()),
        )
        .layer(ConcurrencyLimitLayer::new(*envs::CONCURRENCY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(Extension(settings))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> http::Response<Full<Bytes>> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error".to_string()
    };

    let body = R::error(-1, details);
    let body = serde_json::to_string(&body).unwrap_or_default();

    let mut response = http::Response::new(Full::from(body));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    #[tokio::test]
    async fn test_panic_is_json_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            HeaderValue::from_static("application/json")
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], -1);
        assert_eq!(body["message"], "boom");
    }

    #[test]
    fn test_panic_message_kinds() {
        let owned = handle_panic(Box::new(String::from("owned boom")));
        assert_eq!(owned.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let other = handle_panic(Box::new(42u8));
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
