use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{Number, Value};
use tracing::{error, warn};

use crate::ip::ValidationError;

/// Per-service settings handed to every handler as an `Extension`.
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    /// When false, forwarding headers are ignored and only the peer address is used.
    pub trust_forwarded: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            trust_forwarded: *crate::envs::TRUST_FORWARDED,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct R {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

impl R {
    pub fn ok(payload: Value) -> Self {
        Self {
            success: true,
            response: Some(payload),
            code: None,
            message: None,
        }
    }
    pub fn error(code: i32, message: String) -> Self {
        Self {
            success: false,
            response: None,
            code: Some(Value::Number(Number::from(code))),
            message: Some(Value::String(message)),
        }
    }
}

impl IntoResponse for R {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

pub struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        if self.0.is::<ValidationError>() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {:?}", self.0);
        } else {
            warn!("rejected request: {}", self.0);
        }
        let value = R::error(status.as_u16().into(), self.0.to_string());
        (status, Json(value)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_validation_error_is_bad_request() {
        let err = ValidationError {
            entry: "bogus".to_string(),
            header: "x-forwarded-for",
            value: "bogus, 1.2.3.4".to_string(),
        };
        let (status, body) = render(AppError::from(err)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], 400);
        assert!(body["message"].as_str().unwrap().contains("bogus"));
    }

    #[tokio::test]
    async fn test_other_error_is_internal() {
        let (status, body) = render(AppError::from(anyhow::anyhow!("encoder broke"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], 500);
        assert_eq!(body["message"], "encoder broke");
    }
}
