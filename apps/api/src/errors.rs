use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::flows::FlowError;
use crate::form::validation::FieldIssue;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Form has {} invalid field(s)", .0.len())]
    InvalidForm(Vec<FieldIssue>),

    #[error("Model output error: {0}")]
    ModelOutput(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::InvalidInput { .. } => AppError::Validation(err.to_string()),
            FlowError::MalformedOutput { .. } | FlowError::InvalidOutput { .. } => {
                AppError::ModelOutput(err.to_string())
            }
            FlowError::Model(e) => AppError::Llm(e.to_string()),
            FlowError::Template(_) | FlowError::Encode { .. } => {
                AppError::Internal(anyhow::Error::new(err))
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidForm(issues) => {
                let body = Json(json!({
                    "error": {
                        "code": "FORM_INVALID",
                        "message": self.to_string(),
                        "fields": issues
                    }
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::ModelOutput(msg) => {
                tracing::warn!("Model output error: {msg}");
                (StatusCode::BAD_GATEWAY, "MODEL_OUTPUT_INVALID", msg.clone())
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::schema::SchemaError;
    use crate::llm_client::LlmError;

    #[test]
    fn test_input_error_maps_to_bad_request() {
        let err: AppError = FlowError::InvalidInput {
            flow: "autoFillFormField",
            source: SchemaError::MissingField { field: "fieldLabel" },
        }
        .into();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("fieldLabel")));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_output_error_maps_to_bad_gateway() {
        let err: AppError = FlowError::InvalidOutput {
            flow: "summarizeFormData",
            source: SchemaError::MissingField { field: "summary" },
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_provider_message_is_kept() {
        let err: AppError = FlowError::Model(LlmError::Api {
            status: 401,
            message: "invalid x-api-key".to_string(),
        })
        .into();
        assert!(matches!(err, AppError::Llm(ref m) if m.contains("invalid x-api-key")));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
