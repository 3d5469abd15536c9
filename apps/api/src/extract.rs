//! Request extractors whose rejections use the `AppError` envelope.

use axum::extract::FromRequest;

use crate::errors::AppError;

/// `Json<T>` that rejects unreadable bodies with a 400 `VALIDATION_ERROR`
/// instead of axum's plain-text response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
