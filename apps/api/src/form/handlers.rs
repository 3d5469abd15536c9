//! Axum route handlers for the application form.
//!
//! The form's values live on the client. Each request carries the values the
//! client currently holds and gets back the values after the operation.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::form::fields::{FieldDefinition, FormField, UnknownField};
use crate::form::session::{FieldStatus, FormSession, FormValues, Toast};
use crate::state::AppState;

/// Body of an auto-fill request. The body itself may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct AutoFillRequest {
    #[serde(default)]
    pub values: FormValues,
}

impl AutoFillRequest {
    fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("Invalid auto-fill request body: {e}")))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFillResponse {
    pub field: FormField,
    /// "applied" or "failed". Each request builds its own session, so the
    /// edit-wins "discarded" outcome cannot occur here.
    pub outcome: &'static str,
    pub confidence_score: Option<f64>,
    pub status: FieldStatus,
    pub values: FormValues,
    pub toast: Toast,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub toast: Toast,
}

/// GET /api/v1/form
pub async fn handle_form_definition() -> Json<Vec<FieldDefinition>> {
    Json(FormField::ALL.into_iter().map(FormField::definition).collect())
}

/// POST /api/v1/form/autofill/:field
///
/// Runs the auto-fill flow for one field. A failed model call is reported as
/// a destructive toast with the field left unchanged, not as an HTTP error.
pub async fn handle_autofill(
    State(state): State<AppState>,
    Path(field): Path<String>,
    body: Bytes,
) -> Result<Json<AutoFillResponse>, AppError> {
    let field: FormField = field
        .parse()
        .map_err(|e: UnknownField| AppError::NotFound(e.to_string()))?;
    let request = AutoFillRequest::from_body(&body)?;

    let mut session = FormSession::from_values(request.values);
    let ticket = session.begin_autofill(field);

    let result = state
        .flows
        .auto_fill()
        .run(state.model.as_ref(), &field.autofill_input())
        .await;

    let confidence_score = result.as_ref().ok().map(|out| out.confidence_score);
    if let Err(e) = &result {
        error!(%field, "Error during auto-fill: {e}");
    }

    let outcome = session.complete_autofill(ticket, result.map(|out| out.filled_value));
    info!(%field, outcome = outcome.kind(), "Auto-fill finished");

    Ok(Json(AutoFillResponse {
        field,
        outcome: outcome.kind(),
        confidence_score,
        status: session.status(field),
        values: session.values(),
        toast: outcome.into_toast(),
    }))
}

/// POST /api/v1/form/submit
pub async fn handle_submit(
    AppJson(values): AppJson<FormValues>,
) -> Result<Json<SubmitResponse>, AppError> {
    let session = FormSession::from_values(values);
    debug!(application = ?session.application(), "Application received");

    let toast = session.submit().map_err(AppError::InvalidForm)?;
    info!("Application submitted");

    Ok(Json(SubmitResponse { toast }))
}
