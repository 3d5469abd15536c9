//! Axum route handlers for the Flow API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::flows::FlowDescriptor;
use crate::state::AppState;

/// GET /api/v1/flows
///
/// Lists every flow with its input and output schema.
pub async fn handle_list_flows(State(state): State<AppState>) -> Json<Vec<FlowDescriptor>> {
    Json(state.flows.descriptors())
}

/// POST /api/v1/flows/:name
///
/// Runs one flow. The body is the flow's input object; the response is its
/// validated output object.
pub async fn handle_invoke_flow(
    State(state): State<AppState>,
    Path(name): Path<String>,
    AppJson(input): AppJson<Value>,
) -> Result<Json<Value>, AppError> {
    let flow = state
        .flows
        .get(&name)
        .ok_or_else(|| AppError::NotFound(format!("Flow '{name}' not found")))?;

    let output = flow.invoke(state.model.as_ref(), input).await?;
    Ok(Json(output))
}
