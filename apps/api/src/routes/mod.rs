pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::flows::handlers as flow_handlers;
use crate::form::handlers as form_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Flow API
        .route("/api/v1/flows", get(flow_handlers::handle_list_flows))
        .route("/api/v1/flows/:name", post(flow_handlers::handle_invoke_flow))
        // Form API
        .route("/api/v1/form", get(form_handlers::handle_form_definition))
        .route(
            "/api/v1/form/autofill/:field",
            post(form_handlers::handle_autofill),
        )
        .route("/api/v1/form/submit", post(form_handlers::handle_submit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::flows::FlowRegistry;
    use crate::llm_client::testing::ScriptedModel;

    fn app(model: Arc<ScriptedModel>) -> Router {
        build_router(AppState {
            model,
            flows: Arc::new(FlowRegistry::new().unwrap()),
        })
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let raw = body.map(|b| b.to_string()).unwrap_or_default();
        send_raw(app, method, uri, raw).await
    }

    async fn send_raw(app: Router, method: &str, uri: &str, raw: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(raw))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let model = Arc::new(ScriptedModel::replying("{}"));
        let (status, body) = send(app(model), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_flows_includes_schemas() {
        let model = Arc::new(ScriptedModel::replying("{}"));
        let (status, body) = send(app(model), "GET", "/api/v1/flows", None).await;
        assert_eq!(status, StatusCode::OK);

        let flows = body.as_array().unwrap();
        assert_eq!(flows.len(), 4);
        let auto_fill = flows
            .iter()
            .find(|f| f["name"] == "autoFillFormField")
            .unwrap();
        assert_eq!(auto_fill["inputSchema"][2]["name"], "userInfo");
        assert_eq!(auto_fill["inputSchema"][2]["required"], false);
        assert_eq!(auto_fill["outputSchema"][1]["kind"], "number");
    }

    #[tokio::test]
    async fn test_invoke_flow_end_to_end() {
        let model = Arc::new(ScriptedModel::replying(
            r#"{"filledValue": "jane@example.com", "confidenceScore": 0.9}"#,
        ));
        let (status, body) = send(
            app(model.clone()),
            "POST",
            "/api/v1/flows/autoFillFormField",
            Some(json!({
                "fieldLabel": "Email Address",
                "pageContent": "Job Application Form",
                "userInfo": "User applying for a job"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"filledValue": "jane@example.com", "confidenceScore": 0.9})
        );
        let prompt = &model.calls()[0].prompt;
        assert!(prompt.contains("Email Address"));
        assert!(prompt.contains("Job Application Form"));
        assert!(prompt.contains("User applying for a job"));
    }

    #[tokio::test]
    async fn test_invoke_unknown_flow_is_not_found() {
        let model = Arc::new(ScriptedModel::replying("{}"));
        let (status, body) =
            send(app(model), "POST", "/api/v1/flows/translate", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invoke_with_missing_field_is_bad_request() {
        let model = Arc::new(ScriptedModel::replying("{}"));
        let (status, body) = send(
            app(model.clone()),
            "POST",
            "/api/v1/flows/populateFieldFromDescription",
            Some(json!({"pageContent": "Job Application Form"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invoke_with_bad_model_output_is_bad_gateway() {
        let model = Arc::new(ScriptedModel::replying(r#"{"filledValue": 42}"#));
        let (status, body) = send(
            app(model),
            "POST",
            "/api/v1/flows/autoFillFormField",
            Some(json!({"fieldLabel": "Full Name", "pageContent": "Job Application Form"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "MODEL_OUTPUT_INVALID");
    }

    #[tokio::test]
    async fn test_invoke_with_provider_failure_is_bad_gateway() {
        let model = Arc::new(ScriptedModel::failing(529, "Overloaded"));
        let (status, body) = send(
            app(model),
            "POST",
            "/api/v1/flows/autoFillFormField",
            Some(json!({"fieldLabel": "Email Address", "pageContent": "Job Application Form"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert!(body["error"]["message"].as_str().unwrap().contains("Overloaded"));
    }

    #[tokio::test]
    async fn test_invoke_with_malformed_json_is_bad_request() {
        let model = Arc::new(ScriptedModel::replying("{}"));
        let (status, body) = send_raw(
            app(model.clone()),
            "POST",
            "/api/v1/flows/autoFillFormField",
            r#"{"fieldLabel": "#.to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_form_definition_lists_three_fields() {
        let model = Arc::new(ScriptedModel::replying("{}"));
        let (status, body) = send(app(model), "GET", "/api/v1/form", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["fullName", "email", "coverLetter"]);
    }

    #[tokio::test]
    async fn test_autofill_field_updates_only_that_field() {
        let model = Arc::new(ScriptedModel::replying(
            r#"{"filledValue": "Dear hiring team, ...", "confidenceScore": 0.7}"#,
        ));
        let (status, body) = send(
            app(model.clone()),
            "POST",
            "/api/v1/form/autofill/coverLetter",
            Some(json!({"values": {"fullName": "Jane", "email": ""}})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "applied");
        assert_eq!(body["status"], "idle");
        assert_eq!(body["confidenceScore"], 0.7);
        assert_eq!(body["values"]["coverLetter"], "Dear hiring team, ...");
        assert_eq!(body["values"]["fullName"], "Jane");
        assert_eq!(body["toast"]["title"], "Auto-filled coverLetter");
        assert!(model.calls()[0].prompt.contains("Field Label: Cover Letter"));
    }

    #[tokio::test]
    async fn test_autofill_failure_keeps_value_and_returns_error_toast() {
        let model = Arc::new(ScriptedModel::failing(500, "upstream exploded"));
        let (status, body) = send(
            app(model),
            "POST",
            "/api/v1/form/autofill/fullName",
            Some(json!({"values": {"fullName": "Jane"}})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "failed");
        assert_eq!(body["confidenceScore"], Value::Null);
        assert_eq!(body["values"]["fullName"], "Jane");
        assert_eq!(body["toast"]["variant"], "destructive");
        let description = body["toast"]["description"].as_str().unwrap();
        assert!(description.starts_with("Failed to auto-fill fullName. "));
        assert!(description.contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_autofill_unknown_field_is_not_found() {
        let model = Arc::new(ScriptedModel::replying("{}"));
        let (status, _) = send(
            app(model.clone()),
            "POST",
            "/api/v1/form/autofill/phone",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_autofill_without_body_starts_from_empty_values() {
        let model = Arc::new(ScriptedModel::replying(
            r#"{"filledValue": "jane@example.com", "confidenceScore": 0.9}"#,
        ));
        let (status, body) = send(app(model), "POST", "/api/v1/form/autofill/email", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "applied");
        assert_eq!(body["values"]["email"], "jane@example.com");
        assert_eq!(body["values"]["fullName"], "");
    }

    #[tokio::test]
    async fn test_autofill_with_malformed_json_is_bad_request() {
        let model = Arc::new(ScriptedModel::replying("{}"));
        let (status, body) = send_raw(
            app(model.clone()),
            "POST",
            "/api/v1/form/autofill/email",
            "{not json".to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_submit_with_malformed_json_is_bad_request() {
        let model = Arc::new(ScriptedModel::replying("{}"));
        let (status, body) =
            send_raw(app(model), "POST", "/api/v1/form/submit", "[1, 2".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_submit_valid_application() {
        let model = Arc::new(ScriptedModel::replying("{}"));
        let (status, body) = send(
            app(model),
            "POST",
            "/api/v1/form/submit",
            Some(json!({"fullName": "Jane Doe", "email": "jane@example.com", "coverLetter": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["toast"]["title"], "Form submitted.");
    }

    #[tokio::test]
    async fn test_submit_invalid_application_lists_fields() {
        let model = Arc::new(ScriptedModel::replying("{}"));
        let (status, body) = send(
            app(model),
            "POST",
            "/api/v1/form/submit",
            Some(json!({"fullName": "J", "email": "jane"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "FORM_INVALID");
        let fields = body["error"]["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["field"], "fullName");
        assert_eq!(
            fields[1]["message"],
            "Please enter a valid email address."
        );
    }
}
