//! Suggest content for a form field given its id, label, and surrounding context.

use serde::{Deserialize, Serialize};

use crate::flows::schema::{FieldKind, FieldSpec, Shape};
use crate::flows::template::TemplateError;
use crate::flows::PromptFlow;

pub const NAME: &str = "suggestRelevantContent";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestContentInput {
    pub field_id: String,
    pub field_label: String,
    pub field_context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestContentOutput {
    pub suggested_content: String,
}

pub const INPUT_SHAPE: Shape = Shape::new(&[
    FieldSpec::required("fieldId", FieldKind::String, "The ID of the form field."),
    FieldSpec::required("fieldLabel", FieldKind::String, "The label of the form field."),
    FieldSpec::required(
        "fieldContext",
        FieldKind::String,
        "The context of the form field (e.g., job title, company name).",
    ),
    FieldSpec::optional("userData", FieldKind::String, "User-provided data for context."),
]);

pub const OUTPUT_SHAPE: Shape = Shape::new(&[FieldSpec::required(
    "suggestedContent",
    FieldKind::String,
    "The AI-generated content suggested for the form field.",
)]);

// fieldId is accepted for the caller's bookkeeping; the prompt does not use it.
pub const PROMPT_TEMPLATE: &str = r#"You are an AI assistant designed to help users fill out job application forms.

Based on the context of the form field ({{{fieldContext}}}), its label ({{{fieldLabel}}}), and any available user data ({{{userData}}}), generate relevant content for the field.

Provide a concise and accurate suggestion.
"#;

pub fn flow() -> Result<PromptFlow<SuggestContentInput, SuggestContentOutput>, TemplateError> {
    PromptFlow::new(
        NAME,
        "Suggests concise content for a form field from its label and context.",
        INPUT_SHAPE,
        OUTPUT_SHAPE,
        PROMPT_TEMPLATE,
    )
}
