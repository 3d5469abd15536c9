//! Auto-fill a single form field from its label, the page, and optional user info.

use serde::{Deserialize, Serialize};

use crate::flows::schema::{FieldKind, FieldSpec, Shape};
use crate::flows::template::TemplateError;
use crate::flows::PromptFlow;

pub const NAME: &str = "autoFillFormField";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFillFormFieldInput {
    pub field_label: String,
    pub page_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFillFormFieldOutput {
    pub filled_value: String,
    pub confidence_score: f64,
}

pub const INPUT_SHAPE: Shape = Shape::new(&[
    FieldSpec::required(
        "fieldLabel",
        FieldKind::String,
        "The label or context of the form field to be filled.",
    ),
    FieldSpec::required(
        "pageContent",
        FieldKind::String,
        "The content of the current web page for context.",
    ),
    FieldSpec::optional(
        "userInfo",
        FieldKind::String,
        "Optional user information to personalize the filling.",
    ),
]);

pub const OUTPUT_SHAPE: Shape = Shape::new(&[
    FieldSpec::required(
        "filledValue",
        FieldKind::String,
        "The AI-generated value to fill the form field with.",
    ),
    FieldSpec::required(
        "confidenceScore",
        FieldKind::Number,
        "A score indicating the confidence level of the AI in the filled value.",
    ),
]);

pub const PROMPT_TEMPLATE: &str = r#"You are an AI assistant designed to help users quickly fill out job application forms.

You will be provided with the label or context of a form field, the content of the current web page, and optional user information.
Your goal is to generate the most relevant and accurate value for the field based on the provided information.

Field Label: {{{fieldLabel}}}
Page Content: {{{pageContent}}}
User Information: {{{userInfo}}}

Provide the filled value and a confidence score (0-1) indicating the accuracy of the filled value.
Ensure that the filled value is appropriate and relevant to the context of the form field.
"#;

pub type AutoFillFlow = PromptFlow<AutoFillFormFieldInput, AutoFillFormFieldOutput>;

pub fn flow() -> Result<AutoFillFlow, TemplateError> {
    PromptFlow::new(
        NAME,
        "Generates a value for a form field from its label and the page context.",
        INPUT_SHAPE,
        OUTPUT_SHAPE,
        PROMPT_TEMPLATE,
    )
}
