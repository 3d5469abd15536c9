//! Summarize the values a user has entered into a form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::flows::schema::{FieldKind, FieldSpec, Shape};
use crate::flows::template::TemplateError;
use crate::flows::PromptFlow;

pub const NAME: &str = "summarizeFormData";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeFormInput {
    /// Form field id → filled value.
    pub form_data: BTreeMap<String, String>,
    pub form_context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizeFormOutput {
    pub summary: String,
}

pub const INPUT_SHAPE: Shape = Shape::new(&[
    FieldSpec::required(
        "formData",
        FieldKind::StringMap,
        "A record of form field IDs to their filled values.",
    ),
    FieldSpec::required(
        "formContext",
        FieldKind::String,
        "The context of the form (e.g., job application, loan application).",
    ),
]);

pub const OUTPUT_SHAPE: Shape = Shape::new(&[FieldSpec::required(
    "summary",
    FieldKind::String,
    "A concise summary of the data filled in the form.",
)]);

pub const PROMPT_TEMPLATE: &str = r#"You are an AI assistant designed to summarize data from forms.

Based on the data provided ({{{formData}}}) and the context of the form ({{{formContext}}}), create a concise summary of the information provided in the form.

The summary should highlight key details and provide an overview of the filled data.
"#;

pub fn flow() -> Result<PromptFlow<SummarizeFormInput, SummarizeFormOutput>, TemplateError> {
    PromptFlow::new(
        NAME,
        "Summarizes filled-in form values for review.",
        INPUT_SHAPE,
        OUTPUT_SHAPE,
        PROMPT_TEMPLATE,
    )
}
