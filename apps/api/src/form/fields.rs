use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::flows::auto_fill::AutoFillFormFieldInput;

/// Page context sent with every auto-fill request from the application form.
pub const PAGE_CONTENT: &str = "Job Application Form";
pub const USER_INFO: &str = "User applying for a job";

/// The fields of the job application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FullName,
    Email,
    CoverLetter,
}

/// Client-facing rendering hints for one field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDefinition {
    pub name: FormField,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub multiline: bool,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::FullName, FormField::Email, FormField::CoverLetter];

    pub fn as_str(self) -> &'static str {
        match self {
            FormField::FullName => "fullName",
            FormField::Email => "email",
            FormField::CoverLetter => "coverLetter",
        }
    }

    /// Label sent to the model. Differs from the on-screen label for email.
    pub fn autofill_label(self) -> &'static str {
        match self {
            FormField::FullName => "Full Name",
            FormField::Email => "Email Address",
            FormField::CoverLetter => "Cover Letter",
        }
    }

    pub fn autofill_input(self) -> AutoFillFormFieldInput {
        AutoFillFormFieldInput {
            field_label: self.autofill_label().to_string(),
            page_content: PAGE_CONTENT.to_string(),
            user_info: Some(USER_INFO.to_string()),
        }
    }

    pub fn definition(self) -> FieldDefinition {
        match self {
            FormField::FullName => FieldDefinition {
                name: self,
                label: "Full Name",
                placeholder: "John Doe",
                description: "Enter your full name.",
                required: true,
                multiline: false,
            },
            FormField::Email => FieldDefinition {
                name: self,
                label: "Email",
                placeholder: "johndoe@example.com",
                description: "Enter your email address.",
                required: true,
                multiline: false,
            },
            FormField::CoverLetter => FieldDefinition {
                name: self,
                label: "Cover Letter",
                placeholder: "Write a brief cover letter...",
                description:
                    "Write a brief cover letter explaining why you are a good fit for this role.",
                required: false,
                multiline: true,
            },
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field for auto-fill: {0}")]
pub struct UnknownField(pub String);

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
