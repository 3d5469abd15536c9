//! Submission rules for the job application form.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::form::fields::FormField;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email regex")
});

/// Counted in UTF-16 code units, like the browser-side length check.
const FULL_NAME_MIN_UNITS: usize = 2;

/// A submitted application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: FormField,
    pub message: String,
}

pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL.is_match(email)
}

/// Validates every field, returning all issues at once.
pub fn validate_application(application: &JobApplication) -> Result<(), Vec<FieldIssue>> {
    let mut issues = Vec::new();

    if application.full_name.encode_utf16().count() < FULL_NAME_MIN_UNITS {
        issues.push(FieldIssue {
            field: FormField::FullName,
            message: "Full Name must be at least 2 characters.".to_string(),
        });
    }

    if !is_valid_email(&application.email) {
        issues.push(FieldIssue {
            field: FormField::Email,
            message: "Please enter a valid email address.".to_string(),
        });
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
