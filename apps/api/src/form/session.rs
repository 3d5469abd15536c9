//! Form state and the per-field auto-fill state machine.
//!
//! Each field moves idle → pending when an auto-fill is requested and back to
//! idle when every outstanding request for it has completed. Fields never
//! share state, so a response for one field cannot touch another.
//!
//! A user edit made while a request is pending wins over the late response.
//! Two auto-fill requests for the same field with no edit in between are
//! applied in completion order, so the last one to finish wins.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::form::fields::FormField;
use crate::form::validation::{validate_application, FieldIssue, JobApplication};

/// Field → current value, as exchanged with the client.
pub type FormValues = BTreeMap<FormField, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Idle,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub variant: ToastVariant,
    pub title: String,
    pub description: String,
}

impl Toast {
    pub fn autofilled(field: FormField) -> Self {
        Self {
            variant: ToastVariant::Default,
            title: format!("Auto-filled {field}"),
            description: format!("Successfully auto-filled {field} with AI."),
        }
    }

    pub fn autofill_failed(field: FormField, message: impl fmt::Display) -> Self {
        Self {
            variant: ToastVariant::Destructive,
            title: "Error".to_string(),
            description: format!("Failed to auto-fill {field}. {message}"),
        }
    }

    pub fn autofill_discarded(field: FormField) -> Self {
        Self {
            variant: ToastVariant::Default,
            title: format!("Kept your edits to {field}"),
            description: format!("The AI suggestion for {field} arrived after you edited it."),
        }
    }

    pub fn submitted() -> Self {
        Self {
            variant: ToastVariant::Default,
            title: "Form submitted.".to_string(),
            description: "Your information has been successfully submitted.".to_string(),
        }
    }
}

/// Handle for one outstanding auto-fill request. Consumed on completion.
#[derive(Debug)]
pub struct AutoFillTicket {
    field: FormField,
    edit_revision: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoFillOutcome {
    Applied(Toast),
    /// The user edited the field after the request started.
    Discarded(Toast),
    Failed(Toast),
}

impl AutoFillOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            AutoFillOutcome::Applied(_) => "applied",
            AutoFillOutcome::Discarded(_) => "discarded",
            AutoFillOutcome::Failed(_) => "failed",
        }
    }

    pub fn into_toast(self) -> Toast {
        match self {
            AutoFillOutcome::Applied(t)
            | AutoFillOutcome::Discarded(t)
            | AutoFillOutcome::Failed(t) => t,
        }
    }
}

#[derive(Debug, Default)]
struct FieldSlot {
    value: String,
    in_flight: usize,
    /// Bumped on every user edit.
    edit_revision: u64,
}

/// Field name → current value, plus per-field auto-fill bookkeeping.
#[derive(Debug)]
pub struct FormSession {
    slots: BTreeMap<FormField, FieldSlot>,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSession {
    pub fn new() -> Self {
        Self {
            slots: FormField::ALL
                .into_iter()
                .map(|f| (f, FieldSlot::default()))
                .collect(),
        }
    }

    /// Restores a session from values held by the client. Missing fields are empty.
    pub fn from_values(values: FormValues) -> Self {
        let mut session = Self::new();
        for (field, value) in values {
            session.edit(field, value);
        }
        session
    }

    pub fn values(&self) -> FormValues {
        self.slots
            .iter()
            .map(|(field, slot)| (*field, slot.value.clone()))
            .collect()
    }

    fn slot(&self, field: FormField) -> &FieldSlot {
        &self.slots[&field]
    }

    fn slot_mut(&mut self, field: FormField) -> &mut FieldSlot {
        self.slots.entry(field).or_default()
    }

    pub fn value(&self, field: FormField) -> &str {
        &self.slot(field).value
    }

    pub fn status(&self, field: FormField) -> FieldStatus {
        if self.slot(field).in_flight > 0 {
            FieldStatus::Pending
        } else {
            FieldStatus::Idle
        }
    }

    /// A user keystroke or paste.
    pub fn edit(&mut self, field: FormField, value: impl Into<String>) {
        let slot = self.slot_mut(field);
        slot.value = value.into();
        slot.edit_revision += 1;
    }

    pub fn begin_autofill(&mut self, field: FormField) -> AutoFillTicket {
        let slot = self.slot_mut(field);
        slot.in_flight += 1;
        AutoFillTicket {
            field,
            edit_revision: slot.edit_revision,
        }
    }

    /// Applies the response for `ticket`. On failure the field value is left
    /// unchanged.
    pub fn complete_autofill<E: fmt::Display>(
        &mut self,
        ticket: AutoFillTicket,
        result: Result<String, E>,
    ) -> AutoFillOutcome {
        let field = ticket.field;
        let slot = self.slot_mut(field);
        slot.in_flight = slot.in_flight.saturating_sub(1);

        match result {
            Err(e) => AutoFillOutcome::Failed(Toast::autofill_failed(field, e)),
            Ok(_) if slot.edit_revision != ticket.edit_revision => {
                debug!(%field, "Discarding auto-fill response after user edit");
                AutoFillOutcome::Discarded(Toast::autofill_discarded(field))
            }
            Ok(value) => {
                slot.value = value;
                AutoFillOutcome::Applied(Toast::autofilled(field))
            }
        }
    }

    pub fn application(&self) -> JobApplication {
        let cover_letter = self.value(FormField::CoverLetter);
        JobApplication {
            full_name: self.value(FormField::FullName).to_string(),
            email: self.value(FormField::Email).to_string(),
            cover_letter: (!cover_letter.is_empty()).then(|| cover_letter.to_string()),
        }
    }

    pub fn submit(&self) -> Result<Toast, Vec<FieldIssue>> {
        validate_application(&self.application())?;
        Ok(Toast::submitted())
    }
}
