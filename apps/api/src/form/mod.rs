// Job application form: field definitions, submission rules, per-field
// auto-fill state, and the HTTP handlers that expose them.
// Auto-fill goes through flows::auto_fill, never straight to the model.

pub mod fields;
pub mod handlers;
pub mod session;
pub mod validation;
