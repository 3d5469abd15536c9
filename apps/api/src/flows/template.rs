//! Prompt template rendering.
//!
//! Templates use Handlebars triple-stash placeholders (`{{{fieldLabel}}}`),
//! rendered without escaping. Before rendering, every field of the input
//! shape is put into the context explicitly:
//!
//! - strings and numbers as-is,
//! - string records as compact JSON text,
//! - absent or `null` optional fields as the empty string.
//!
//! Rendering runs in strict mode, so a variable outside the shape is an error
//! instead of a silent blank.

use std::sync::LazyLock;

use handlebars::Handlebars;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::flows::schema::{FieldKind, Shape};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\{?\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}?\}\}").expect("placeholder regex")
});

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{template}' references '{placeholder}', which is not an input field")]
    UnknownPlaceholder {
        template: &'static str,
        placeholder: String,
    },

    #[error("template '{template}' failed to compile: {source}")]
    Compile {
        template: &'static str,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("template '{template}' failed to render: {source}")]
    Render {
        template: &'static str,
        #[source]
        source: Box<handlebars::RenderError>,
    },
}

/// A compiled prompt template bound to one input shape.
pub struct PromptTemplate {
    name: &'static str,
    shape: Shape,
    registry: Handlebars<'static>,
}

impl PromptTemplate {
    /// Compiles `source`, rejecting placeholders that name no field of `shape`.
    pub fn compile(
        name: &'static str,
        source: &'static str,
        shape: Shape,
    ) -> Result<Self, TemplateError> {
        for caps in PLACEHOLDER.captures_iter(source) {
            let placeholder = &caps[1];
            if shape.field(placeholder).is_none() {
                return Err(TemplateError::UnknownPlaceholder {
                    template: name,
                    placeholder: placeholder.to_string(),
                });
            }
        }

        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(name, source)
            .map_err(|e| TemplateError::Compile {
                template: name,
                source: Box::new(e),
            })?;

        Ok(Self {
            name,
            shape,
            registry,
        })
    }

    /// Renders the template for an input that already passed shape validation.
    pub fn render(&self, input: &Map<String, Value>) -> Result<String, TemplateError> {
        let context = self.render_context(input);
        self.registry
            .render(self.name, &Value::Object(context))
            .map_err(|e| TemplateError::Render {
                template: self.name,
                source: Box::new(e),
            })
    }

    fn render_context(&self, input: &Map<String, Value>) -> Map<String, Value> {
        self.shape
            .fields
            .iter()
            .map(|spec| {
                let value = match (spec.kind, input.get(spec.name)) {
                    (_, None | Some(Value::Null)) => Value::String(String::new()),
                    (FieldKind::StringMap, Some(record)) => Value::String(record.to_string()),
                    (_, Some(v)) => v.clone(),
                };
                (spec.name.to_string(), value)
            })
            .collect()
    }
}
