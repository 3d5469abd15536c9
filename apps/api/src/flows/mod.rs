//! Flows: templated prompt invocations.
//!
//! A flow is one input shape, one prompt template, and one output shape:
//! validate input → render template → one model call → validate output.
//! All model calls go through `llm_client::CompletionModel`.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::flows::auto_fill::AutoFillFlow;
use crate::flows::schema::{SchemaError, Shape};
use crate::flows::template::{PromptTemplate, TemplateError};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, OUTPUT_SCHEMA_HEADER};
use crate::llm_client::{strip_json_fences, CompletionModel, LlmError};

pub mod auto_fill;
pub mod handlers;
pub mod populate_field;
pub mod schema;
pub mod suggest_content;
pub mod summarize_form;
pub mod template;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("invalid input for flow '{flow}': {source}")]
    InvalidInput {
        flow: &'static str,
        #[source]
        source: SchemaError,
    },

    #[error("model output for flow '{flow}' is not valid JSON: {source}")]
    MalformedOutput {
        flow: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("model output for flow '{flow}' does not match its schema: {source}")]
    InvalidOutput {
        flow: &'static str,
        #[source]
        source: SchemaError,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("flow '{flow}' could not encode its input: {source}")]
    Encode {
        flow: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Static description of a flow, served to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Shape,
    pub output_schema: Shape,
}

/// The untyped face of a flow, for dispatch by name.
#[async_trait]
pub trait Flow: Send + Sync {
    fn descriptor(&self) -> FlowDescriptor;

    async fn invoke(&self, model: &dyn CompletionModel, input: Value) -> Result<Value, FlowError>;
}

/// The generic templated prompt invocation.
///
/// `I` and `O` are the typed input and output records; `input_shape` and
/// `output_shape` are their declared wire contracts.
pub struct PromptFlow<I, O> {
    name: &'static str,
    description: &'static str,
    input_shape: Shape,
    output_shape: Shape,
    template: PromptTemplate,
    system_prompt: String,
    _types: PhantomData<fn(I) -> O>,
}

impl<I, O> PromptFlow<I, O>
where
    I: Serialize + Send + Sync,
    O: DeserializeOwned + Serialize + Send,
{
    pub fn new(
        name: &'static str,
        description: &'static str,
        input_shape: Shape,
        output_shape: Shape,
        template: &'static str,
    ) -> Result<Self, TemplateError> {
        let template = PromptTemplate::compile(name, template, input_shape)?;
        let system_prompt = format!(
            "{JSON_ONLY_SYSTEM}\n\n{OUTPUT_SCHEMA_HEADER}\n{}",
            output_shape.describe()
        );

        Ok(Self {
            name,
            description,
            input_shape,
            output_shape,
            template,
            system_prompt,
            _types: PhantomData,
        })
    }

    /// Validates `input` and renders the prompt the model would receive.
    pub fn render_prompt(&self, input: &Value) -> Result<String, FlowError> {
        self.input_shape
            .validate(input)
            .map_err(|source| FlowError::InvalidInput {
                flow: self.name,
                source,
            })?;
        let object = input.as_object().cloned().unwrap_or_default();
        Ok(self.template.render(&object)?)
    }

    /// Typed entry point.
    pub async fn run(&self, model: &dyn CompletionModel, input: &I) -> Result<O, FlowError> {
        let input = serde_json::to_value(input).map_err(|source| FlowError::Encode {
            flow: self.name,
            source,
        })?;
        let output = self.call(model, &input).await?;
        serde_json::from_value(output).map_err(|source| FlowError::MalformedOutput {
            flow: self.name,
            source,
        })
    }

    /// Shared round trip: returns the validated raw output object.
    async fn call(&self, model: &dyn CompletionModel, input: &Value) -> Result<Value, FlowError> {
        let invocation_id = Uuid::new_v4();
        let prompt = self.render_prompt(input)?;
        info!(flow = self.name, %invocation_id, "Invoking flow");
        debug!(flow = self.name, %invocation_id, prompt_chars = prompt.len(), "Prompt rendered");

        let text = model.complete(&prompt, &self.system_prompt).await?;

        let raw: Value = serde_json::from_str(strip_json_fences(&text)).map_err(|source| {
            warn!(flow = self.name, %invocation_id, "Model returned non-JSON output");
            FlowError::MalformedOutput {
                flow: self.name,
                source,
            }
        })?;

        self.output_shape.validate(&raw).map_err(|source| {
            warn!(flow = self.name, %invocation_id, error = %source, "Model output rejected");
            FlowError::InvalidOutput {
                flow: self.name,
                source,
            }
        })?;

        info!(flow = self.name, %invocation_id, "Flow completed");
        Ok(raw)
    }
}

#[async_trait]
impl<I, O> Flow for PromptFlow<I, O>
where
    I: Serialize + Send + Sync,
    O: DeserializeOwned + Serialize + Send,
{
    fn descriptor(&self) -> FlowDescriptor {
        FlowDescriptor {
            name: self.name,
            description: self.description,
            input_schema: self.input_shape,
            output_schema: self.output_shape,
        }
    }

    /// Untyped entry point. The output is round-tripped through `O` so
    /// undeclared fields are dropped.
    async fn invoke(&self, model: &dyn CompletionModel, input: Value) -> Result<Value, FlowError> {
        let raw = self.call(model, &input).await?;
        let typed: O = serde_json::from_value(raw).map_err(|source| FlowError::MalformedOutput {
            flow: self.name,
            source,
        })?;
        serde_json::to_value(typed).map_err(|source| FlowError::Encode {
            flow: self.name,
            source,
        })
    }
}

/// All flows the service exposes, keyed by wire name.
pub struct FlowRegistry {
    flows: BTreeMap<&'static str, Arc<dyn Flow>>,
    auto_fill: Arc<AutoFillFlow>,
}

impl FlowRegistry {
    /// Builds the four flows. Fails only if a template does not compile.
    pub fn new() -> Result<Self, TemplateError> {
        let auto_fill = Arc::new(auto_fill::flow()?);
        let flows: Vec<Arc<dyn Flow>> = vec![
            Arc::clone(&auto_fill) as Arc<dyn Flow>,
            Arc::new(populate_field::flow()?),
            Arc::new(suggest_content::flow()?),
            Arc::new(summarize_form::flow()?),
        ];

        Ok(Self {
            flows: flows
                .into_iter()
                .map(|flow| (flow.descriptor().name, flow))
                .collect(),
            auto_fill,
        })
    }

    /// Typed handle on the auto-fill flow, used by the form endpoints.
    pub fn auto_fill(&self) -> &AutoFillFlow {
        &self.auto_fill
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Flow>> {
        self.flows.get(name).cloned()
    }

    pub fn descriptors(&self) -> Vec<FlowDescriptor> {
        self.flows.values().map(|f| f.descriptor()).collect()
    }
}
