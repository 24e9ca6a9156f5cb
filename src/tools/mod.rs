//! The operations exposed to a tool-invocation host.

mod input;

pub use input::{FlowVersion, GetConversationFlowInput, UpdateConversationFlowInput};

use crate::assemble::{self, UpdateRequest};
use crate::error::FlowError;
use crate::flow::{ConversationFlow, FlowSettings};
use crate::platform::FlowPlatform;
use crate::schema::json_schema::object_schema_with;
use crate::schema::{Validator, tables};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

pub const GET_CONVERSATION_FLOW: &str = "get_conversation_flow";
pub const UPDATE_CONVERSATION_FLOW: &str = "update_conversation_flow";
pub const CREATE_CONVERSATION_FLOW: &str = "create_conversation_flow";

/// Name, description and input schema of one exposed tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Validates tool input, forwards it to the platform and reshapes the answer.
pub struct FlowTools<P> {
    platform: P,
    validator: Validator,
}

impl<P: FlowPlatform> FlowTools<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            validator: Validator::strict(),
        }
    }

    /// Replaces the validator applied to caller input.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub async fn get_conversation_flow(
        &self,
        input: GetConversationFlowInput,
    ) -> Result<ConversationFlow, FlowError> {
        logged(GET_CONVERSATION_FLOW, self.get(input).await)
    }

    /// Sends only the fields present in `input.changes`; everything else on
    /// the stored flow is left as it is.
    pub async fn update_conversation_flow(
        &self,
        input: UpdateConversationFlowInput,
    ) -> Result<ConversationFlow, FlowError> {
        logged(UPDATE_CONVERSATION_FLOW, self.update(input).await)
    }

    pub async fn create_conversation_flow(
        &self,
        draft: FlowSettings,
    ) -> Result<ConversationFlow, FlowError> {
        logged(CREATE_CONVERSATION_FLOW, self.create(draft).await)
    }

    /// Runs the tool called `name` with raw JSON arguments and returns its
    /// output document.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value, FlowError> {
        logged(name, self.dispatch(name, &arguments).await)
    }

    async fn dispatch(&self, name: &str, arguments: &Value) -> Result<Value, FlowError> {
        let flow = match name {
            GET_CONVERSATION_FLOW => {
                let input = self.validator.validate_get_input(arguments)?;
                self.get(input).await?
            }
            UPDATE_CONVERSATION_FLOW => {
                let input = self.validator.validate_update_input(arguments)?;
                self.update(input).await?
            }
            CREATE_CONVERSATION_FLOW => {
                let draft = self.validator.validate_draft(arguments)?;
                self.create(draft).await?
            }
            other => return Err(FlowError::UnknownTool(other.to_string())),
        };
        Ok(assemble::output_document(&flow)?)
    }

    async fn get(&self, input: GetConversationFlowInput) -> Result<ConversationFlow, FlowError> {
        let flow_id = input.conversation_flow_id;
        let version = input.version.map(FlowVersion::get);
        info!(flow_id = %flow_id, ?version, "retrieving conversation flow");

        let document = self
            .platform
            .retrieve(&flow_id, version)
            .await
            .map_err(|e| FlowError::from_platform(e, version))?;
        let Some(document) = document else {
            return Err(FlowError::NotFound { flow_id, version });
        };

        Ok(assemble::transform_output(&document)?)
    }

    async fn update(&self, input: UpdateConversationFlowInput) -> Result<ConversationFlow, FlowError> {
        let request = self.prepare_update(input)?;
        let body = request.body_json()?;
        info!(
            flow_id = %request.flow_id,
            version = ?request.version,
            fields = request.body.present_fields().len(),
            "updating conversation flow"
        );

        let document = self
            .platform
            .update(&request.flow_id, request.version, body)
            .await
            .map_err(|e| FlowError::from_platform(e, request.version))?;

        Ok(assemble::transform_output(&document)?)
    }

    async fn create(&self, draft: FlowSettings) -> Result<ConversationFlow, FlowError> {
        let body = assemble::draft_body(&draft)?;
        self.validator.validate_draft(&body)?;
        info!(
            nodes = draft.nodes.as_ref().map_or(0, Vec::len),
            "creating conversation flow"
        );

        let document = self
            .platform
            .create(body)
            .await
            .map_err(|e| FlowError::from_platform(e, None))?;

        Ok(assemble::transform_output(&document)?)
    }

    /// Re-validates the changes, so typed input built in code is held to
    /// the same bounds as raw JSON.
    fn prepare_update(&self, input: UpdateConversationFlowInput) -> Result<UpdateRequest, FlowError> {
        let changes = serde_json::to_value(&input.changes)?;
        self.validator.validate_settings(&changes)?;
        Ok(assemble::update_request(input))
    }
}

fn logged<T>(tool: &str, result: Result<T, FlowError>) -> Result<T, FlowError> {
    if let Err(err) = &result {
        error!(tool, error = %err, "tool call failed");
    }
    result
}

/// Descriptors for every exposed tool, with input schemas rendered from the
/// same shapes the validator checks.
pub fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: GET_CONVERSATION_FLOW,
            description: "Retrieves details of a specific conversation flow by ID",
            input_schema: object_schema_with(&tables::GET_INPUT, None, &[]),
        },
        ToolDescriptor {
            name: UPDATE_CONVERSATION_FLOW,
            description: "Updates an existing conversation flow",
            input_schema: object_schema_with(&tables::UPDATE_INPUT, None, &[]),
        },
        ToolDescriptor {
            name: CREATE_CONVERSATION_FLOW,
            description: "Creates a new conversation flow",
            input_schema: object_schema_with(&tables::FLOW_SETTINGS, None, &tables::DRAFT_REQUIRED),
        },
    ]
}
