//! Shapes request bodies for the platform and re-exposes its responses.

use crate::error::ValidationError;
use crate::flow::{ConversationFlow, FlowSettings};
use crate::schema::Validator;
use crate::tools::UpdateConversationFlowInput;
use serde_json::{Map, Value};
use tracing::debug;

/// A partial update addressed to one flow.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub flow_id: String,
    pub version: Option<u32>,
    pub body: FlowSettings,
}

impl UpdateRequest {
    /// The wire body. Only the fields the caller supplied are present.
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.body)
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Builds an update request from validated input.
pub fn update_request(input: UpdateConversationFlowInput) -> UpdateRequest {
    let request = UpdateRequest {
        flow_id: input.conversation_flow_id,
        version: input.version.map(|v| v.get()),
        body: input.changes,
    };
    if request.is_empty() {
        debug!(flow_id = %request.flow_id, "update carries no fields");
    } else {
        debug!(
            flow_id = %request.flow_id,
            fields = ?request.body.present_fields(),
            "assembled update"
        );
    }
    request
}

/// The body of a create request.
pub fn draft_body(draft: &FlowSettings) -> Result<Value, serde_json::Error> {
    serde_json::to_value(draft)
}

/// Accepts a platform document, treating `null` as absent, and returns the
/// typed flow. Keys outside the flow shape are dropped.
pub fn transform_output(document: &Value) -> Result<ConversationFlow, ValidationError> {
    Validator::lenient().validate_flow(document)
}

/// The output document for a flow.
pub fn output_document(flow: &ConversationFlow) -> Result<Value, serde_json::Error> {
    serde_json::to_value(flow)
}

/// Replaces each top-level key of `document` with the one in `body`,
/// leaving every other key untouched.
pub fn apply_update(document: &mut Value, body: &Value) {
    let Some(changes) = body.as_object() else {
        return;
    };
    if !document.is_object() {
        *document = Value::Object(Map::new());
    }
    if let Value::Object(target) = document {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
}
