//! Shape validation for conversation-flow documents.
//!
//! Every document is first walked against a static shape table, collecting
//! all violations with the field path where each was found. Only a document
//! with no violations is deserialized into the typed model in [`crate::flow`].

pub mod json_schema;
mod path;
pub mod shape;
pub(crate) mod tables;

pub use path::{FieldPath, Segment};
pub use shape::NullPolicy;

use crate::error::{SchemaViolation, ValidationError, Violation};
use crate::flow::{ConversationFlow, FlowSettings, Node, Tool, integrity};
use crate::tools::{GetConversationFlowInput, UpdateConversationFlowInput};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shape::{Kind, ObjectShape, Walker};
use tracing::debug;

pub struct ValidatorBuilder {
    null_policy: NullPolicy,
    reference_checks: bool,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self {
            null_policy: NullPolicy::Reject,
            reference_checks: false,
        }
    }

    pub fn null_policy(mut self, policy: NullPolicy) -> Self {
        self.null_policy = policy;
        self
    }

    /// Also check id uniqueness and id-based links within the document.
    pub fn with_reference_checks(mut self, enabled: bool) -> Self {
        self.reference_checks = enabled;
        self
    }

    pub fn build(self) -> Validator {
        Validator {
            null_policy: self.null_policy,
            reference_checks: self.reference_checks,
        }
    }
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates raw JSON documents and converts them into the typed model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    null_policy: NullPolicy,
    reference_checks: bool,
}

impl Default for Validator {
    fn default() -> Self {
        ValidatorBuilder::new().build()
    }
}

impl Validator {
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// A validator for caller input: `null` is rejected, no reference checks.
    pub fn strict() -> Self {
        Self::default()
    }

    /// A validator for platform output, where `null` means absent.
    pub fn lenient() -> Self {
        Self::builder()
            .null_policy(NullPolicy::TreatAsAbsent)
            .build()
    }

    pub fn null_policy(&self) -> NullPolicy {
        self.null_policy
    }

    pub fn reference_checks(&self) -> bool {
        self.reference_checks
    }

    /// The same validator with a different null policy.
    pub fn with_null_policy(self, policy: NullPolicy) -> Self {
        Self {
            null_policy: policy,
            ..self
        }
    }

    pub fn validate_node(&self, value: &Value) -> Result<Node, ValidationError> {
        self.conform(&Kind::Union(&tables::NODE), value)
    }

    pub fn validate_tool(&self, value: &Value) -> Result<Tool, ValidationError> {
        self.conform(&Kind::Union(&tables::TOOL), value)
    }

    /// Validates a complete flow document as held by the platform.
    pub fn validate_flow(&self, value: &Value) -> Result<ConversationFlow, ValidationError> {
        let flow: ConversationFlow = self.conform(&Kind::Object(&tables::CONVERSATION_FLOW), value)?;
        if self.reference_checks {
            reject(integrity::check_flow(&flow))?;
        }
        Ok(flow)
    }

    /// Validates a partial update body. Any subset of flow fields, including none, is accepted.
    pub fn validate_settings(&self, value: &Value) -> Result<FlowSettings, ValidationError> {
        let settings: FlowSettings = self.conform(&Kind::Object(&tables::FLOW_SETTINGS), value)?;
        self.check_references(&settings)?;
        Ok(settings)
    }

    /// Validates the body of a new flow, which must carry the settings in
    /// [`tables::DRAFT_REQUIRED`].
    pub fn validate_draft(&self, value: &Value) -> Result<FlowSettings, ValidationError> {
        let mut violations = self.walk(&Kind::Object(&tables::FLOW_SETTINGS), value);
        if let Some(map) = value.as_object() {
            let missing = tables::DRAFT_REQUIRED
                .iter()
                .filter(|name| map.get(**name).is_none_or(Value::is_null))
                .map(|name| SchemaViolation {
                    path: FieldPath::root().field(*name),
                    violation: Violation::Missing,
                });
            violations.extend(missing);
        }
        reject(violations)?;
        let settings: FlowSettings = deserialize(value)?;
        self.check_references(&settings)?;
        Ok(settings)
    }

    /// Arguments of `get_conversation_flow`.
    pub fn validate_get_input(&self, value: &Value) -> Result<GetConversationFlowInput, ValidationError> {
        self.conform_object(&tables::GET_INPUT, value)
    }

    /// Arguments of `update_conversation_flow`. Reference checks, when on,
    /// apply to the flow fields that are present.
    pub fn validate_update_input(
        &self,
        value: &Value,
    ) -> Result<UpdateConversationFlowInput, ValidationError> {
        let input: UpdateConversationFlowInput = self.conform_object(&tables::UPDATE_INPUT, value)?;
        self.check_references(&input.changes)?;
        Ok(input)
    }

    fn conform_object<T: DeserializeOwned>(
        &self,
        shape: &'static ObjectShape,
        value: &Value,
    ) -> Result<T, ValidationError> {
        self.conform(&Kind::Object(shape), value)
    }

    fn check_references(&self, settings: &FlowSettings) -> Result<(), ValidationError> {
        if self.reference_checks {
            reject(integrity::check_settings(settings))?;
        }
        Ok(())
    }

    fn walk(&self, kind: &Kind, value: &Value) -> Vec<SchemaViolation> {
        let mut walker = Walker::new(self.null_policy);
        walker.check(kind, value);
        walker.finish()
    }

    fn conform<T: DeserializeOwned>(&self, kind: &Kind, value: &Value) -> Result<T, ValidationError> {
        reject(self.walk(kind, value))?;
        deserialize(value)
    }
}

fn reject(violations: Vec<SchemaViolation>) -> Result<(), ValidationError> {
    match ValidationError::from_violations(violations) {
        Some(err) => {
            debug!(
                violations = err.violations().len(),
                path = %err.path(),
                "document rejected"
            );
            Err(err)
        }
        None => Ok(()),
    }
}

/// The walk has already accepted `value`, so a failure here points at a
/// disagreement between the shape tables and the typed model.
fn deserialize<T: DeserializeOwned>(value: &Value) -> Result<T, ValidationError> {
    T::deserialize(value)
        .map_err(|e| ValidationError::single(FieldPath::root(), Violation::Malformed(e.to_string())))
}

/// JSON Schema for a single node document.
pub fn node_json_schema() -> Value {
    json_schema::kind_schema(&Kind::Union(&tables::NODE))
}

/// JSON Schema for a complete flow document.
pub fn flow_json_schema() -> Value {
    json_schema::object_schema(&tables::CONVERSATION_FLOW)
}
