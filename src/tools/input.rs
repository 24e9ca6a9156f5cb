use crate::flow::FlowSettings;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A flow version, accepted on input as an integer or a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FlowVersion(pub u32);

impl FlowVersion {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for FlowVersion {
    fn from(version: u32) -> Self {
        Self(version)
    }
}

impl fmt::Display for FlowVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVersion {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for FlowVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match RawVersion::deserialize(deserializer)? {
            RawVersion::Number(n) => n,
            RawVersion::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| D::Error::custom(format!("version '{}' is not a number", s)))?,
        };
        u32::try_from(raw)
            .map(FlowVersion)
            .map_err(|_| D::Error::custom(format!("version {} is out of range", raw)))
    }
}

/// Arguments of `get_conversation_flow`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetConversationFlowInput {
    #[serde(rename = "conversationFlowId")]
    pub conversation_flow_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<FlowVersion>,
}

impl GetConversationFlowInput {
    pub fn new(conversation_flow_id: impl Into<String>) -> Self {
        Self {
            conversation_flow_id: conversation_flow_id.into(),
            version: None,
        }
    }

    pub fn at_version(mut self, version: u32) -> Self {
        self.version = Some(FlowVersion(version));
        self
    }
}

/// Arguments of `update_conversation_flow`: the target flow plus any subset
/// of flow-level fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateConversationFlowInput {
    #[serde(rename = "conversationFlowId")]
    pub conversation_flow_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<FlowVersion>,
    #[serde(flatten)]
    pub changes: FlowSettings,
}

impl UpdateConversationFlowInput {
    pub fn new(conversation_flow_id: impl Into<String>, changes: FlowSettings) -> Self {
        Self {
            conversation_flow_id: conversation_flow_id.into(),
            version: None,
            changes,
        }
    }
}
