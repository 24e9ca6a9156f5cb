use super::node::Node;
use super::tool::Tool;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;

/// A conversation flow as held by the platform: identity, version, and
/// every flow-level setting that is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationFlow {
    pub conversation_flow_id: String,
    pub version: u32,
    #[serde(flatten)]
    pub settings: FlowSettings,
}

impl ConversationFlow {
    pub fn nodes(&self) -> &[Node] {
        self.settings.nodes.as_deref().unwrap_or_default()
    }

    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.nodes().iter().find(|n| n.id() == id)
    }

    pub fn start_node(&self) -> Option<&Node> {
        self.settings
            .start_node_id
            .as_deref()
            .and_then(|id| self.find_node(id))
    }
}

/// Flow-level fields. Every field is optional so the same struct serves as a
/// partial update body: unset fields are never serialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_choice: Option<ModelChoice>,
    /// In `[0, 1]` on input; platform output is not bounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_temperature: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_strict_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kb_config: Option<KbConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_speaker: Option<StartSpeaker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_after_user_silence_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<FlowComponent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dynamic_variables: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_tag_display_position: Option<DisplayPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcps: Option<Vec<McpEndpoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_transfer_llm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<Node>>,
}

impl FlowSettings {
    /// Names of the fields that are set, in declaration order.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        macro_rules! collect {
            ($($field:ident),* $(,)?) => {
                $( if self.$field.is_some() { fields.push(stringify!($field)); } )*
            };
        }
        collect!(
            model_choice,
            model_temperature,
            tool_call_strict_mode,
            knowledge_base_ids,
            kb_config,
            start_speaker,
            begin_after_user_silence_ms,
            global_prompt,
            tools,
            components,
            start_node_id,
            default_dynamic_variables,
            begin_tag_display_position,
            mcps,
            is_transfer_llm,
            nodes,
        );
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }
}

/// Layout hint for editors; has no runtime meaning. Coordinates keep the
/// integer or float form they arrived in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayPosition {
    pub x: Number,
    pub y: Number,
}

/// How the platform picks the language model for the flow or a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ModelChoice {
    /// Speech-to-text, text model, then text-to-speech.
    Cascading(CascadingModel),
}

impl ModelChoice {
    pub fn cascading(model: LlmModel) -> Self {
        ModelChoice::Cascading(CascadingModel {
            model,
            high_priority: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadingModel {
    pub model: LlmModel,
    /// Use the dedicated high-priority pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_priority: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LlmModel {
    #[serde(rename = "gpt-5")]
    Gpt5,
    #[serde(rename = "gpt-5-mini")]
    Gpt5Mini,
    #[serde(rename = "gpt-5-nano")]
    Gpt5Nano,
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[serde(rename = "gpt-4.1")]
    Gpt41,
    #[serde(rename = "gpt-4.1-mini")]
    Gpt41Mini,
    #[serde(rename = "gpt-4.1-nano")]
    Gpt41Nano,
    #[serde(rename = "claude-3.7-sonnet")]
    Claude37Sonnet,
    #[serde(rename = "claude-3.5-haiku")]
    Claude35Haiku,
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,
    #[serde(rename = "gemini-2.0-flash-lite")]
    Gemini20FlashLite,
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
    #[serde(rename = "gemini-2.5-flash-lite")]
    Gemini25FlashLite,
}

impl LlmModel {
    pub const NAMES: [&'static str; 14] = [
        "gpt-5",
        "gpt-5-mini",
        "gpt-5-nano",
        "gpt-4o",
        "gpt-4o-mini",
        "gpt-4.1",
        "gpt-4.1-mini",
        "gpt-4.1-nano",
        "claude-3.7-sonnet",
        "claude-3.5-haiku",
        "gemini-2.0-flash",
        "gemini-2.0-flash-lite",
        "gemini-2.5-flash",
        "gemini-2.5-flash-lite",
    ];
}

/// Retrieval tuning for the flow's knowledge bases.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KbConfig {
    /// In `[1, 10]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// In `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_score: Option<Number>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartSpeaker {
    User,
    Agent,
}

/// An MCP server the flow's `mcp` nodes can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpEndpoint {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// A named, reusable sub-graph referenced by `component` nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowComponent {
    pub name: String,
    pub nodes: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_node_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_tag_display_position: Option<DisplayPosition>,
}
