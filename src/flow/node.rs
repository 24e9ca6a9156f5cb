use super::analysis::AnalysisVariable;
use super::definition::{DisplayPosition, ModelChoice};
use super::edge::{Edge, ElseEdge, SmsFailedEdge, SmsSuccessEdge};
use crate::schema::FieldPath;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Fields every node variant carries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeBase {
    /// Unique within the enclosing node list.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_position: Option<DisplayPosition>,
}

impl NodeBase {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// One step of a conversation flow, discriminated by its `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Conversation(ConversationNode),
    End(EndNode),
    Function(FunctionNode),
    TransferCall(TransferCallNode),
    PressDigit(PressDigitNode),
    Branch(BranchNode),
    Sms(SmsNode),
    ExtractDynamicVariables(ExtractDynamicVariablesNode),
    AgentSwap(AgentSwapNode),
    Mcp(McpNode),
    Component(ComponentNode),
}

impl Node {
    /// All `type` tags, in declaration order.
    pub const TYPES: [&'static str; 11] = [
        "conversation",
        "end",
        "function",
        "transfer_call",
        "press_digit",
        "branch",
        "sms",
        "extract_dynamic_variables",
        "agent_swap",
        "mcp",
        "component",
    ];

    pub fn base(&self) -> &NodeBase {
        match self {
            Node::Conversation(n) => &n.base,
            Node::End(n) => &n.base,
            Node::Function(n) => &n.base,
            Node::TransferCall(n) => &n.base,
            Node::PressDigit(n) => &n.base,
            Node::Branch(n) => &n.base,
            Node::Sms(n) => &n.base,
            Node::ExtractDynamicVariables(n) => &n.base,
            Node::AgentSwap(n) => &n.base,
            Node::Mcp(n) => &n.base,
            Node::Component(n) => &n.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Conversation(_) => "conversation",
            Node::End(_) => "end",
            Node::Function(_) => "function",
            Node::TransferCall(_) => "transfer_call",
            Node::PressDigit(_) => "press_digit",
            Node::Branch(_) => "branch",
            Node::Sms(_) => "sms",
            Node::ExtractDynamicVariables(_) => "extract_dynamic_variables",
            Node::AgentSwap(_) => "agent_swap",
            Node::Mcp(_) => "mcp",
            Node::Component(_) => "component",
        }
    }

    /// Every outgoing edge with its path relative to the node,
    /// e.g. `edges[2]` or `else_edge`.
    pub fn outgoing_edges(&self) -> Vec<(FieldPath, Edge)> {
        fn listed(edges: &Option<Vec<Edge>>) -> Vec<(FieldPath, Edge)> {
            edges
                .iter()
                .flatten()
                .enumerate()
                .map(|(i, e)| (FieldPath::root().field("edges").index(i), e.clone()))
                .collect()
        }
        fn single(field: &'static str, edge: Edge) -> (FieldPath, Edge) {
            (FieldPath::root().field(field), edge)
        }

        match self {
            Node::Conversation(n) => listed(&n.edges),
            Node::End(_) => Vec::new(),
            Node::Function(n) => listed(&n.edges),
            Node::TransferCall(n) => vec![single("edge", n.edge.clone())],
            Node::PressDigit(n) => listed(&n.edges),
            Node::Branch(n) => {
                let mut edges = listed(&n.edges);
                edges.push(single("else_edge", n.else_edge.to_edge()));
                edges
            }
            Node::Sms(n) => vec![
                single("success_edge", n.success_edge.to_edge()),
                single("failed_edge", n.failed_edge.to_edge()),
            ],
            Node::ExtractDynamicVariables(n) => listed(&n.edges),
            Node::AgentSwap(n) => vec![single("edge", n.edge.clone())],
            Node::Mcp(n) => listed(&n.edges),
            Node::Component(n) => {
                let mut edges = listed(&n.edges);
                edges.push(single("else_edge", n.else_edge.to_edge()));
                edges
            }
        }
    }
}

/// What the agent should say or do while in a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Instruction {
    /// Guidance the model turns into speech.
    Prompt { text: String },
    /// Spoken verbatim.
    StaticText { text: String },
}

/// An instruction restricted to the prompt form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromptInstruction {
    Prompt { text: String },
}

/// Whether a referenced tool or component is declared in this flow or shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Local,
    Shared,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationNode {
    #[serde(flatten)]
    pub base: NodeBase,
    pub instruction: Instruction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_choice: Option<ModelChoice>,
    /// In `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruption_sensitivity: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_base_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndNode {
    #[serde(flatten)]
    pub base: NodeBase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionNode {
    #[serde(flatten)]
    pub base: NodeBase,
    pub tool_id: String,
    pub tool_type: Scope,
    pub wait_for_result: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<Instruction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_choice: Option<ModelChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruption_sensitivity: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speak_during_execution: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferCallNode {
    #[serde(flatten)]
    pub base: NodeBase,
    pub transfer_destination: TransferDestination,
    pub transfer_option: TransferOption,
    pub edge: Edge,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_choice: Option<ModelChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_e164_validation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_sip_headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferDestination {
    Predefined {
        number: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        extension: Option<String>,
    },
    /// The model infers the number from the prompt at call time.
    Inferred { prompt: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransferOption {
    ColdTransfer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        show_transferee_as_caller: Option<bool>,
    },
    WarmTransfer(WarmTransferOption),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WarmTransferOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_transferee_as_caller: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_detection_timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_hold_music: Option<OnHoldMusic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_handoff_option: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_handoff_option: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ivr_option: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opt_out_human_detection: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opt_out_initial_message: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnHoldMusic {
    None,
    RelaxingSound,
    UpliftingBeats,
    Ringtone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressDigitNode {
    #[serde(flatten)]
    pub base: NodeBase,
    pub instruction: PromptInstruction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_choice: Option<ModelChoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchNode {
    #[serde(flatten)]
    pub base: NodeBase,
    pub else_edge: ElseEdge,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsNode {
    #[serde(flatten)]
    pub base: NodeBase,
    pub instruction: Instruction,
    pub success_edge: SmsSuccessEdge,
    pub failed_edge: SmsFailedEdge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractDynamicVariablesNode {
    #[serde(flatten)]
    pub base: NodeBase,
    pub variables: Vec<AnalysisVariable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_choice: Option<ModelChoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSwapNode {
    #[serde(flatten)]
    pub base: NodeBase,
    pub agent_id: String,
    pub post_call_analysis_setting: PostCallAnalysisSetting,
    pub edge: Edge,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_setting: Option<WebhookSetting>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostCallAnalysisSetting {
    BothAgents,
    OnlyDestinationAgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookSetting {
    BothAgents,
    OnlyDestinationAgent,
    OnlySourceAgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpNode {
    #[serde(flatten)]
    pub base: NodeBase,
    pub mcp_id: String,
    pub mcp_tool_name: String,
    pub wait_for_result: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_variables: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speak_during_execution: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<Instruction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruption_sensitivity: Option<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    #[serde(flatten)]
    pub base: NodeBase,
    pub component_id: String,
    pub component_type: Scope,
    pub else_edge: ElseEdge,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge>>,
}
