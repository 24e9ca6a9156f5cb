//! Typed model of a conversation flow graph.

pub mod analysis;
pub mod definition;
pub mod edge;
pub mod integrity;
pub mod node;
pub mod tool;

pub use analysis::{AnalysisField, AnalysisVariable, EnumAnalysisField};
pub use definition::{
    CascadingModel, ConversationFlow, DisplayPosition, FlowComponent, FlowSettings, KbConfig,
    LlmModel, McpEndpoint, ModelChoice, StartSpeaker,
};
pub use edge::{
    ComparisonOperator, Edge, ElseEdge, Equation, LogicalOperator, MAX_EQUATIONS, PinnedEdge,
    SmsFailedEdge, SmsSuccessEdge, TransitionCondition,
};
pub use node::{
    AgentSwapNode, BranchNode, ComponentNode, ConversationNode, EndNode,
    ExtractDynamicVariablesNode, FunctionNode, Instruction, McpNode, Node, NodeBase, OnHoldMusic,
    PostCallAnalysisSetting, PressDigitNode, PromptInstruction, Scope, SmsNode, TransferCallNode,
    TransferDestination, TransferOption, WarmTransferOption, WebhookSetting,
};
pub use tool::{
    CalendarTool, CustomTool, HttpMethod, MAX_TOOL_TIMEOUT_MS, MIN_TOOL_TIMEOUT_MS, ObjectType,
    Tool, ToolParameters,
};
