//! Static shapes for every document the crate accepts.

use super::shape::{Kind, ObjectShape, UnionShape, opt, req};
use crate::flow::definition::LlmModel;
use crate::flow::edge::{
    ComparisonOperator, ElsePrompt, FailedPrompt, MAX_EQUATIONS, PinnedPrompt, SentPrompt,
};
use crate::flow::tool::{MAX_TOOL_TIMEOUT_MS, MIN_TOOL_TIMEOUT_MS};

const NUMBER: Kind = Kind::Number {
    min: None,
    max: None,
};
const UNIT_INTERVAL: Kind = Kind::Number {
    min: Some(0.0),
    max: Some(1.0),
};
const COUNT: Kind = Kind::Integer {
    min: None,
    max: None,
};
const VERSION: Kind = Kind::Integer {
    min: None,
    max: Some(u32::MAX as u64),
};
const STRING_LIST: Kind = Kind::List {
    item: &Kind::String,
    max_items: None,
};
const STRING_MAP: Kind = Kind::Map(&Kind::String);
const ANY_MAP: Kind = Kind::Map(&Kind::Any);
const SCOPES: Kind = Kind::OneOf(&["local", "shared"]);

macro_rules! list_of {
    ($item:ident) => {
        Kind::List {
            item: &$item,
            max_items: None,
        }
    };
}

// Positions and models

pub(crate) static DISPLAY_POSITION: ObjectShape = ObjectShape {
    name: "display position",
    fields: &[req("x", NUMBER), req("y", NUMBER)],
};

static CASCADING_MODEL: ObjectShape = ObjectShape {
    name: "cascading model",
    fields: &[
        req("model", Kind::OneOf(&LlmModel::NAMES)),
        opt("high_priority", Kind::Bool),
    ],
};

pub(crate) static MODEL_CHOICE: UnionShape = UnionShape {
    name: "model choice",
    tag: "type",
    variants: &[("cascading", &CASCADING_MODEL)],
};

// Instructions

static INSTRUCTION_TEXT: ObjectShape = ObjectShape {
    name: "instruction",
    fields: &[req("text", Kind::String)],
};

static INSTRUCTION: UnionShape = UnionShape {
    name: "instruction",
    tag: "type",
    variants: &[("prompt", &INSTRUCTION_TEXT), ("static_text", &INSTRUCTION_TEXT)],
};

static PROMPT_INSTRUCTION: UnionShape = UnionShape {
    name: "prompt instruction",
    tag: "type",
    variants: &[("prompt", &INSTRUCTION_TEXT)],
};

// Edges

static PROMPT_CONDITION: ObjectShape = ObjectShape {
    name: "prompt condition",
    fields: &[req("prompt", Kind::String)],
};

static EQUATION: ObjectShape = ObjectShape {
    name: "equation",
    fields: &[
        req("left", Kind::String),
        req("operator", Kind::OneOf(&ComparisonOperator::ALL)),
        opt("right", Kind::String),
    ],
};

static EQUATION_KIND: Kind = Kind::Object(&EQUATION);

static EQUATION_CONDITION: ObjectShape = ObjectShape {
    name: "equation condition",
    fields: &[
        req(
            "equations",
            Kind::List {
                item: &EQUATION_KIND,
                max_items: Some(MAX_EQUATIONS),
            },
        ),
        req("operator", Kind::OneOf(&["||", "&&"])),
    ],
};

static TRANSITION_CONDITION: UnionShape = UnionShape {
    name: "transition condition",
    tag: "type",
    variants: &[
        ("prompt", &PROMPT_CONDITION),
        ("equation", &EQUATION_CONDITION),
    ],
};

pub(crate) static EDGE: ObjectShape = ObjectShape {
    name: "edge",
    fields: &[
        req("id", Kind::String),
        req("transition_condition", Kind::Union(&TRANSITION_CONDITION)),
        opt("destination_node_id", Kind::String),
    ],
};

static EDGE_KIND: Kind = Kind::Object(&EDGE);

macro_rules! pinned_edge {
    ($condition:ident, $edge:ident, $name:literal, $prompt:ty) => {
        static $condition: ObjectShape = ObjectShape {
            name: concat!($name, " condition"),
            fields: &[
                req("type", Kind::Literal("prompt")),
                req("prompt", Kind::Literal(<$prompt as PinnedPrompt>::TEXT)),
            ],
        };

        static $edge: ObjectShape = ObjectShape {
            name: $name,
            fields: &[
                req("id", Kind::String),
                req("transition_condition", Kind::Object(&$condition)),
                opt("destination_node_id", Kind::String),
            ],
        };
    };
}

pinned_edge!(ELSE_CONDITION, ELSE_EDGE, "else edge", ElsePrompt);
pinned_edge!(SENT_CONDITION, SMS_SUCCESS_EDGE, "success edge", SentPrompt);
pinned_edge!(FAILED_CONDITION, SMS_FAILED_EDGE, "failed edge", FailedPrompt);

// Tools

static TOOL_PARAMETERS: ObjectShape = ObjectShape {
    name: "tool parameters",
    fields: &[
        req("type", Kind::Literal("object")),
        req("properties", ANY_MAP),
        opt("required", STRING_LIST),
    ],
};

static CUSTOM_TOOL: ObjectShape = ObjectShape {
    name: "custom tool",
    fields: &[
        req("tool_id", Kind::String),
        req("name", Kind::String),
        req("url", Kind::String),
        opt("description", Kind::String),
        opt("parameters", Kind::Object(&TOOL_PARAMETERS)),
        opt("headers", STRING_MAP),
        opt(
            "method",
            Kind::OneOf(&["GET", "POST", "PUT", "PATCH", "DELETE"]),
        ),
        opt(
            "timeout_ms",
            Kind::Integer {
                min: Some(MIN_TOOL_TIMEOUT_MS),
                max: Some(MAX_TOOL_TIMEOUT_MS),
            },
        ),
        opt("query_params", STRING_MAP),
        opt("response_variables", STRING_MAP),
    ],
};

static CALENDAR_TOOL: ObjectShape = ObjectShape {
    name: "calendar tool",
    fields: &[
        req("tool_id", Kind::String),
        req("name", Kind::String),
        req("cal_api_key", Kind::String),
        req("event_type_id", COUNT),
        opt("description", Kind::String),
        opt("timezone", Kind::String),
    ],
};

pub(crate) static TOOL: UnionShape = UnionShape {
    name: "tool",
    tag: "type",
    variants: &[
        ("custom", &CUSTOM_TOOL),
        ("check_availability_cal", &CALENDAR_TOOL),
        ("book_appointment_cal", &CALENDAR_TOOL),
    ],
};

static TOOL_KIND: Kind = Kind::Union(&TOOL);

// Node payloads

static ANALYSIS_FIELD: ObjectShape = ObjectShape {
    name: "analysis variable",
    fields: &[
        req("name", Kind::String),
        req("description", Kind::String),
        opt("examples", STRING_LIST),
    ],
};

static ENUM_ANALYSIS_FIELD: ObjectShape = ObjectShape {
    name: "enum analysis variable",
    fields: &[
        req("name", Kind::String),
        req("description", Kind::String),
        req("choices", STRING_LIST),
        opt("examples", STRING_LIST),
    ],
};

static ANALYSIS_VARIABLE: UnionShape = UnionShape {
    name: "analysis variable",
    tag: "type",
    variants: &[
        ("string", &ANALYSIS_FIELD),
        ("enum", &ENUM_ANALYSIS_FIELD),
        ("boolean", &ANALYSIS_FIELD),
        ("number", &ANALYSIS_FIELD),
    ],
};

static ANALYSIS_VARIABLE_KIND: Kind = Kind::Union(&ANALYSIS_VARIABLE);

static PREDEFINED_DESTINATION: ObjectShape = ObjectShape {
    name: "predefined destination",
    fields: &[req("number", Kind::String), opt("extension", Kind::String)],
};

static INFERRED_DESTINATION: ObjectShape = ObjectShape {
    name: "inferred destination",
    fields: &[req("prompt", Kind::String)],
};

static TRANSFER_DESTINATION: UnionShape = UnionShape {
    name: "transfer destination",
    tag: "type",
    variants: &[
        ("predefined", &PREDEFINED_DESTINATION),
        ("inferred", &INFERRED_DESTINATION),
    ],
};

static COLD_TRANSFER: ObjectShape = ObjectShape {
    name: "cold transfer",
    fields: &[opt("show_transferee_as_caller", Kind::Bool)],
};

static WARM_TRANSFER: ObjectShape = ObjectShape {
    name: "warm transfer",
    fields: &[
        opt("show_transferee_as_caller", Kind::Bool),
        opt("agent_detection_timeout_ms", COUNT),
        opt(
            "on_hold_music",
            Kind::OneOf(&["none", "relaxing_sound", "uplifting_beats", "ringtone"]),
        ),
        opt("public_handoff_option", Kind::Any),
        opt("private_handoff_option", Kind::Any),
        opt("ivr_option", Kind::Any),
        opt("opt_out_human_detection", Kind::Bool),
        opt("opt_out_initial_message", Kind::Bool),
    ],
};

static TRANSFER_OPTION: UnionShape = UnionShape {
    name: "transfer option",
    tag: "type",
    variants: &[
        ("cold_transfer", &COLD_TRANSFER),
        ("warm_transfer", &WARM_TRANSFER),
    ],
};

// Nodes

/// Declares one shape per node variant, each led by the shared base fields,
/// plus the `NODE` union over all of them.
macro_rules! define_node_shapes {
    ($( $shape:ident => $tag:literal [ $($field:expr),* $(,)? ] ),* $(,)?) => {
        $(
            static $shape: ObjectShape = ObjectShape {
                name: concat!($tag, " node"),
                fields: &[
                    req("id", Kind::String),
                    opt("name", Kind::String),
                    opt("display_position", Kind::Object(&DISPLAY_POSITION)),
                    $($field,)*
                ],
            };
        )*

        pub(crate) static NODE: UnionShape = UnionShape {
            name: "node",
            tag: "type",
            variants: &[$(($tag, &$shape)),*],
        };
    };
}

define_node_shapes! {
    CONVERSATION_NODE => "conversation" [
        req("instruction", Kind::Union(&INSTRUCTION)),
        opt("edges", list_of!(EDGE_KIND)),
        opt("model_choice", Kind::Union(&MODEL_CHOICE)),
        opt("interruption_sensitivity", UNIT_INTERVAL),
        opt("knowledge_base_ids", STRING_LIST),
    ],
    END_NODE => "end" [],
    FUNCTION_NODE => "function" [
        req("tool_id", Kind::String),
        req("tool_type", SCOPES),
        req("wait_for_result", Kind::Bool),
        opt("instruction", Kind::Union(&INSTRUCTION)),
        opt("edges", list_of!(EDGE_KIND)),
        opt("model_choice", Kind::Union(&MODEL_CHOICE)),
        opt("interruption_sensitivity", UNIT_INTERVAL),
        opt("speak_during_execution", Kind::Bool),
    ],
    TRANSFER_CALL_NODE => "transfer_call" [
        req("transfer_destination", Kind::Union(&TRANSFER_DESTINATION)),
        req("transfer_option", Kind::Union(&TRANSFER_OPTION)),
        req("edge", Kind::Object(&EDGE)),
        opt("model_choice", Kind::Union(&MODEL_CHOICE)),
        opt("ignore_e164_validation", Kind::Bool),
        opt("custom_sip_headers", STRING_MAP),
    ],
    PRESS_DIGIT_NODE => "press_digit" [
        req("instruction", Kind::Union(&PROMPT_INSTRUCTION)),
        opt("delay_ms", COUNT),
        opt("edges", list_of!(EDGE_KIND)),
        opt("model_choice", Kind::Union(&MODEL_CHOICE)),
    ],
    BRANCH_NODE => "branch" [
        req("else_edge", Kind::Object(&ELSE_EDGE)),
        opt("edges", list_of!(EDGE_KIND)),
    ],
    SMS_NODE => "sms" [
        req("instruction", Kind::Union(&INSTRUCTION)),
        req("success_edge", Kind::Object(&SMS_SUCCESS_EDGE)),
        req("failed_edge", Kind::Object(&SMS_FAILED_EDGE)),
    ],
    EXTRACT_DYNAMIC_VARIABLES_NODE => "extract_dynamic_variables" [
        req("variables", list_of!(ANALYSIS_VARIABLE_KIND)),
        opt("edges", list_of!(EDGE_KIND)),
        opt("model_choice", Kind::Union(&MODEL_CHOICE)),
    ],
    AGENT_SWAP_NODE => "agent_swap" [
        req("agent_id", Kind::String),
        req(
            "post_call_analysis_setting",
            Kind::OneOf(&["both_agents", "only_destination_agent"]),
        ),
        req("edge", Kind::Object(&EDGE)),
        opt("agent_version", COUNT),
        opt(
            "webhook_setting",
            Kind::OneOf(&["both_agents", "only_destination_agent", "only_source_agent"]),
        ),
    ],
    MCP_NODE => "mcp" [
        req("mcp_id", Kind::String),
        req("mcp_tool_name", Kind::String),
        req("wait_for_result", Kind::Bool),
        opt("edges", list_of!(EDGE_KIND)),
        opt("response_variables", STRING_MAP),
        opt("speak_during_execution", Kind::Bool),
        opt("instruction", Kind::Union(&INSTRUCTION)),
        opt("interruption_sensitivity", UNIT_INTERVAL),
    ],
    COMPONENT_NODE => "component" [
        req("component_id", Kind::String),
        req("component_type", SCOPES),
        req("else_edge", Kind::Object(&ELSE_EDGE)),
        opt("edges", list_of!(EDGE_KIND)),
    ],
}

static NODE_KIND: Kind = Kind::Union(&NODE);

// Flow level

static KB_CONFIG: ObjectShape = ObjectShape {
    name: "knowledge base config",
    fields: &[
        opt(
            "top_k",
            Kind::Integer {
                min: Some(1),
                max: Some(10),
            },
        ),
        opt("filter_score", UNIT_INTERVAL),
    ],
};

static MCP_ENDPOINT: ObjectShape = ObjectShape {
    name: "mcp endpoint",
    fields: &[
        req("name", Kind::String),
        req("url", Kind::String),
        opt("headers", STRING_MAP),
        opt("query_params", STRING_MAP),
        opt("timeout_ms", COUNT),
    ],
};

static MCP_ENDPOINT_KIND: Kind = Kind::Object(&MCP_ENDPOINT);

static COMPONENT: ObjectShape = ObjectShape {
    name: "component",
    fields: &[
        req("name", Kind::String),
        req("nodes", list_of!(NODE_KIND)),
        opt("tools", list_of!(TOOL_KIND)),
        opt("start_node_id", Kind::String),
        opt("begin_tag_display_position", Kind::Object(&DISPLAY_POSITION)),
    ],
};

static COMPONENT_KIND: Kind = Kind::Object(&COMPONENT);

/// The flow-level settings, optionally led by extra fields.
/// Platform output does not bound `model_temperature`.
macro_rules! flow_fields {
    (temperature: $temperature:expr $(, $lead:expr)* $(,)?) => {
        &[
            $($lead,)*
            opt("model_choice", Kind::Union(&MODEL_CHOICE)),
            opt("model_temperature", $temperature),
            opt("tool_call_strict_mode", Kind::Bool),
            opt("knowledge_base_ids", STRING_LIST),
            opt("kb_config", Kind::Object(&KB_CONFIG)),
            opt("start_speaker", Kind::OneOf(&["user", "agent"])),
            opt("begin_after_user_silence_ms", COUNT),
            opt("global_prompt", Kind::String),
            opt("tools", list_of!(TOOL_KIND)),
            opt("components", list_of!(COMPONENT_KIND)),
            opt("start_node_id", Kind::String),
            opt("default_dynamic_variables", STRING_MAP),
            opt("begin_tag_display_position", Kind::Object(&DISPLAY_POSITION)),
            opt("mcps", list_of!(MCP_ENDPOINT_KIND)),
            opt("is_transfer_llm", Kind::Bool),
            opt("nodes", list_of!(NODE_KIND)),
        ]
    };
}

/// A flow as returned by the platform.
pub(crate) static CONVERSATION_FLOW: ObjectShape = ObjectShape {
    name: "conversation flow",
    fields: flow_fields!(
        temperature: NUMBER,
        req("conversation_flow_id", Kind::String),
        req("version", VERSION),
    ),
};

/// Flow settings alone, as sent in update and create bodies.
pub(crate) static FLOW_SETTINGS: ObjectShape = ObjectShape {
    name: "conversation flow settings",
    fields: flow_fields!(temperature: UNIT_INTERVAL),
};

/// Settings a new flow cannot be created without.
pub(crate) const DRAFT_REQUIRED: [&str; 3] = ["model_choice", "start_speaker", "nodes"];

pub(crate) static GET_INPUT: ObjectShape = ObjectShape {
    name: "get conversation flow input",
    fields: &[
        req("conversationFlowId", Kind::String),
        opt("version", Kind::UintLike),
    ],
};

pub(crate) static UPDATE_INPUT: ObjectShape = ObjectShape {
    name: "update conversation flow input",
    fields: flow_fields!(
        temperature: UNIT_INTERVAL,
        req("conversationFlowId", Kind::String),
        opt("version", Kind::UintLike),
    ),
};
