use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Inclusive bounds on a custom tool's webhook timeout.
pub const MIN_TOOL_TIMEOUT_MS: u64 = 1_000;
pub const MAX_TOOL_TIMEOUT_MS: u64 = 600_000;

/// A reusable tool that function nodes can invoke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    Custom(CustomTool),
    CheckAvailabilityCal(CalendarTool),
    BookAppointmentCal(CalendarTool),
}

impl Tool {
    pub fn tool_id(&self) -> &str {
        match self {
            Tool::Custom(tool) => &tool.tool_id,
            Tool::CheckAvailabilityCal(tool) | Tool::BookAppointmentCal(tool) => &tool.tool_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Tool::Custom(tool) => &tool.name,
            Tool::CheckAvailabilityCal(tool) | Tool::BookAppointmentCal(tool) => &tool.name,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Tool::Custom(_) => "custom",
            Tool::CheckAvailabilityCal(_) => "check_availability_cal",
            Tool::BookAppointmentCal(_) => "book_appointment_cal",
        }
    }
}

/// A webhook the platform calls while executing a function node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTool {
    pub tool_id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ToolParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    /// Bounded to `[MIN_TOOL_TIMEOUT_MS, MAX_TOOL_TIMEOUT_MS]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_params: Option<BTreeMap<String, String>>,
    /// Maps dynamic variable names to paths in the webhook response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_variables: Option<BTreeMap<String, String>>,
}

/// JSON-schema-like description of a custom tool's arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameters {
    /// Always `"object"`.
    #[serde(rename = "type")]
    pub kind: ObjectType,
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    #[default]
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Cal.com integration shared by the availability and booking tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarTool {
    pub tool_id: String,
    pub name: String,
    pub cal_api_key: String,
    pub event_type_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}
