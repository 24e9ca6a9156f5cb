use serde::{Deserialize, Serialize};

/// A value the extraction node pulls out of the conversation into a dynamic variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisVariable {
    String(AnalysisField),
    Enum(EnumAnalysisField),
    Boolean(AnalysisField),
    Number(AnalysisField),
}

impl AnalysisVariable {
    pub fn name(&self) -> &str {
        match self {
            AnalysisVariable::String(field)
            | AnalysisVariable::Boolean(field)
            | AnalysisVariable::Number(field) => &field.name,
            AnalysisVariable::Enum(field) => &field.field.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisField {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumAnalysisField {
    #[serde(flatten)]
    pub field: AnalysisField,
    pub choices: Vec<String>,
}
