use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Upper bound on the sub-equations an equation condition may combine.
pub const MAX_EQUATIONS: usize = 50;

/// A directed transition out of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub transition_condition: TransitionCondition,
    /// `None` means the edge is terminal within its branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_node_id: Option<String>,
}

/// The predicate that decides when an edge is taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionCondition {
    /// Natural-language condition judged by the model.
    Prompt { prompt: String },
    /// Structured boolean condition over dynamic variables.
    Equation {
        equations: Vec<Equation>,
        operator: LogicalOperator,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equation {
    pub left: String,
    pub operator: ComparisonOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<")]
    SmallerThan,
    #[serde(rename = "<=")]
    SmallerThanOrEqual,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not_contains")]
    NotContains,
    #[serde(rename = "exists")]
    Exists,
    #[serde(rename = "not_exist")]
    NotExist,
}

impl ComparisonOperator {
    pub const ALL: [&'static str; 10] = [
        "==",
        "!=",
        ">",
        ">=",
        "<",
        "<=",
        "contains",
        "not_contains",
        "exists",
        "not_exist",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
}

/// Fixes the prompt text of a special-purpose edge.
pub trait PinnedPrompt {
    const TEXT: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElsePrompt;

impl PinnedPrompt for ElsePrompt {
    const TEXT: &'static str = "Else";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentPrompt;

impl PinnedPrompt for SentPrompt {
    const TEXT: &'static str = "Sent successfully";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedPrompt;

impl PinnedPrompt for FailedPrompt {
    const TEXT: &'static str = "Failed to send";
}

/// A prompt condition whose text can only ever be `P::TEXT`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PinnedCondition<P: PinnedPrompt>(PhantomData<P>);

impl<P: PinnedPrompt> PinnedCondition<P> {
    pub fn new() -> Self {
        Self(PhantomData)
    }

    pub fn prompt(&self) -> &'static str {
        P::TEXT
    }
}

impl<P: PinnedPrompt> Default for PinnedCondition<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PinnedPrompt> fmt::Debug for PinnedCondition<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PinnedCondition({:?})", P::TEXT)
    }
}

#[derive(Serialize)]
struct PromptConditionRepr<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct OwnedPromptConditionRepr {
    #[serde(rename = "type")]
    kind: String,
    prompt: String,
}

impl<P: PinnedPrompt> Serialize for PinnedCondition<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PromptConditionRepr {
            kind: "prompt",
            prompt: P::TEXT,
        }
        .serialize(serializer)
    }
}

impl<'de, P: PinnedPrompt> Deserialize<'de> for PinnedCondition<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = OwnedPromptConditionRepr::deserialize(deserializer)?;
        if repr.kind != "prompt" {
            return Err(D::Error::custom(format!(
                "expected condition type \"prompt\", found \"{}\"",
                repr.kind
            )));
        }
        if repr.prompt != P::TEXT {
            return Err(D::Error::custom(format!(
                "expected prompt \"{}\", found \"{}\"",
                P::TEXT,
                repr.prompt
            )));
        }
        Ok(Self::new())
    }
}

/// An edge whose transition condition is pinned to a literal prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PinnedEdge<P: PinnedPrompt> {
    pub id: String,
    pub transition_condition: PinnedCondition<P>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_node_id: Option<String>,
}

impl<P: PinnedPrompt> PinnedEdge<P> {
    pub fn new(id: impl Into<String>, destination_node_id: Option<String>) -> Self {
        Self {
            id: id.into(),
            transition_condition: PinnedCondition::new(),
            destination_node_id,
        }
    }

    /// The same edge as a generic prompt edge.
    pub fn to_edge(&self) -> Edge {
        Edge {
            id: self.id.clone(),
            transition_condition: TransitionCondition::Prompt {
                prompt: P::TEXT.to_string(),
            },
            destination_node_id: self.destination_node_id.clone(),
        }
    }
}

pub type ElseEdge = PinnedEdge<ElsePrompt>;
pub type SmsSuccessEdge = PinnedEdge<SentPrompt>;
pub type SmsFailedEdge = PinnedEdge<FailedPrompt>;
