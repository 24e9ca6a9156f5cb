//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need: the validator, the typed flow
//! model, the platform port and the tool surface.
//!
//! ```rust,no_run
//! use convoflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let document = std::fs::read_to_string("path/to/flow.json")?;
//! let flow = Validator::lenient().validate_flow(&serde_json::from_str(&document)?)?;
//! println!("{} nodes", flow.nodes().len());
//! # Ok(())
//! # }
//! ```

// Validation
pub use crate::schema::{FieldPath, NullPolicy, Validator};

// Flow model
pub use crate::flow::{ConversationFlow, Edge, FlowSettings, Node, NodeBase, Tool, TransitionCondition};

// Platform port and tools
pub use crate::assemble::UpdateRequest;
pub use crate::platform::{FilePlatform, FlowPlatform, InMemoryPlatform};
pub use crate::tools::{FlowTools, GetConversationFlowInput, UpdateConversationFlowInput};

// Configuration
pub use crate::config::Settings;

// Error types
pub use crate::error::{FlowError, PlatformError, ValidationError, Violation};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
