//! # convoflow - Conversation-Flow Graph Model and Tool Surface
//!
//! **convoflow** validates and reshapes the conversation-flow graphs that a
//! voice-agent platform executes: typed nodes, edges with transition
//! conditions, tool bindings and flow-level settings. The graph is never run
//! here; the crate is the checked boundary between a caller and the
//! platform that owns the document.
//!
//! ## Core Workflow
//!
//! 1.  **Validate**: A [`schema::Validator`] walks a raw JSON document against
//!     static shape tables, reporting every violation with its field path
//!     (`nodes[3].edges[0].transition_condition.prompt`), then deserializes it
//!     into the typed model in [`flow`].
//! 2.  **Assemble**: [`assemble`] turns a validated partial update into a body
//!     carrying only the supplied fields, and re-exposes platform responses.
//! 3.  **Forward**: [`tools::FlowTools`] runs `get_conversation_flow`,
//!     `update_conversation_flow` and `create_conversation_flow` against any
//!     [`platform::FlowPlatform`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use convoflow::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let node = Validator::strict().validate_node(&json!({
//!         "type": "end",
//!         "id": "goodbye",
//!     }))?;
//!     assert_eq!(node.type_name(), "end");
//!
//!     let platform = InMemoryPlatform::new().with_flow(json!({
//!         "conversation_flow_id": "cf_1",
//!         "version": 1,
//!         "global_prompt": "Be brief.",
//!     }));
//!     let tools = FlowTools::new(platform);
//!
//!     let updated = tokio_test::block_on(tools.call(
//!         "update_conversation_flow",
//!         json!({ "conversationFlowId": "cf_1", "model_temperature": 0.2 }),
//!     ))?;
//!     assert_eq!(updated["global_prompt"], "Be brief.");
//!     Ok(())
//! }
//! ```

pub mod assemble;
pub mod config;
pub mod error;
pub mod flow;
pub mod platform;
pub mod prelude;
pub mod schema;
pub mod tools;
