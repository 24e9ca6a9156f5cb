//! Validating then re-serializing a complete flow reproduces it.
#![recursion_limit = "256"]
mod common;
use common::*;
use convoflow::assemble;
use convoflow::flow::{Node, TransitionCondition};
use convoflow::prelude::*;
use std::collections::BTreeSet;

#[cfg(test)]
mod roundtrip_tests {
    use super::*;

    #[test]
    fn test_full_flow_round_trips_unchanged() {
        let document = full_flow();
        let flow = Validator::strict()
            .validate_flow(&document)
            .expect("full flow should validate");

        let output = serde_json::to_value(&flow).expect("flow should serialize");
        assert_eq!(output, document);
    }

    #[test]
    fn test_full_flow_covers_every_node_type_and_condition_kind() {
        let flow = Validator::strict().validate_flow(&full_flow()).unwrap();

        let types: BTreeSet<&str> = flow.nodes().iter().map(Node::type_name).collect();
        assert_eq!(types.len(), 11);

        let edges: Vec<_> = flow
            .nodes()
            .iter()
            .flat_map(|node| node.outgoing_edges())
            .collect();
        assert!(edges.iter().any(|(_, e)| matches!(
            e.transition_condition,
            TransitionCondition::Prompt { .. }
        )));
        assert!(edges.iter().any(|(_, e)| matches!(
            e.transition_condition,
            TransitionCondition::Equation { .. }
        )));
    }

    #[test]
    fn test_flow_accessors() {
        let flow = Validator::strict().validate_flow(&full_flow()).unwrap();

        assert_eq!(flow.conversation_flow_id, "cf_support");
        assert_eq!(flow.version, 3);
        assert_eq!(flow.start_node().map(Node::id), Some("greet"));
        assert!(flow.find_node("goodbye").is_some());
        assert!(flow.find_node("nowhere").is_none());
    }

    #[test]
    fn test_output_transform_drops_nulls_and_unknown_keys() {
        let mut document = full_flow();
        document["global_prompt"] = serde_json::Value::Null;
        document["last_modification_timestamp"] = serde_json::json!(1700000000);

        let flow = assemble::transform_output(&document).expect("platform output is lenient");
        assert_eq!(flow.settings.global_prompt, None);

        let output = assemble::output_document(&flow).unwrap();
        let mut expected = full_flow();
        expected.as_object_mut().unwrap().remove("global_prompt");
        assert_eq!(output, expected);
    }

    #[test]
    fn test_flow_requires_identity_and_integer_version() {
        let document = without(full_flow(), "conversation_flow_id");
        let err = Validator::lenient().validate_flow(&document).unwrap_err();
        assert!(err.has_violation_at("conversation_flow_id"));

        let mut document = full_flow();
        document["version"] = serde_json::json!("3");
        let err = Validator::lenient().validate_flow(&document).unwrap_err();
        assert!(err.has_violation_at("version"));
    }

    #[test]
    fn test_integer_valued_numbers_keep_their_form() {
        let mut document = full_flow();
        document["model_temperature"] = serde_json::json!(1);
        document["begin_tag_display_position"] = serde_json::json!({ "x": 0, "y": 120 });
        document["kb_config"]["filter_score"] = serde_json::json!(1);
        document["nodes"][0]["display_position"] = serde_json::json!({ "x": -40, "y": 12.5 });
        document["nodes"][0]["interruption_sensitivity"] = serde_json::json!(0);

        let flow = Validator::strict().validate_flow(&document).unwrap();
        let output = serde_json::to_value(&flow).unwrap();

        assert_eq!(output["model_temperature"].to_string(), "1");
        assert_eq!(output["begin_tag_display_position"].to_string(), r#"{"x":0,"y":120}"#);
        assert_eq!(output, document);
    }

    #[test]
    fn test_platform_output_does_not_bound_temperature() {
        let mut document = full_flow();
        document["model_temperature"] = serde_json::json!(1.7);

        let flow = assemble::transform_output(&document).expect("output temperature is unbounded");
        assert_eq!(
            flow.settings.model_temperature.as_ref().and_then(serde_json::Number::as_f64),
            Some(1.7)
        );
        assert_eq!(assemble::output_document(&flow).unwrap(), document);

        let err = Validator::strict()
            .validate_settings(&serde_json::json!({ "model_temperature": 1.7 }))
            .unwrap_err();
        assert_eq!(err.path().to_string(), "model_temperature");
    }
}
