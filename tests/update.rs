//! Partial update semantics, checked against the recording in-memory platform.
#![recursion_limit = "256"]
mod common;
use common::*;
use convoflow::assemble::{self, apply_update};
use convoflow::platform::PlatformCall;
use convoflow::prelude::*;
use serde_json::{Number, json};

#[cfg(test)]
mod update_tests {
    use super::*;

    fn tools_with_full_flow() -> FlowTools<InMemoryPlatform> {
        FlowTools::new(InMemoryPlatform::new().with_flow(full_flow()))
    }

    #[test]
    fn test_update_sends_only_the_supplied_field() {
        let tools = tools_with_full_flow();

        let output = tokio_test::block_on(tools.call(
            "update_conversation_flow",
            json!({ "conversationFlowId": "cf_support", "global_prompt": "x" }),
        ))
        .expect("update should succeed");

        assert_eq!(
            tools.platform().calls(),
            vec![PlatformCall::Update {
                flow_id: "cf_support".to_string(),
                version: None,
                body: json!({ "global_prompt": "x" }),
            }]
        );

        let mut expected = full_flow();
        expected["global_prompt"] = json!("x");
        assert_eq!(output, expected);
        assert_eq!(tools.platform().stored("cf_support", None), Some(expected));
    }

    #[test]
    fn test_typed_update_matches_json_update() {
        let tools = tools_with_full_flow();
        let changes = FlowSettings {
            global_prompt: Some("x".to_string()),
            ..Default::default()
        };

        let flow = tokio_test::block_on(
            tools.update_conversation_flow(UpdateConversationFlowInput::new("cf_support", changes)),
        )
        .unwrap();

        assert_eq!(
            tools.platform().last_update_body(),
            Some(json!({ "global_prompt": "x" }))
        );
        assert_eq!(flow.settings.global_prompt.as_deref(), Some("x"));
        assert_eq!(
            flow.settings.model_temperature.as_ref().and_then(Number::as_f64),
            Some(0.3)
        );
        assert_eq!(flow.nodes().len(), 11);
    }

    #[test]
    fn test_update_replaces_whole_lists() {
        let tools = tools_with_full_flow();
        let output = tokio_test::block_on(tools.call(
            "update_conversation_flow",
            json!({
                "conversationFlowId": "cf_support",
                "nodes": [minimal_node("end")],
                "start_node_id": "end_node",
            }),
        ))
        .unwrap();

        assert_eq!(output["nodes"], json!([minimal_node("end")]));
        assert_eq!(output["tools"], full_flow()["tools"]);
    }

    #[test]
    fn test_update_forwards_version_given_as_string() {
        let tools = tools_with_full_flow();
        tokio_test::block_on(tools.call(
            "update_conversation_flow",
            json!({ "conversationFlowId": "cf_support", "version": "3", "is_transfer_llm": true }),
        ))
        .unwrap();

        match &tools.platform().calls()[0] {
            PlatformCall::Update { version, body, .. } => {
                assert_eq!(*version, Some(3));
                assert_eq!(body, &json!({ "is_transfer_llm": true }));
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[test]
    fn test_empty_update_sends_empty_body() {
        let tools = tools_with_full_flow();
        let output = tokio_test::block_on(tools.call(
            "update_conversation_flow",
            json!({ "conversationFlowId": "cf_support" }),
        ))
        .unwrap();

        assert_eq!(tools.platform().last_update_body(), Some(json!({})));
        assert_eq!(output, full_flow());
    }

    #[test]
    fn test_invalid_update_never_reaches_the_platform() {
        let tools = tools_with_full_flow();
        let err = tokio_test::block_on(tools.call(
            "update_conversation_flow",
            json!({ "conversationFlowId": "cf_support", "model_temperature": 3.0 }),
        ))
        .unwrap_err();

        match err {
            FlowError::Validation(e) => assert_eq!(e.path().to_string(), "model_temperature"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(tools.platform().calls().is_empty());
    }

    #[test]
    fn test_typed_update_is_held_to_the_same_bounds() {
        let tools = tools_with_full_flow();
        let changes = FlowSettings {
            model_temperature: Number::from_f64(1.5),
            ..Default::default()
        };

        let err = tokio_test::block_on(
            tools.update_conversation_flow(UpdateConversationFlowInput::new("cf_support", changes)),
        )
        .unwrap_err();
        assert!(matches!(err, FlowError::Validation(_)));
        assert!(tools.platform().calls().is_empty());
    }

    #[test]
    fn test_update_request_body_omits_unset_fields() {
        let input = UpdateConversationFlowInput::new(
            "cf_support",
            FlowSettings {
                start_node_id: Some("greet".to_string()),
                tool_call_strict_mode: Some(false),
                ..Default::default()
            },
        );
        let request = assemble::update_request(input);

        assert_eq!(request.flow_id, "cf_support");
        assert_eq!(request.version, None);
        assert_eq!(
            request.body_json().unwrap(),
            json!({ "start_node_id": "greet", "tool_call_strict_mode": false })
        );
        assert_eq!(
            request.body.present_fields(),
            vec!["tool_call_strict_mode", "start_node_id"]
        );
    }

    #[test]
    fn test_apply_update_replaces_top_level_keys_only() {
        let mut document = json!({
            "global_prompt": "old",
            "kb_config": { "top_k": 3, "filter_score": 0.5 },
        });
        apply_update(&mut document, &json!({ "kb_config": { "top_k": 5 } }));

        assert_eq!(
            document,
            json!({ "global_prompt": "old", "kb_config": { "top_k": 5 } })
        );
    }

    #[test]
    fn test_update_of_unknown_flow_is_not_found() {
        let tools = tools_with_full_flow();
        let err = tokio_test::block_on(tools.call(
            "update_conversation_flow",
            json!({ "conversationFlowId": "cf_missing", "global_prompt": "x" }),
        ))
        .unwrap_err();

        assert!(matches!(err, FlowError::NotFound { ref flow_id, .. } if flow_id == "cf_missing"));
    }
}
