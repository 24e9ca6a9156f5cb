//! Flow storage backends behind the platform port.
#![recursion_limit = "256"]
mod common;
use common::*;
use convoflow::platform::PlatformCall;
use convoflow::prelude::*;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

#[cfg(test)]
mod file_platform_tests {
    use super::*;

    fn store_with_full_flow() -> (TempDir, FilePlatform) {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("cf_support.json"),
            serde_json::to_string_pretty(&full_flow()).unwrap(),
        )
        .unwrap();
        let platform = FilePlatform::new(dir.path());
        (dir, platform)
    }

    #[test]
    fn test_retrieve_reads_the_stored_document() {
        let (_dir, platform) = store_with_full_flow();

        let document = tokio_test::block_on(platform.retrieve("cf_support", None)).unwrap();
        assert_eq!(document, Some(full_flow()));

        let document = tokio_test::block_on(platform.retrieve("cf_support", Some(3))).unwrap();
        assert_eq!(document, Some(full_flow()));
    }

    #[test]
    fn test_other_versions_are_not_found() {
        let (_dir, platform) = store_with_full_flow();

        let document = tokio_test::block_on(platform.retrieve("cf_support", Some(2))).unwrap();
        assert_eq!(document, None);

        let err = tokio_test::block_on(platform.update("cf_support", Some(2), json!({})))
            .unwrap_err();
        assert!(matches!(err, PlatformError::NotFound { .. }));
    }

    #[test]
    fn test_ids_outside_the_safe_alphabet_are_not_found() {
        let (_dir, platform) = store_with_full_flow();

        for flow_id in ["../cf_support", "cf/support", ""] {
            let document = tokio_test::block_on(platform.retrieve(flow_id, None)).unwrap();
            assert_eq!(document, None, "{:?}", flow_id);
        }
    }

    #[test]
    fn test_update_writes_through_to_disk() {
        let (dir, platform) = store_with_full_flow();

        let document = tokio_test::block_on(platform.update(
            "cf_support",
            None,
            json!({ "global_prompt": "Be brief." }),
        ))
        .unwrap();
        assert_eq!(document["global_prompt"], json!("Be brief."));

        let text = std::fs::read_to_string(dir.path().join("cf_support.json")).unwrap();
        let on_disk: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(on_disk, document);
        assert_eq!(on_disk["nodes"], full_flow()["nodes"]);
    }

    #[test]
    fn test_create_picks_the_next_free_id() {
        let dir = TempDir::new().unwrap();
        let platform = FilePlatform::new(dir.path().join("flows"));

        let first = tokio_test::block_on(platform.create(json!({ "nodes": [] }))).unwrap();
        let second = tokio_test::block_on(platform.create(json!({ "nodes": [] }))).unwrap();

        assert_eq!(first["conversation_flow_id"], json!("conversation_flow_1"));
        assert_eq!(second["conversation_flow_id"], json!("conversation_flow_2"));
        assert_eq!(second["version"], json!(0));
        assert!(platform.dir().join("conversation_flow_2.json").exists());
    }

    #[test]
    fn test_malformed_store_file_is_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        let platform = FilePlatform::new(dir.path());

        let err = tokio_test::block_on(platform.retrieve("broken", None)).unwrap_err();
        assert!(matches!(err, PlatformError::Json(_)));
    }

    #[test]
    fn test_tools_over_file_store() {
        let (_dir, platform) = store_with_full_flow();
        let tools = FlowTools::new(platform);

        tokio_test::block_on(tools.call(
            "update_conversation_flow",
            json!({ "conversationFlowId": "cf_support", "version": 3, "tool_call_strict_mode": false }),
        ))
        .unwrap();

        let flow = tokio_test::block_on(
            tools.get_conversation_flow(GetConversationFlowInput::new("cf_support")),
        )
        .unwrap();
        assert_eq!(flow.settings.tool_call_strict_mode, Some(false));
        assert_eq!(flow.settings.global_prompt, full_flow()["global_prompt"].as_str().map(String::from));
    }
}

#[cfg(test)]
mod in_memory_platform_tests {
    use super::*;

    #[test]
    fn test_versions_are_kept_apart() {
        let mut older = full_flow();
        older["version"] = json!(2);
        older["global_prompt"] = json!("Older prompt");
        let platform = InMemoryPlatform::new()
            .with_flow(full_flow())
            .with_flow(older);

        assert_eq!(platform.stored("cf_support", None), Some(full_flow()));
        assert_eq!(
            platform.stored("cf_support", Some(2)).unwrap()["global_prompt"],
            json!("Older prompt")
        );

        tokio_test::block_on(platform.update("cf_support", Some(2), json!({ "is_transfer_llm": true })))
            .unwrap();
        assert_eq!(platform.stored("cf_support", None), Some(full_flow()));
        assert_eq!(
            platform.stored("cf_support", Some(2)).unwrap()["is_transfer_llm"],
            json!(true)
        );
    }

    #[test]
    fn test_documents_without_identity_are_ignored() {
        let platform = InMemoryPlatform::new().with_flow(json!({ "nodes": [] }));
        assert!(platform.calls().is_empty());
        assert_eq!(platform.stored("", None), None);
    }

    #[test]
    fn test_shared_platform_records_through_arc() {
        let platform = Arc::new(InMemoryPlatform::new().with_flow(full_flow()));
        let tools = FlowTools::new(Arc::clone(&platform));

        tokio_test::block_on(
            tools.get_conversation_flow(GetConversationFlowInput::new("cf_support").at_version(3)),
        )
        .unwrap();

        assert_eq!(
            platform.calls(),
            vec![PlatformCall::Retrieve {
                flow_id: "cf_support".to_string(),
                version: Some(3),
            }]
        );
    }
}
