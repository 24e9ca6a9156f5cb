//! Common fixtures: minimal node documents and a full flow exercising every node type.
#![allow(unused_attributes)]
#![recursion_limit = "256"]
use serde_json::{Value, json};

#[allow(dead_code)]
pub fn prompt_edge(id: &str, prompt: &str, destination: &str) -> Value {
    json!({
        "id": id,
        "transition_condition": { "type": "prompt", "prompt": prompt },
        "destination_node_id": destination,
    })
}

/// An edge without a destination, pinned to the given literal prompt.
#[allow(dead_code)]
pub fn pinned_edge(id: &str, prompt: &str) -> Value {
    json!({
        "id": id,
        "transition_condition": { "type": "prompt", "prompt": prompt },
    })
}

#[allow(dead_code)]
pub fn equation(left: &str) -> Value {
    json!({ "left": left, "operator": "==", "right": "yes" })
}

/// An equation edge combining `count` copies of the same sub-equation.
#[allow(dead_code)]
pub fn equation_edge(id: &str, count: usize) -> Value {
    let equations: Vec<Value> = (0..count).map(|i| equation(&format!("var_{}", i))).collect();
    json!({
        "id": id,
        "transition_condition": {
            "type": "equation",
            "equations": equations,
            "operator": "&&",
        },
    })
}

/// A node of the given type carrying only its required fields.
#[allow(dead_code)]
pub fn minimal_node(node_type: &str) -> Value {
    let id = format!("{}_node", node_type);
    match node_type {
        "conversation" => json!({
            "type": "conversation",
            "id": id,
            "instruction": { "type": "prompt", "text": "Greet the caller." },
        }),
        "end" => json!({ "type": "end", "id": id }),
        "function" => json!({
            "type": "function",
            "id": id,
            "tool_id": "tool_lookup",
            "tool_type": "local",
            "wait_for_result": true,
        }),
        "transfer_call" => json!({
            "type": "transfer_call",
            "id": id,
            "transfer_destination": { "type": "predefined", "number": "+14155550100" },
            "transfer_option": { "type": "cold_transfer" },
            "edge": pinned_edge("transfer_failed", "Transfer failed"),
        }),
        "press_digit" => json!({
            "type": "press_digit",
            "id": id,
            "instruction": { "type": "prompt", "text": "Press 1 for sales." },
        }),
        "branch" => json!({
            "type": "branch",
            "id": id,
            "else_edge": pinned_edge("branch_else", "Else"),
        }),
        "sms" => json!({
            "type": "sms",
            "id": id,
            "instruction": { "type": "static_text", "text": "Here is your link." },
            "success_edge": pinned_edge("sms_sent", "Sent successfully"),
            "failed_edge": pinned_edge("sms_failed", "Failed to send"),
        }),
        "extract_dynamic_variables" => json!({
            "type": "extract_dynamic_variables",
            "id": id,
            "variables": [
                { "type": "string", "name": "caller_name", "description": "The caller's name" }
            ],
        }),
        "agent_swap" => json!({
            "type": "agent_swap",
            "id": id,
            "agent_id": "agent_billing",
            "post_call_analysis_setting": "both_agents",
            "edge": pinned_edge("swap_failed", "Swap failed"),
        }),
        "mcp" => json!({
            "type": "mcp",
            "id": id,
            "mcp_id": "mcp_crm",
            "mcp_tool_name": "lookup_customer",
            "wait_for_result": false,
        }),
        "component" => json!({
            "type": "component",
            "id": id,
            "component_id": "comp_verify",
            "component_type": "shared",
            "else_edge": pinned_edge("component_else", "Else"),
        }),
        other => panic!("no fixture for node type {}", other),
    }
}

/// Fields a node of the given type cannot omit, the shared `id` included.
#[allow(dead_code)]
pub fn required_fields(node_type: &str) -> Vec<&'static str> {
    let own: &[&'static str] = match node_type {
        "conversation" => &["instruction"],
        "end" => &[],
        "function" => &["tool_id", "tool_type", "wait_for_result"],
        "transfer_call" => &["transfer_destination", "transfer_option", "edge"],
        "press_digit" => &["instruction"],
        "branch" => &["else_edge"],
        "sms" => &["instruction", "success_edge", "failed_edge"],
        "extract_dynamic_variables" => &["variables"],
        "agent_swap" => &["agent_id", "post_call_analysis_setting", "edge"],
        "mcp" => &["mcp_id", "mcp_tool_name", "wait_for_result"],
        "component" => &["component_id", "component_type", "else_edge"],
        other => panic!("no fixture for node type {}", other),
    };
    std::iter::once("id").chain(own.iter().copied()).collect()
}

/// Removes a top-level key from an object document.
#[allow(dead_code)]
pub fn without(mut document: Value, key: &str) -> Value {
    document
        .as_object_mut()
        .expect("fixture is an object")
        .remove(key);
    document
}

#[allow(dead_code)]
pub fn custom_tool(timeout_ms: u64) -> Value {
    json!({
        "type": "custom",
        "tool_id": "tool_lookup",
        "name": "lookup_order",
        "url": "https://api.example.com/orders",
        "timeout_ms": timeout_ms,
    })
}

/// A stored flow with one node of each of the eleven types, both condition
/// kinds, every tool type, a component and an MCP endpoint. Every optional
/// field is populated with a non-null value so the document survives a
/// validate-and-serialize cycle unchanged.
#[allow(dead_code)]
pub fn full_flow() -> Value {
    json!({
        "conversation_flow_id": "cf_support",
        "version": 3,
        "model_choice": { "type": "cascading", "model": "gpt-4.1", "high_priority": false },
        "model_temperature": 0.3,
        "tool_call_strict_mode": true,
        "knowledge_base_ids": ["kb_faq"],
        "kb_config": { "top_k": 3, "filter_score": 0.6 },
        "start_speaker": "agent",
        "begin_after_user_silence_ms": 2000,
        "global_prompt": "You are a support agent for Example Corp.",
        "default_dynamic_variables": { "company": "Example Corp" },
        "begin_tag_display_position": { "x": 0.0, "y": 0.0 },
        "is_transfer_llm": false,
        "start_node_id": "greet",
        "tools": [
            {
                "type": "custom",
                "tool_id": "tool_lookup",
                "name": "lookup_order",
                "description": "Looks up an order",
                "url": "https://api.example.com/orders",
                "method": "POST",
                "headers": { "Authorization": "Bearer token" },
                "query_params": { "source": "voice" },
                "timeout_ms": 30000,
                "parameters": {
                    "type": "object",
                    "properties": { "order_id": { "type": "string" } },
                    "required": ["order_id"]
                },
                "response_variables": { "status": "$.order.status" }
            },
            {
                "type": "check_availability_cal",
                "tool_id": "tool_availability",
                "name": "check_availability",
                "cal_api_key": "cal_live_key",
                "event_type_id": 12345,
                "timezone": "America/New_York"
            },
            {
                "type": "book_appointment_cal",
                "tool_id": "tool_booking",
                "name": "book_appointment",
                "description": "Books a slot",
                "cal_api_key": "cal_live_key",
                "event_type_id": 12345
            }
        ],
        "mcps": [
            {
                "name": "crm",
                "url": "https://mcp.example.com",
                "headers": { "X-Key": "secret" },
                "query_params": { "region": "us" },
                "timeout_ms": 5000
            }
        ],
        "components": [
            {
                "name": "verify_identity",
                "start_node_id": "ask_dob",
                "begin_tag_display_position": { "x": 10.0, "y": 20.0 },
                "tools": [],
                "nodes": [
                    {
                        "type": "conversation",
                        "id": "ask_dob",
                        "instruction": { "type": "prompt", "text": "Ask for the date of birth." }
                    }
                ]
            }
        ],
        "nodes": [
            {
                "type": "conversation",
                "id": "greet",
                "name": "Greeting",
                "display_position": { "x": 100.0, "y": 250.5 },
                "instruction": { "type": "prompt", "text": "Greet the caller and ask how to help." },
                "model_choice": { "type": "cascading", "model": "gpt-4o-mini" },
                "interruption_sensitivity": 0.8,
                "knowledge_base_ids": ["kb_faq"],
                "edges": [
                    prompt_edge("greet_to_lookup", "Caller asks about an order", "lookup"),
                    {
                        "id": "greet_to_branch",
                        "transition_condition": {
                            "type": "equation",
                            "equations": [
                                { "left": "{{customer_tier}}", "operator": "==", "right": "gold" },
                                { "left": "{{order_id}}", "operator": "exists" }
                            ],
                            "operator": "||"
                        },
                        "destination_node_id": "route"
                    }
                ]
            },
            {
                "type": "function",
                "id": "lookup",
                "tool_id": "tool_lookup",
                "tool_type": "local",
                "wait_for_result": true,
                "speak_during_execution": true,
                "instruction": { "type": "static_text", "text": "One moment please." },
                "interruption_sensitivity": 0.5,
                "edges": [prompt_edge("lookup_done", "Lookup finished", "route")]
            },
            {
                "type": "branch",
                "id": "route",
                "edges": [prompt_edge("route_sms", "Caller wants a link", "send_link")],
                "else_edge": {
                    "id": "route_else",
                    "transition_condition": { "type": "prompt", "prompt": "Else" },
                    "destination_node_id": "collect"
                }
            },
            {
                "type": "sms",
                "id": "send_link",
                "instruction": { "type": "prompt", "text": "Send the tracking link." },
                "success_edge": {
                    "id": "sms_ok",
                    "transition_condition": { "type": "prompt", "prompt": "Sent successfully" },
                    "destination_node_id": "goodbye"
                },
                "failed_edge": {
                    "id": "sms_failed",
                    "transition_condition": { "type": "prompt", "prompt": "Failed to send" },
                    "destination_node_id": "transfer"
                }
            },
            {
                "type": "extract_dynamic_variables",
                "id": "collect",
                "variables": [
                    { "type": "string", "name": "caller_name", "description": "Name", "examples": ["Ada"] },
                    { "type": "enum", "name": "reason", "description": "Reason", "choices": ["billing", "delivery"] },
                    { "type": "boolean", "name": "is_urgent", "description": "Urgent?" },
                    { "type": "number", "name": "order_count", "description": "Orders" }
                ],
                "edges": [prompt_edge("collect_done", "Variables collected", "menu")]
            },
            {
                "type": "press_digit",
                "id": "menu",
                "instruction": { "type": "prompt", "text": "Navigate the phone menu to billing." },
                "delay_ms": 500,
                "edges": [prompt_edge("menu_done", "Reached billing", "crm")]
            },
            {
                "type": "mcp",
                "id": "crm",
                "mcp_id": "crm",
                "mcp_tool_name": "lookup_customer",
                "wait_for_result": true,
                "response_variables": { "tier": "$.tier" },
                "speak_during_execution": false,
                "instruction": { "type": "prompt", "text": "Tell the caller you are checking." },
                "interruption_sensitivity": 1.0,
                "edges": [prompt_edge("crm_done", "Customer found", "verify")]
            },
            {
                "type": "component",
                "id": "verify",
                "component_id": "verify_identity",
                "component_type": "local",
                "else_edge": {
                    "id": "verify_else",
                    "transition_condition": { "type": "prompt", "prompt": "Else" },
                    "destination_node_id": "swap"
                }
            },
            {
                "type": "agent_swap",
                "id": "swap",
                "agent_id": "agent_billing",
                "agent_version": 2,
                "post_call_analysis_setting": "only_destination_agent",
                "webhook_setting": "only_source_agent",
                "edge": prompt_edge("swap_failed", "Swap failed", "transfer")
            },
            {
                "type": "transfer_call",
                "id": "transfer",
                "transfer_destination": { "type": "inferred", "prompt": "Transfer to the billing desk" },
                "transfer_option": {
                    "type": "warm_transfer",
                    "show_transferee_as_caller": true,
                    "agent_detection_timeout_ms": 30000,
                    "on_hold_music": "relaxing_sound",
                    "public_handoff_option": { "type": "prompt", "prompt": "Introduce the caller" },
                    "opt_out_human_detection": false,
                    "opt_out_initial_message": true
                },
                "ignore_e164_validation": false,
                "custom_sip_headers": { "X-Queue": "billing" },
                "edge": prompt_edge("transfer_failed", "Transfer failed", "goodbye")
            },
            {
                "type": "end",
                "id": "goodbye",
                "name": "Goodbye"
            }
        ]
    })
}

#[allow(dead_code)]
pub const NODE_TYPES: [&str; 11] = [
    "conversation",
    "end",
    "function",
    "transfer_call",
    "press_digit",
    "branch",
    "sms",
    "extract_dynamic_variables",
    "agent_swap",
    "mcp",
    "component",
];
