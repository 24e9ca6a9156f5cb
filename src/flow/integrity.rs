//! Cross-reference checks the shape layer cannot express: id uniqueness and
//! id-based links between nodes, edges and tools.

use super::definition::{ConversationFlow, FlowSettings};
use super::node::{Node, Scope};
use super::tool::Tool;
use crate::error::{SchemaViolation, Violation};
use crate::schema::FieldPath;
use ahash::AHashSet;
use itertools::Itertools;

/// Checks every node list of the flow, including component sub-graphs.
pub fn check_flow(flow: &ConversationFlow) -> Vec<SchemaViolation> {
    check_settings(&flow.settings)
}

/// Checks whatever part of a flow the settings carry. Links into lists the
/// document does not include are not checked.
pub fn check_settings(settings: &FlowSettings) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();
    let root = FieldPath::root();

    if let Some(tools) = &settings.tools {
        check_tool_ids(tools, &root, &mut violations);
    }
    if let Some(nodes) = &settings.nodes {
        check_graph(
            Graph {
                nodes,
                start_node_id: settings.start_node_id.as_deref(),
                local_tools: settings.tools.as_deref(),
            },
            &root,
            &mut violations,
        );
    }

    for (i, component) in settings.components.iter().flatten().enumerate() {
        let scope = root.clone().field("components").index(i);
        if let Some(tools) = &component.tools {
            check_tool_ids(tools, &scope, &mut violations);
        }
        // Component nodes may call tools declared on the component or the flow.
        let local_tools: Option<Vec<Tool>> = match (&component.tools, &settings.tools) {
            (None, None) => None,
            (own, flow) => Some(own.iter().chain(flow.iter()).flatten().cloned().collect()),
        };
        check_graph(
            Graph {
                nodes: &component.nodes,
                start_node_id: component.start_node_id.as_deref(),
                local_tools: local_tools.as_deref(),
            },
            &scope,
            &mut violations,
        );
    }

    violations
}

struct Graph<'a> {
    nodes: &'a [Node],
    start_node_id: Option<&'a str>,
    local_tools: Option<&'a [Tool]>,
}

fn check_tool_ids(tools: &[Tool], scope: &FieldPath, out: &mut Vec<SchemaViolation>) {
    let mut seen = AHashSet::new();
    for (i, tool) in tools.iter().enumerate() {
        if !seen.insert(tool.tool_id()) {
            out.push(SchemaViolation {
                path: scope.clone().field("tools").index(i).field("tool_id"),
                violation: Violation::DuplicateId {
                    kind: "tool",
                    id: tool.tool_id().to_string(),
                },
            });
        }
    }
}

fn check_graph(graph: Graph<'_>, scope: &FieldPath, out: &mut Vec<SchemaViolation>) {
    let node_path = |i: usize| scope.clone().field("nodes").index(i);

    let mut ids = AHashSet::new();
    for (i, node) in graph.nodes.iter().enumerate() {
        if !ids.insert(node.id()) {
            out.push(SchemaViolation {
                path: node_path(i).field("id"),
                violation: Violation::DuplicateId {
                    kind: "node",
                    id: node.id().to_string(),
                },
            });
        }
    }

    if let Some(start) = graph.start_node_id {
        if !graph.nodes.is_empty() && !ids.contains(start) {
            out.push(SchemaViolation {
                path: scope.clone().field("start_node_id"),
                violation: Violation::DanglingReference {
                    target: "node",
                    id: start.to_string(),
                },
            });
        }
    }

    for (i, node) in graph.nodes.iter().enumerate() {
        for (edge_path, edge) in node.outgoing_edges() {
            let Some(destination) = edge.destination_node_id.as_deref() else {
                continue;
            };
            if !ids.contains(destination) {
                out.push(SchemaViolation {
                    path: node_path(i).join(&edge_path).field("destination_node_id"),
                    violation: Violation::DanglingReference {
                        target: "node",
                        id: destination.to_string(),
                    },
                });
            }
        }
    }

    if let Some(tools) = graph.local_tools {
        let declared: AHashSet<&str> = tools.iter().map(Tool::tool_id).collect();
        let unknown = graph.nodes.iter().enumerate().filter_map(|(i, node)| match node {
            Node::Function(function)
                if function.tool_type == Scope::Local
                    && !declared.contains(function.tool_id.as_str()) =>
            {
                Some((i, function.tool_id.as_str()))
            }
            _ => None,
        });
        out.extend(unknown.map(|(i, tool_id)| SchemaViolation {
            path: node_path(i).field("tool_id"),
            violation: Violation::DanglingReference {
                target: "tool",
                id: tool_id.to_string(),
            },
        }));
    }
}

/// Node ids that occur more than once, in first-seen order.
pub fn duplicate_node_ids(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(Node::id).duplicates().collect()
}
