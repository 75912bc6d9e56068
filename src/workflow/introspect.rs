//! Finding the picture-input nodes a workflow actually consumes

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

use super::rules::{picture_input_rule, PictureInputKind};
use crate::client::{Client, Transport};
use crate::error::Result;
use crate::types::WorkflowGraph;

/// Input name through which downstream nodes consume an image
const IMAGE_INPUT: &str = "image";

/// A picture-input node of a workflow
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PictureInputNode {
    pub node_id: String,
    pub class_type: String,
    pub field_name: String,
    pub kind: PictureInputKind,
}

/// Returns the picture-input nodes whose output feeds another node's
/// `image` input, ordered by numeric node id.
///
/// Nodes that load a picture nobody consumes are left out.
pub fn find_picture_input_nodes(graph: &WorkflowGraph) -> Vec<PictureInputNode> {
    let mut referenced = HashSet::new();
    let mut candidates = Vec::new();

    for (node_id, node) in graph {
        if let Some(rule) = picture_input_rule(&node.class_type) {
            candidates.push(PictureInputNode {
                node_id: node_id.clone(),
                class_type: node.class_type.clone(),
                field_name: rule.field_name.to_string(),
                kind: rule.kind,
            });
        }
        if let Some(source) = node.inputs.get(IMAGE_INPUT).and_then(referenced_node_id) {
            // a node never consumes its own output
            if parse_node_id(node_id) != Some(source) {
                referenced.insert(source);
            }
        }
    }

    let mut nodes: Vec<(i64, PictureInputNode)> = candidates
        .into_iter()
        .filter_map(|node| parse_node_id(&node.node_id).map(|id| (id, node)))
        .filter(|(id, _)| referenced.contains(id))
        .collect();
    nodes.sort_by_key(|(id, _)| *id);
    nodes.into_iter().map(|(_, node)| node).collect()
}

/// Node id an input value links to.
///
/// Links look like `["10", 0]` (source node, output slot); only the
/// source node counts. Non-numeric or non-positive values yield `None`.
fn referenced_node_id(value: &Value) -> Option<i64> {
    let source = match value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    let id = match source {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => parse_node_id(s)?,
        _ => return None,
    };
    (id > 0).then_some(id)
}

fn parse_node_id(id: &str) -> Option<i64> {
    id.trim().parse().ok()
}

impl<T: Transport> Client<T> {
    /// Fetches a workflow and lists the picture-input nodes it consumes
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use runninghub_rust_sdk::prelude::*;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::new(ClientConfig::new("my-api-key"))?;
    /// for node in client.picture_input_nodes("1904136902449209346").await? {
    ///     println!("{} {} ({})", node.node_id, node.field_name, node.kind);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn picture_input_nodes(&self, workflow_id: &str) -> Result<Vec<PictureInputNode>> {
        let graph = self.workflow_json(workflow_id).await?;
        let nodes = find_picture_input_nodes(&graph);
        log::debug!(
            "workflow {} has {} nodes, {} consumed picture inputs",
            workflow_id,
            graph.len(),
            nodes.len()
        );
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::scripted_client;
    use serde_json::json;

    fn graph(value: Value) -> WorkflowGraph {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_referenced_load_image_is_included() {
        let graph = graph(json!({
            "10": {"class_type": "LoadImage", "inputs": {"image": "cat.png"}},
            "12": {"class_type": "ImageScale", "inputs": {"image": ["10", 0], "width": 512}}
        }));
        let nodes = find_picture_input_nodes(&graph);
        assert_eq!(
            nodes,
            vec![PictureInputNode {
                node_id: "10".to_string(),
                class_type: "LoadImage".to_string(),
                field_name: "image".to_string(),
                kind: PictureInputKind::File,
            }]
        );
    }

    #[test]
    fn test_unreferenced_load_image_is_excluded() {
        let graph = graph(json!({
            "10": {"class_type": "LoadImage", "inputs": {"image": "cat.png"}},
            "12": {"class_type": "ImageScale", "inputs": {"width": 512}}
        }));
        assert!(find_picture_input_nodes(&graph).is_empty());
    }

    #[test]
    fn test_self_reference_does_not_count() {
        let graph = graph(json!({
            "10": {"class_type": "LoadImage", "inputs": {"image": "10"}},
            "12": {"class_type": "ImageScale", "inputs": {"width": 512}}
        }));
        assert!(find_picture_input_nodes(&graph).is_empty());

        let graph2 = self::graph(json!({
            "10": {"class_type": "LoadImage", "inputs": {"image": ["10", 0]}},
            "12": {"class_type": "ImageScale", "inputs": {"image": 10}}
        }));
        let ids: Vec<_> = find_picture_input_nodes(&graph2)
            .into_iter()
            .map(|n| n.node_id)
            .collect();
        assert_eq!(ids, vec!["10"]);
    }

    #[test]
    fn test_numeric_references_match_string_ids() {
        let graph = graph(json!({
            "7": {"class_type": "LoadImageFromBase64", "inputs": {"data": ""}},
            "8": {"class_type": "LoadImageFromUrl", "inputs": {"image": "https://x/y.png"}},
            "20": {"class_type": "VAEEncode", "inputs": {"image": [7, 0]}},
            "21": {"class_type": "VAEEncode", "inputs": {"image": ["8", 0]}}
        }));
        let nodes = find_picture_input_nodes(&graph);
        let ids: Vec<_> = nodes.iter().map(|n| n.node_id.as_str()).collect();
        assert_eq!(ids, vec!["7", "8"]);
        assert_eq!(nodes[0].kind, PictureInputKind::Base64);
        assert_eq!(nodes[0].field_name, "data");
        assert_eq!(nodes[1].kind, PictureInputKind::Url);
    }

    #[test]
    fn test_results_are_ordered_numerically() {
        let graph = graph(json!({
            "100": {"class_type": "LoadImage", "inputs": {"image": "a.png"}},
            "9": {"class_type": "LoadImageMask", "inputs": {"image": "b.png"}},
            "50": {"class_type": "Blend", "inputs": {"image": ["100", 0]}},
            "51": {"class_type": "Blend", "inputs": {"image": ["9", 0]}}
        }));
        let ids: Vec<_> = find_picture_input_nodes(&graph)
            .into_iter()
            .map(|n| n.node_id)
            .collect();
        assert_eq!(ids, vec!["9", "100"]);
    }

    #[test]
    fn test_malformed_references_are_ignored() {
        let graph = graph(json!({
            "10": {"class_type": "LoadImage", "inputs": {"image": "cat.png"}},
            "11": {"class_type": "Foo", "inputs": {"image": []}},
            "12": {"class_type": "Foo", "inputs": {"image": [null, 0]}},
            "13": {"class_type": "Foo", "inputs": {"image": ["abc", 0]}},
            "14": {"class_type": "Foo", "inputs": {"image": [-10, 0]}},
            "15": {"class_type": "Foo", "inputs": {"image": {"nested": 10}}}
        }));
        assert!(find_picture_input_nodes(&graph).is_empty());
    }

    #[test]
    fn test_output_slot_is_not_a_reference() {
        let graph = graph(json!({
            "1": {"class_type": "LoadImage", "inputs": {"image": "a.png"}},
            "5": {"class_type": "Other", "inputs": {"image": ["3", 1]}}
        }));
        assert!(find_picture_input_nodes(&graph).is_empty());
    }

    #[test]
    fn test_non_numeric_node_ids_are_skipped() {
        let graph = graph(json!({
            "loader": {"class_type": "LoadImage", "inputs": {"image": "a.png"}},
            "5": {"class_type": "Other", "inputs": {"image": ["loader", 0]}}
        }));
        assert!(find_picture_input_nodes(&graph).is_empty());
    }

    #[test]
    fn test_referenced_node_id() {
        assert_eq!(referenced_node_id(&json!(["10", 0])), Some(10));
        assert_eq!(referenced_node_id(&json!([10, 0])), Some(10));
        assert_eq!(referenced_node_id(&json!(" 10 ")), Some(10));
        assert_eq!(referenced_node_id(&json!(0)), None);
        assert_eq!(referenced_node_id(&json!("cat.png")), None);
        assert_eq!(referenced_node_id(&json!(true)), None);
    }

    #[tokio::test]
    async fn test_picture_input_nodes_fetches_workflow() {
        let (client, transport) = scripted_client();
        let prompt = json!({
            "10": {"class_type": "LoadImage", "inputs": {"image": "cat.png"}},
            "11": {"class_type": "LoadImage", "inputs": {"image": "dog.png"}},
            "12": {"class_type": "ImageScale", "inputs": {"image": ["10", 0]}}
        });
        transport.push_ok(json!({ "prompt": prompt.to_string() }));

        let nodes = client.picture_input_nodes("wf").await.unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].node_id, "10");
        assert_eq!(transport.call_count(), 1);
    }
}
