use serde::{Deserialize, Deserializer, Serialize};

/// One node of the sales hierarchy as served by the data endpoint.
///
/// The root and platform groups carry `children`; games (leaves) carry
/// `category` and `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SalesNode>>,
}

impl SalesNode {
    pub fn leaf(name: impl Into<String>, category: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            category: Some(category.into()),
            value: Some(value),
            children: None,
        }
    }

    pub fn group(name: impl Into<String>, children: Vec<SalesNode>) -> Self {
        Self {
            name: name.into(),
            category: None,
            value: None,
            children: Some(children),
        }
    }

    pub fn children(&self) -> &[SalesNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

// The published dataset quotes its numbers ("value": "20.61").
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) => {
            let n = s.trim().parse::<f64>().map_err(serde::de::Error::custom)?;
            if !n.is_finite() {
                return Err(serde::de::Error::custom(format!(
                    "value must be a finite number, got {s:?}"
                )));
            }
            Ok(Some(n))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct NodeId(pub u64);

/// Arena node used by the layout engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    pub category: Option<String>,
    pub own_value: f64,
    /// Own value plus the values of every descendant.
    pub value: f64,
    pub depth: usize,
    /// Longest distance to a leaf; leaves are 0.
    pub height: usize,
    pub children: Vec<NodeId>,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Tree {
    pub root: NodeId,
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Flattens a `SalesNode` hierarchy, summing values bottom-up and recording
    /// depth and height of every node.
    pub fn from_sales(root: &SalesNode) -> Self {
        let mut nodes: Vec<TreeNode> = Vec::with_capacity(256);
        let root_id = push_node(&mut nodes, root, 0);
        Tree {
            root: root_id,
            nodes,
        }
    }

    pub fn get(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Leaves in pre-order, matching the order tiles are drawn.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.get(id);
            if node.is_leaf() {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }
}

fn push_node(nodes: &mut Vec<TreeNode>, sales: &SalesNode, depth: usize) -> NodeId {
    let id = NodeId(nodes.len() as u64);
    let own_value = sales.value.unwrap_or(0.0);
    nodes.push(TreeNode {
        id,
        name: sales.name.clone(),
        category: sales.category.clone(),
        own_value,
        value: own_value,
        depth,
        height: 0,
        children: Vec::new(),
        x0: 0.0,
        y0: 0.0,
        x1: 0.0,
        y1: 0.0,
    });

    for child in sales.children() {
        let child_id = push_node(nodes, child, depth + 1);
        let (child_value, child_height) = {
            let c = &nodes[child_id.0 as usize];
            (c.value, c.height)
        };
        let node = &mut nodes[id.0 as usize];
        node.children.push(child_id);
        node.value += child_value;
        node.height = node.height.max(child_height + 1);
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_values() {
        let json = r#"{
            "name": "Video Game Sales Data Top 100",
            "children": [
                { "name": "Wii", "children": [
                    { "name": "Wii Sports", "category": "Wii", "value": "82.53" },
                    { "name": "Mario Kart Wii", "category": "Wii", "value": 35.52 }
                ]}
            ]
        }"#;
        let root: SalesNode = serde_json::from_str(json).unwrap();
        let wii = &root.children()[0];
        assert_eq!(wii.children()[0].value, Some(82.53));
        assert_eq!(wii.children()[1].value, Some(35.52));
        assert_eq!(wii.children()[0].category.as_deref(), Some("Wii"));
        assert!(wii.value.is_none());
    }

    #[test]
    fn rejects_non_numeric_value() {
        let json = r#"{ "name": "x", "category": "A", "value": "lots" }"#;
        assert!(serde_json::from_str::<SalesNode>(json).is_err());
    }

    #[test]
    fn rejects_non_finite_value() {
        for value in ["NaN", "inf", "-infinity"] {
            let json = format!(r#"{{ "name": "x", "category": "A", "value": "{value}" }}"#);
            assert!(serde_json::from_str::<SalesNode>(&json).is_err(), "{value}");
        }
    }

    #[test]
    fn tree_sums_values_and_heights() {
        let root = SalesNode::group(
            "root",
            vec![
                SalesNode::group("A", vec![SalesNode::leaf("x", "A", 10.0)]),
                SalesNode::group(
                    "B",
                    vec![SalesNode::leaf("y", "B", 30.0), SalesNode::leaf("z", "B", 5.0)],
                ),
            ],
        );
        let tree = Tree::from_sales(&root);
        let r = tree.get(tree.root);
        assert_eq!(r.value, 45.0);
        assert_eq!(r.height, 2);
        assert_eq!(r.depth, 0);

        let names: Vec<_> = tree
            .leaves()
            .into_iter()
            .map(|id| tree.get(id).name.clone())
            .collect();
        assert_eq!(names, ["x", "y", "z"]);
    }
}
