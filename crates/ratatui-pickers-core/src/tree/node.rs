//! Tree data and the top-down traversals over it.

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use super::state::FlagMap;

/// Identifier of a tree node, numeric or textual.
///
/// Ids compare by their display form, so `NodeId::from(7)` equals `NodeId::from("7")`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum NodeId {
    Num(i64),
    Text(String),
}

impl NodeId {
    fn key(&self) -> std::borrow::Cow<'_, str> {
        match self {
            NodeId::Num(n) => std::borrow::Cow::Owned(n.to_string()),
            NodeId::Text(s) => std::borrow::Cow::Borrowed(s),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Num(n) => write!(f, "{n}"),
            NodeId::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for NodeId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeId::Num(a), NodeId::Num(b)) => a == b,
            _ => self.key() == other.key(),
        }
    }
}

impl Eq for NodeId {}

impl Hash for NodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId::Num(n)
    }
}

impl From<i32> for NodeId {
    fn from(n: i32) -> Self {
        NodeId::Num(n.into())
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::Text(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId::Text(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TreeNode {
    pub id: NodeId,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub icon: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub children: Option<Vec<TreeNode>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub disabled: bool,
    #[cfg_attr(feature = "serde", serde(default, rename = "isLoadable"))]
    pub loadable: bool,
}

impl TreeNode {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            children: None,
            disabled: false,
            loadable: false,
        }
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// Marks the node as fetching its children on first expand.
    pub fn loadable(mut self) -> Self {
        self.loadable = true;
        if self.children.is_none() {
            self.children = Some(Vec::new());
        }
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// `true` when the node has children to show or can fetch them. An empty list on a node
    /// that is not loadable makes it a leaf.
    pub fn has_children(&self) -> bool {
        !self.children().is_empty() || self.loadable
    }

    /// A loadable node whose children have not been fetched yet.
    pub fn needs_load(&self) -> bool {
        self.loadable && self.children.as_ref().is_none_or(|c| c.is_empty())
    }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// First node with `id` in pre-order.
pub fn find_node<'a>(items: &'a [TreeNode], id: &NodeId) -> Option<&'a TreeNode> {
    for node in items {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(node.children(), id) {
            return Some(found);
        }
    }
    None
}

pub fn find_node_mut<'a>(items: &'a mut [TreeNode], id: &NodeId) -> Option<&'a mut TreeNode> {
    for node in items {
        if &node.id == id {
            return Some(node);
        }
        if let Some(children) = node.children.as_deref_mut() {
            if let Some(found) = find_node_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Ids of `node` and everything beneath it, pre-order.
pub fn descendant_ids(node: &TreeNode) -> Vec<NodeId> {
    let mut out = Vec::new();
    collect_ids(node, &mut out);
    out
}

fn collect_ids(node: &TreeNode, out: &mut Vec<NodeId>) {
    out.push(node.id.clone());
    for child in node.children() {
        collect_ids(child, out);
    }
}

/// Every id in the forest, pre-order.
pub fn all_ids(items: &[TreeNode]) -> Vec<NodeId> {
    let mut out = Vec::new();
    for node in items {
        collect_ids(node, &mut out);
    }
    out
}

/// Replaces the children of the first node with `id`; returns `false` when no node matches.
pub fn replace_children(items: &mut [TreeNode], id: &NodeId, children: Vec<TreeNode>) -> bool {
    match find_node_mut(items, id) {
        Some(node) => {
            node.children = Some(children);
            true
        }
        None => false,
    }
}

/// One on-screen line of a flattened tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: NodeId,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
    pub disabled: bool,
}

/// Flattens the forest in pre-order, descending only into expanded nodes.
pub fn visible_rows(items: &[TreeNode], expanded: &FlagMap) -> Vec<VisibleRow> {
    let mut out = Vec::new();
    push_rows(items, expanded, 0, &mut out);
    out
}

fn push_rows(items: &[TreeNode], expanded: &FlagMap, depth: usize, out: &mut Vec<VisibleRow>) {
    for node in items {
        let is_open = expanded.get(&node.id);
        out.push(VisibleRow {
            id: node.id.clone(),
            depth,
            has_children: node.has_children(),
            expanded: is_open,
            disabled: node.disabled,
        });
        if is_open {
            push_rows(node.children(), expanded, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn sample() -> Vec<TreeNode> {
        vec![
            TreeNode::new(1, "src").with_children(vec![
                TreeNode::new(2, "lib.rs"),
                TreeNode::new(3, "tree").with_children(vec![TreeNode::new(4, "node.rs")]),
            ]),
            TreeNode::new("docs", "docs").loadable(),
        ]
    }

    #[test]
    fn ids_compare_by_display_form() {
        assert_eq!(NodeId::from(7), NodeId::from("7"));
        assert_ne!(NodeId::from(7), NodeId::from("07"));

        let set: HashSet<NodeId> = [NodeId::from(7), NodeId::from("7")].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn find_searches_depth_first() {
        let items = sample();
        assert_eq!(find_node(&items, &4.into()).map(|n| n.label.as_str()), Some("node.rs"));
        assert_eq!(find_node(&items, &"4".into()).map(|n| n.label.as_str()), Some("node.rs"));
        assert!(find_node(&items, &99.into()).is_none());
    }

    #[test]
    fn descendants_include_self() {
        let items = sample();
        let ids = descendant_ids(&items[0]);
        assert_eq!(ids, vec![1.into(), 2.into(), 3.into(), 4.into()]);
        assert_eq!(descendant_ids(&items[1]), vec![NodeId::from("docs")]);
    }

    #[test]
    fn replace_children_hits_first_match() {
        let mut items = vec![
            TreeNode::new(1, "a").with_children(vec![TreeNode::new(9, "first")]),
            TreeNode::new(9, "second"),
        ];
        assert!(replace_children(&mut items, &9.into(), vec![TreeNode::new(10, "x")]));
        assert_eq!(items[0].children()[0].children().len(), 1);
        assert!(items[1].children.is_none());
        assert!(!replace_children(&mut items, &77.into(), Vec::new()));
    }

    #[test]
    fn loadable_node_needs_load_until_filled() {
        let mut node = TreeNode::new(1, "lazy").loadable();
        assert!(node.has_children());
        assert!(node.needs_load());
        node.children = Some(vec![TreeNode::new(2, "child")]);
        assert!(!node.needs_load());
        assert!(!TreeNode::new(3, "leaf").needs_load());
    }

    #[test]
    fn empty_child_list_is_a_leaf() {
        assert!(!TreeNode::new(1, "leaf").with_children(Vec::new()).has_children());
        assert!(TreeNode::new(2, "lazy").loadable().has_children());
    }

    #[test]
    fn visible_rows_follow_expansion() {
        let items = sample();
        let mut expanded = FlagMap::default();
        assert_eq!(visible_rows(&items, &expanded).len(), 2);

        expanded.set(1.into(), true);
        let rows = visible_rows(&items, &expanded);
        let ids: Vec<_> = rows.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, ["1", "2", "3", "docs"]);
        assert_eq!(rows[2].depth, 1);
        assert!(rows[2].has_children);
        assert!(!rows[1].has_children);
    }
}
