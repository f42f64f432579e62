//! Per-node view flags kept beside the tree, and the selection/expansion transitions over them.

use std::collections::HashMap;
use std::collections::HashSet;

use super::node::NodeId;
use super::node::TreeNode;
use super::node::all_ids;
use super::node::descendant_ids;
use super::node::find_node;

/// Boolean flags keyed by node id; a missing key reads as `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagMap {
    flags: HashMap<NodeId, bool>,
}

impl FlagMap {
    pub fn get(&self, id: &NodeId) -> bool {
        self.flags.get(id).copied().unwrap_or(false)
    }

    pub fn set(&mut self, id: NodeId, value: bool) {
        self.flags.insert(id, value);
    }

    pub fn clear(&mut self) {
        self.flags.clear();
    }

    /// Ids whose flag is `true`, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.flags.iter().filter(|(_, v)| **v).map(|(k, _)| k)
    }

    pub fn count(&self) -> usize {
        self.flags.values().filter(|v| **v).count()
    }
}

impl FromIterator<NodeId> for FlagMap {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            flags: iter.into_iter().map(|id| (id, true)).collect(),
        }
    }
}

/// Expansion, selection and loading flags for one tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeState {
    pub expanded: FlagMap,
    pub selected: FlagMap,
    pub loading: FlagMap,
}

/// Flips the expansion flag of `id` only.
pub fn toggle_expand(id: &NodeId, expanded: &FlagMap) -> FlagMap {
    let mut next = expanded.clone();
    next.set(id.clone(), !expanded.get(id));
    next
}

/// Toggles selection of `id`.
///
/// In single mode a selected node clears the selection and any other node becomes the only one
/// selected. In multi mode the node and all of its descendants take the node's negated state;
/// ancestors are left alone. An id not present in `tree` flips on its own.
pub fn toggle_select(
    id: &NodeId,
    multiple: bool,
    selected: &FlagMap,
    tree: &[TreeNode],
) -> FlagMap {
    let now = !selected.get(id);
    if !multiple {
        let mut next = FlagMap::default();
        if now {
            next.set(id.clone(), true);
        }
        return next;
    }

    let mut next = selected.clone();
    match find_node(tree, id) {
        Some(node) => {
            for descendant in descendant_ids(node) {
                next.set(descendant, now);
            }
        }
        None => next.set(id.clone(), now),
    }
    next
}

/// Selection as reported to callers: one id when exactly one node is selected, a list otherwise
/// (including the empty list).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SelectionChange {
    Single(NodeId),
    Many(Vec<NodeId>),
}

impl SelectionChange {
    /// Builds the report from `selected`. Ids follow tree pre-order; ids the tree does not contain
    /// come last, ordered by their display form.
    pub fn from_selection(selected: &FlagMap, tree: &[TreeNode]) -> Self {
        let mut pending: HashSet<&NodeId> = selected.ids().collect();
        let mut ids: Vec<NodeId> = all_ids(tree)
            .into_iter()
            .filter(|id| pending.remove(id))
            .collect();

        let mut rest: Vec<NodeId> = pending.into_iter().cloned().collect();
        rest.sort_by_key(|id| id.to_string());
        ids.extend(rest);

        if ids.len() == 1 {
            SelectionChange::Single(ids.remove(0))
        } else {
            SelectionChange::Many(ids)
        }
    }

    pub fn ids(&self) -> &[NodeId] {
        match self {
            SelectionChange::Single(id) => std::slice::from_ref(id),
            SelectionChange::Many(ids) => ids,
        }
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Vec<TreeNode> {
        vec![TreeNode::new(1, "root").with_children(vec![
            TreeNode::new(2, "a").with_children(vec![
                TreeNode::new(3, "a1"),
                TreeNode::new(4, "a2"),
            ]),
            TreeNode::new(5, "b"),
        ])]
    }

    fn selected_ids(map: &FlagMap, tree: &[TreeNode]) -> Vec<String> {
        SelectionChange::from_selection(map, tree)
            .ids()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn toggle_expand_flips_one_key() {
        let mut expanded = FlagMap::default();
        expanded.set(5.into(), true);
        let next = toggle_expand(&2.into(), &expanded);
        assert!(next.get(&2.into()));
        assert!(next.get(&5.into()));
        let back = toggle_expand(&2.into(), &next);
        assert!(!back.get(&2.into()));
    }

    #[test]
    fn single_mode_replaces_and_toggles_off() {
        let items = tree();
        let one = toggle_select(&3.into(), false, &FlagMap::default(), &items);
        assert_eq!(selected_ids(&one, &items), ["3"]);

        let other = toggle_select(&5.into(), false, &one, &items);
        assert_eq!(selected_ids(&other, &items), ["5"]);

        let none = toggle_select(&5.into(), false, &other, &items);
        assert_eq!(none.count(), 0);
    }

    #[test]
    fn multi_mode_cascades_down_not_up() {
        let items = tree();
        let mut selected = FlagMap::default();
        selected.set(5.into(), true);

        let next = toggle_select(&2.into(), true, &selected, &items);
        assert_eq!(selected_ids(&next, &items), ["2", "3", "4", "5"]);
        assert!(!next.get(&1.into()));

        let cleared = toggle_select(&2.into(), true, &next, &items);
        assert_eq!(selected_ids(&cleared, &items), ["5"]);
    }

    #[test]
    fn multi_mode_parent_state_drives_children() {
        let items = tree();
        let mut selected = FlagMap::default();
        selected.set(3.into(), true);
        // Parent is unselected, so the whole subtree becomes selected.
        let next = toggle_select(&2.into(), true, &selected, &items);
        assert!(next.get(&3.into()) && next.get(&4.into()));
    }

    #[test]
    fn unknown_id_flips_alone() {
        let items = tree();
        let next = toggle_select(&"ghost".into(), true, &FlagMap::default(), &items);
        assert_eq!(next.count(), 1);
        assert!(next.get(&"ghost".into()));
    }

    #[test]
    fn report_is_single_only_for_exactly_one() {
        let items = tree();
        let empty = SelectionChange::from_selection(&FlagMap::default(), &items);
        assert_eq!(empty, SelectionChange::Many(Vec::new()));

        let one: FlagMap = [NodeId::from(4)].into_iter().collect();
        assert_eq!(
            SelectionChange::from_selection(&one, &items),
            SelectionChange::Single(4.into())
        );

        let two: FlagMap = [NodeId::from("zz"), NodeId::from(5)].into_iter().collect();
        assert_eq!(
            SelectionChange::from_selection(&two, &items),
            SelectionChange::Many(vec![5.into(), "zz".into()])
        );
    }
}
