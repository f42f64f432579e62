use super::loader::ChildLoader;
use super::loader::ErrorSink;
use super::loader::LoadOutcome;
use super::loader::PendingLoad;
use super::node::NodeId;
use super::node::TreeNode;
use super::node::VisibleRow;
use super::node::find_node;
use super::node::replace_children;
use super::node::visible_rows;
use super::state::FlagMap;
use super::state::SelectionChange;
use super::state::TreeState;
use super::state::toggle_expand;
use super::state::toggle_select;

/// One step of an expand request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeEffect {
    SetExpanded(NodeId, bool),
    SetLoading(NodeId, bool),
    Load(NodeId),
}

/// Effects of asking to expand or collapse `node`.
///
/// An open node collapses. A closed node whose children still need fetching opens optimistically,
/// is flagged as loading, and asks for a load. Any other closed node just opens.
pub fn plan_expand(node: &TreeNode, expanded: &FlagMap) -> Vec<TreeEffect> {
    let id = node.id.clone();
    if expanded.get(&id) {
        return vec![TreeEffect::SetExpanded(id, false)];
    }
    if node.needs_load() {
        return vec![
            TreeEffect::SetExpanded(id.clone(), true),
            TreeEffect::SetLoading(id.clone(), true),
            TreeEffect::Load(id),
        ];
    }
    vec![TreeEffect::SetExpanded(id, true)]
}

/// A forest plus its side flags.
///
/// The model does not deduplicate loads: a second [`TreeModel::request_expand`] on a node that is
/// already loading starts another one. Callers gate on [`TreeModel::is_loading`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeModel {
    items: Vec<TreeNode>,
    state: TreeState,
}

impl TreeModel {
    pub fn new(items: Vec<TreeNode>) -> Self {
        Self {
            items,
            state: TreeState::default(),
        }
    }

    pub fn items(&self) -> &[TreeNode] {
        &self.items
    }

    /// Replaces the forest. Flags are kept; ids that disappeared simply stop mattering.
    pub fn set_items(&mut self, items: Vec<TreeNode>) {
        self.items = items;
    }

    pub fn state(&self) -> &TreeState {
        &self.state
    }

    pub fn node(&self, id: &NodeId) -> Option<&TreeNode> {
        find_node(&self.items, id)
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.state.expanded.get(id)
    }

    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.state.selected.get(id)
    }

    pub fn is_loading(&self, id: &NodeId) -> bool {
        self.state.loading.get(id)
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        visible_rows(&self.items, &self.state.expanded)
    }

    /// Expands or collapses `id`, starting a load when the node needs one.
    ///
    /// Returns the load to drive, if any. Unknown ids flip their expansion flag only.
    pub fn request_expand(&mut self, id: &NodeId, loader: &dyn ChildLoader) -> Option<PendingLoad> {
        let effects = match self.node(id) {
            Some(node) => plan_expand(node, &self.state.expanded),
            None => vec![TreeEffect::SetExpanded(id.clone(), !self.is_expanded(id))],
        };

        let mut pending = None;
        for effect in effects {
            match effect {
                TreeEffect::SetExpanded(id, open) => {
                    tracing::debug!(%id, open, "tree node expansion");
                    self.state.expanded.set(id, open);
                }
                TreeEffect::SetLoading(id, loading) => self.state.loading.set(id, loading),
                TreeEffect::Load(id) => {
                    tracing::debug!(%id, "loading tree children");
                    let future = loader.load_children(&id);
                    pending = Some(PendingLoad::new(id, future));
                }
            }
        }
        pending
    }

    /// Flips expansion of `id` without consulting a loader.
    pub fn toggle_expanded(&mut self, id: &NodeId) -> bool {
        self.state.expanded = toggle_expand(id, &self.state.expanded);
        let open = self.state.expanded.get(id);
        tracing::debug!(%id, open, "tree node expansion");
        open
    }

    /// Applies a finished load, whatever the node's current expansion.
    ///
    /// On success the children are replaced. On failure the node is collapsed with its children
    /// left as they were and `sink` hears about it once. Loading is cleared either way.
    pub fn complete_load(&mut self, outcome: LoadOutcome, sink: &mut dyn ErrorSink) {
        let LoadOutcome { id, result } = outcome;
        self.state.loading.set(id.clone(), false);
        match result {
            Ok(children) => {
                tracing::debug!(%id, count = children.len(), "tree children loaded");
                if !replace_children(&mut self.items, &id, children) {
                    tracing::trace!(%id, "loaded node no longer in tree");
                }
            }
            Err(err) => {
                tracing::debug!(%id, error = %err, "tree children failed to load");
                self.state.expanded.set(id.clone(), false);
                sink.report(&id, &err);
            }
        }
    }

    /// Toggles selection of `id` and returns the new report.
    pub fn toggle_select(&mut self, id: &NodeId, multiple: bool) -> SelectionChange {
        self.state.selected = toggle_select(id, multiple, &self.state.selected, &self.items);
        let change = self.selection();
        tracing::debug!(%id, selected = change.len(), "tree selection changed");
        change
    }

    /// Replaces the selection from outside.
    pub fn set_selected_ids(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.state.selected = ids.into_iter().collect();
    }

    pub fn selection(&self) -> SelectionChange {
        SelectionChange::from_selection(&self.state.selected, &self.items)
    }

    pub fn selected_count(&self) -> usize {
        self.state.selected.count()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use futures::executor::block_on;
    use futures::future;

    use super::*;
    use crate::error::LoadError;

    fn items() -> Vec<TreeNode> {
        vec![
            TreeNode::new(1, "fruits").with_children(vec![TreeNode::new(2, "apple")]),
            TreeNode::new(3, "remote").loadable(),
        ]
    }

    fn ok_loader(id: NodeId) -> future::Ready<Result<Vec<TreeNode>, LoadError>> {
        future::ready(Ok(vec![TreeNode::new(format!("{id}-a"), "a")]))
    }

    fn failing_loader(_: NodeId) -> future::Ready<Result<Vec<TreeNode>, LoadError>> {
        future::ready(Err(LoadError::new("boom")))
    }

    #[test]
    fn plan_for_loaded_parent_only_expands() {
        let items = items();
        let effects = plan_expand(&items[0], &FlagMap::default());
        assert_eq!(effects, vec![TreeEffect::SetExpanded(1.into(), true)]);
    }

    #[test]
    fn plan_for_unloaded_node_requests_load() {
        let items = items();
        let effects = plan_expand(&items[1], &FlagMap::default());
        assert_eq!(
            effects,
            vec![
                TreeEffect::SetExpanded(3.into(), true),
                TreeEffect::SetLoading(3.into(), true),
                TreeEffect::Load(3.into()),
            ]
        );
    }

    #[test]
    fn plan_for_open_node_collapses_without_load() {
        let items = items();
        let expanded: FlagMap = [NodeId::from(3)].into_iter().collect();
        assert_eq!(
            plan_expand(&items[1], &expanded),
            vec![TreeEffect::SetExpanded(3.into(), false)]
        );
    }

    #[test]
    fn successful_load_fills_children() {
        let mut model = TreeModel::new(items());
        let pending = model.request_expand(&3.into(), &ok_loader).unwrap();
        assert!(model.is_loading(&3.into()));
        assert!(model.is_expanded(&3.into()));

        let mut failures = 0;
        let outcome = block_on(pending);
        model.complete_load(outcome, &mut |_: &NodeId, _: &LoadError| failures += 1);
        assert_eq!(failures, 0);

        assert!(!model.is_loading(&3.into()));
        let node = model.node(&3.into()).unwrap();
        assert_eq!(node.children()[0].id, NodeId::from("3-a"));
        assert!(!node.needs_load());

        // Loaded children are authoritative: collapsing and reopening does not fetch again.
        assert!(model.request_expand(&3.into(), &ok_loader).is_none());
        assert!(model.request_expand(&3.into(), &ok_loader).is_none());
        assert!(model.is_expanded(&3.into()));
    }

    #[test]
    fn failed_load_collapses_and_reports_once() {
        let mut model = TreeModel::new(items());
        let pending = model.request_expand(&3.into(), &failing_loader).unwrap();

        let mut reports = Vec::new();
        let outcome = block_on(pending);
        model.complete_load(outcome, &mut |id: &NodeId, err: &LoadError| {
            reports.push((id.clone(), err.to_string()))
        });

        assert_eq!(reports, vec![(NodeId::from(3), "boom".to_string())]);
        assert!(!model.is_loading(&3.into()));
        assert!(!model.is_expanded(&3.into()));
        assert!(model.node(&3.into()).unwrap().children().is_empty());
    }

    /// Counts WARN events; everything else is accepted and dropped.
    struct WarnCounter(Arc<AtomicUsize>);

    impl tracing::Subscriber for WarnCounter {
        fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }

        fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}

        fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}

        fn event(&self, event: &tracing::Event<'_>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn enter(&self, _: &tracing::span::Id) {}

        fn exit(&self, _: &tracing::span::Id) {}
    }

    #[test]
    fn failed_load_warns_only_through_log_sink() {
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = WarnCounter(warnings.clone());
        tracing::subscriber::with_default(subscriber, || {
            let mut model = TreeModel::new(items());
            let pending = model.request_expand(&3.into(), &failing_loader).unwrap();
            model.complete_load(block_on(pending), &mut |_: &NodeId, _: &LoadError| {});
            assert_eq!(warnings.load(Ordering::SeqCst), 0);

            let pending = model.request_expand(&3.into(), &failing_loader).unwrap();
            model.complete_load(block_on(pending), &mut crate::tree::LogSink);
            assert_eq!(warnings.load(Ordering::SeqCst), 1);
        });
    }

    #[test]
    fn late_result_applies_after_collapse() {
        let mut model = TreeModel::new(items());
        let pending = model.request_expand(&3.into(), &ok_loader).unwrap();
        assert!(model.request_expand(&3.into(), &ok_loader).is_none());
        assert!(!model.is_expanded(&3.into()));

        model.complete_load(block_on(pending), &mut crate::tree::LogSink);
        assert_eq!(model.node(&3.into()).unwrap().children().len(), 1);
        assert!(!model.is_expanded(&3.into()));
    }

    #[test]
    fn selection_round_trips_through_model() {
        let mut model = TreeModel::new(items());
        assert_eq!(
            model.toggle_select(&1.into(), true),
            SelectionChange::Many(vec![1.into(), 2.into()])
        );
        model.set_selected_ids([NodeId::from(2)]);
        assert_eq!(model.selection(), SelectionChange::Single(2.into()));
        assert_eq!(model.selected_count(), 1);
    }
}
