use std::cell::Cell;
use std::rc::Rc;

use futures::executor::block_on;
use futures::future;
use ratatui_pickers_core::error::LoadError;
use ratatui_pickers_core::error::error_chain;
use ratatui_pickers_core::input::KeyCode;
use ratatui_pickers_core::tree::FlagMap;
use ratatui_pickers_core::tree::NodeId;
use ratatui_pickers_core::tree::SelectionChange;
use ratatui_pickers_core::tree::TreeAction;
use ratatui_pickers_core::tree::TreeModel;
use ratatui_pickers_core::tree::TreeNode;
use ratatui_pickers_core::tree::TreeView;
use ratatui_pickers_core::tree::toggle_select;

fn forest() -> Vec<TreeNode> {
    vec![
        TreeNode::new("root", "root").with_children(vec![
            TreeNode::new("parent", "parent").with_children(vec![
                TreeNode::new("child-a", "a"),
                TreeNode::new("child-b", "b")
                    .with_children(vec![TreeNode::new("grandchild", "g")]),
            ]),
            TreeNode::new("sibling", "sibling"),
        ]),
        TreeNode::new("lazy", "lazy").loadable(),
    ]
}

/// Loader that counts calls and always fails.
fn counting_failure(
    calls: Rc<Cell<usize>>,
) -> impl Fn(NodeId) -> future::Ready<Result<Vec<TreeNode>, LoadError>> {
    move |_| {
        calls.set(calls.get() + 1);
        future::ready(Err(LoadError::with_source(
            "fetch failed",
            std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"),
        )))
    }
}

#[test]
fn cascading_select_leaves_ancestors_alone() {
    let items = forest();
    let selected = toggle_select(&"parent".into(), true, &FlagMap::default(), &items);
    for id in ["parent", "child-a", "child-b", "grandchild"] {
        assert!(selected.get(&id.into()), "{id} should be selected");
    }
    assert!(!selected.get(&"root".into()));
    assert!(!selected.get(&"sibling".into()));

    let deselected = toggle_select(&"parent".into(), true, &selected, &items);
    assert_eq!(deselected.count(), 0);
}

#[test]
fn single_mode_toggle_off_reports_empty_list() {
    let mut model = TreeModel::new(forest());
    assert_eq!(
        model.toggle_select(&"sibling".into(), false),
        SelectionChange::Single("sibling".into())
    );
    assert_eq!(
        model.toggle_select(&"sibling".into(), false),
        SelectionChange::Many(Vec::new())
    );
}

#[test]
fn failed_load_reaches_sink_once() {
    let calls = Rc::new(Cell::new(0));
    let loader = counting_failure(calls.clone());
    let mut model = TreeModel::new(forest());

    let pending = model.request_expand(&"lazy".into(), &loader).unwrap();
    assert!(model.is_loading(&"lazy".into()));

    let mut reports = Vec::new();
    model.complete_load(block_on(pending), &mut |id: &NodeId, err: &LoadError| {
        reports.push((id.to_string(), error_chain(err)));
    });

    assert_eq!(calls.get(), 1);
    assert_eq!(reports, vec![("lazy".to_string(), "fetch failed: timed out".to_string())]);
    assert!(!model.is_loading(&"lazy".into()));
    assert!(!model.is_expanded(&"lazy".into()));
    let node = model.node(&"lazy".into()).unwrap();
    assert!(node.children().is_empty());
    assert!(node.needs_load(), "retry stays possible");
}

#[test]
fn view_gates_reentrant_expand_until_load_finishes() {
    let calls = Rc::new(Cell::new(0));
    let mut view = TreeView::new(forest()).with_loader(counting_failure(calls.clone()));
    assert!(view.set_cursor(&"lazy".into()));

    let first = view.handle_event(KeyCode::Right.into());
    assert_eq!(first, TreeAction::LoadRequested("lazy".into()));
    let second = view.handle_event(KeyCode::Enter.into());
    assert_eq!(second, TreeAction::None);
    assert_eq!(calls.get(), 1);

    let mut loads = view.take_pending_loads();
    assert_eq!(loads.len(), 1);
    let action = view.complete_load(block_on(loads.remove(0)));
    assert!(matches!(action, TreeAction::LoadFailed { .. }));

    // Once the flag clears, a fresh expand starts a new attempt.
    let retry = view.handle_event(KeyCode::Right.into());
    assert_eq!(retry, TreeAction::LoadRequested("lazy".into()));
    assert_eq!(calls.get(), 2);
}

#[test]
fn numeric_and_text_ids_address_the_same_node() {
    let items = vec![TreeNode::new(42, "answer")];
    let model = TreeModel::new(items);
    assert!(model.node(&"42".into()).is_some());
}
