use ratatui::buffer::Buffer;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::style::Stylize;

use super::loader::ChildLoader;
use super::loader::LoadOutcome;
use super::loader::PendingLoad;
use super::model::TreeModel;
use super::node::NodeId;
use super::node::TreeNode;
use super::node::VisibleRow;
use super::state::SelectionChange;
use crate::error::LoadError;
use crate::error::error_chain;
use crate::input::InputEvent;
use crate::input::MouseButton;
use crate::input::MouseEventKind;
use crate::keymap::TreeBindings;
use crate::keymap::TreeCommand;
use crate::render;
use crate::viewport::ViewportState;

const EXPANDER_W: u16 = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeAction {
    None,
    Redraw,
    SelectionChanged(SelectionChange),
    ExpandChanged(NodeId),
    /// A leaf was activated; it was also toggled in the selection.
    Activated {
        id: NodeId,
        selection: SelectionChange,
    },
    LoadRequested(NodeId),
    LoadFailed {
        id: NodeId,
        message: String,
    },
}

#[derive(Clone, Debug)]
pub struct TreeViewOptions {
    /// Checkbox selection with cascading to descendants.
    pub multiple: bool,
    /// Columns per depth level.
    pub indent: u16,
    pub show_scrollbar: bool,
    /// "N items selected" line in multi mode, shown while anything is selected.
    pub show_footer: bool,
    pub empty_text: String,
    pub bindings: TreeBindings,
    pub style: Style,
    pub cursor_style: Style,
    pub selected_style: Style,
    pub disabled_style: Style,
    pub muted_style: Style,
    pub error_style: Style,
    pub scrollbar_style: Style,
}

impl Default for TreeViewOptions {
    fn default() -> Self {
        Self {
            multiple: false,
            indent: 2,
            show_scrollbar: true,
            show_footer: true,
            empty_text: "No items available".to_string(),
            bindings: TreeBindings::default(),
            style: Style::default(),
            cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            selected_style: Style::default().add_modifier(Modifier::BOLD).cyan(),
            disabled_style: Style::default().dark_gray(),
            muted_style: Style::default().dark_gray(),
            error_style: Style::default().red(),
            scrollbar_style: Style::default().dark_gray(),
        }
    }
}

/// Keyboard and mouse driven view over a [`TreeModel`].
///
/// Child loads are not run by the view. After an action of
/// [`TreeAction::LoadRequested`], drain [`TreeView::take_pending_loads`], drive the futures on
/// whatever executor the app has, and hand each result back through [`TreeView::complete_load`].
pub struct TreeView {
    options: TreeViewOptions,
    model: TreeModel,
    loader: Option<Box<dyn ChildLoader>>,
    rows: Vec<VisibleRow>,
    cursor: usize,
    viewport: ViewportState,
    pending: Vec<PendingLoad>,
    last_error: Option<(NodeId, String)>,
    list_area: Rect,
}

impl std::fmt::Debug for TreeView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeView")
            .field("options", &self.options)
            .field("model", &self.model)
            .field("cursor", &self.cursor)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl TreeView {
    pub fn new(items: Vec<TreeNode>) -> Self {
        Self::with_options(items, TreeViewOptions::default())
    }

    pub fn with_options(items: Vec<TreeNode>, options: TreeViewOptions) -> Self {
        let mut view = Self {
            options,
            model: TreeModel::new(items),
            loader: None,
            rows: Vec::new(),
            cursor: 0,
            viewport: ViewportState::default(),
            pending: Vec::new(),
            last_error: None,
            list_area: Rect::default(),
        };
        view.refresh_rows(None);
        view
    }

    pub fn with_loader(mut self, loader: impl ChildLoader + 'static) -> Self {
        self.set_loader(loader);
        self
    }

    pub fn set_loader(&mut self, loader: impl ChildLoader + 'static) {
        self.loader = Some(Box::new(loader));
    }

    pub fn options(&self) -> &TreeViewOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TreeViewOptions) {
        self.options = options;
    }

    pub fn model(&self) -> &TreeModel {
        &self.model
    }

    pub fn set_items(&mut self, items: Vec<TreeNode>) {
        let keep = self.cursor_id();
        self.model.set_items(items);
        self.refresh_rows(keep);
    }

    pub fn set_selected_ids(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.model.set_selected_ids(ids);
    }

    pub fn selection(&self) -> SelectionChange {
        self.model.selection()
    }

    pub fn rows(&self) -> &[VisibleRow] {
        &self.rows
    }

    pub fn cursor_id(&self) -> Option<NodeId> {
        self.rows.get(self.cursor).map(|r| r.id.clone())
    }

    /// Moves the cursor to `id` if it is currently visible.
    pub fn set_cursor(&mut self, id: &NodeId) -> bool {
        match self.rows.iter().position(|r| &r.id == id) {
            Some(ix) => {
                self.cursor = ix;
                self.viewport.ensure_visible(ix as u32);
                true
            }
            None => false,
        }
    }

    pub fn last_error(&self) -> Option<(&NodeId, &str)> {
        self.last_error.as_ref().map(|(id, msg)| (id, msg.as_str()))
    }

    pub fn has_pending_loads(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Hands the queued child loads to the caller.
    pub fn take_pending_loads(&mut self) -> Vec<PendingLoad> {
        std::mem::take(&mut self.pending)
    }

    /// Applies a finished child load.
    pub fn complete_load(&mut self, outcome: LoadOutcome) -> TreeAction {
        let id = outcome.id.clone();
        let keep = self.cursor_id();
        let mut failure = None;
        self.model
            .complete_load(outcome, &mut |_: &NodeId, err: &LoadError| {
                failure = Some(error_chain(err));
            });
        self.refresh_rows(keep);
        match failure {
            Some(message) => {
                self.last_error = Some((id.clone(), message.clone()));
                TreeAction::LoadFailed { id, message }
            }
            None => {
                if self.last_error.as_ref().is_some_and(|(err_id, _)| *err_id == id) {
                    self.last_error = None;
                }
                TreeAction::Redraw
            }
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) -> TreeAction {
        match event {
            InputEvent::Key(key) => match self.options.bindings.command_for(&key) {
                Some(cmd) => self.run(cmd),
                None => TreeAction::None,
            },
            InputEvent::Paste(_) => TreeAction::None,
            InputEvent::Mouse(m) => {
                let pos = Position::new(m.x, m.y);
                if !self.list_area.contains(pos) {
                    return TreeAction::None;
                }
                match m.kind {
                    MouseEventKind::ScrollUp => self.scroll(-3),
                    MouseEventKind::ScrollDown => self.scroll(3),
                    MouseEventKind::Down(MouseButton::Left) => {
                        let ix = (m.y - self.list_area.y) as usize + self.viewport.y as usize;
                        let Some(row) = self.rows.get(ix) else {
                            return TreeAction::None;
                        };
                        let expander_x =
                            self.list_area.x + row.depth as u16 * self.options.indent;
                        let on_expander =
                            row.has_children && m.x >= expander_x && m.x < expander_x + EXPANDER_W;
                        let id = row.id.clone();
                        self.cursor = ix;
                        if on_expander {
                            self.expand(&id)
                        } else {
                            self.activate()
                        }
                    }
                    _ => TreeAction::None,
                }
            }
        }
    }

    fn run(&mut self, cmd: TreeCommand) -> TreeAction {
        if self.rows.is_empty() {
            return TreeAction::None;
        }
        match cmd {
            TreeCommand::Up => self.move_cursor(-1),
            TreeCommand::Down => self.move_cursor(1),
            TreeCommand::PageUp => self.move_cursor(-(self.viewport.page() as i64)),
            TreeCommand::PageDown => self.move_cursor(self.viewport.page() as i64),
            TreeCommand::Top => self.move_to(0),
            TreeCommand::Bottom => self.move_to(self.rows.len() - 1),
            TreeCommand::Expand => {
                let row = &self.rows[self.cursor];
                if row.has_children && !row.expanded {
                    let id = row.id.clone();
                    self.expand(&id)
                } else if row.expanded
                    && self
                        .rows
                        .get(self.cursor + 1)
                        .is_some_and(|r| r.depth > row.depth)
                {
                    self.move_to(self.cursor + 1)
                } else {
                    TreeAction::None
                }
            }
            TreeCommand::Collapse => {
                let row = &self.rows[self.cursor];
                if row.expanded {
                    let id = row.id.clone();
                    self.expand(&id)
                } else if let Some(parent) = self.parent_row(self.cursor) {
                    self.move_to(parent)
                } else {
                    TreeAction::None
                }
            }
            TreeCommand::Activate => self.activate(),
            TreeCommand::ToggleSelect => {
                let row = &self.rows[self.cursor];
                if row.disabled {
                    return TreeAction::None;
                }
                let id = row.id.clone();
                TreeAction::SelectionChanged(self.model.toggle_select(&id, self.options.multiple))
            }
        }
    }

    /// Enter or click: nodes with children toggle open, leaves are selected.
    fn activate(&mut self) -> TreeAction {
        let Some(row) = self.rows.get(self.cursor) else {
            return TreeAction::None;
        };
        if row.disabled {
            return TreeAction::None;
        }
        let id = row.id.clone();
        if row.has_children {
            return self.expand(&id);
        }
        let selection = self.model.toggle_select(&id, self.options.multiple);
        TreeAction::Activated { id, selection }
    }

    fn expand(&mut self, id: &NodeId) -> TreeAction {
        if self.model.is_loading(id) {
            tracing::trace!(%id, "expand ignored while loading");
            return TreeAction::None;
        }

        let action = match &self.loader {
            Some(loader) => match self.model.request_expand(id, loader.as_ref()) {
                Some(pending) => {
                    self.pending.push(pending);
                    TreeAction::LoadRequested(id.clone())
                }
                None => TreeAction::ExpandChanged(id.clone()),
            },
            None => {
                self.model.toggle_expanded(id);
                TreeAction::ExpandChanged(id.clone())
            }
        };
        self.refresh_rows(Some(id.clone()));
        action
    }

    fn parent_row(&self, ix: usize) -> Option<usize> {
        let depth = self.rows.get(ix)?.depth;
        if depth == 0 {
            return None;
        }
        (0..ix).rev().find(|&i| self.rows[i].depth < depth)
    }

    fn move_cursor(&mut self, delta: i64) -> TreeAction {
        let last = self.rows.len().saturating_sub(1) as i64;
        let next = (self.cursor as i64 + delta).clamp(0, last) as usize;
        self.move_to(next)
    }

    fn move_to(&mut self, ix: usize) -> TreeAction {
        if ix == self.cursor {
            return TreeAction::None;
        }
        self.cursor = ix;
        self.viewport.ensure_visible(ix as u32);
        TreeAction::Redraw
    }

    fn scroll(&mut self, delta: i32) -> TreeAction {
        let before = self.viewport.y;
        self.viewport.scroll_y_by(delta);
        if self.viewport.y == before {
            TreeAction::None
        } else {
            TreeAction::Redraw
        }
    }

    fn refresh_rows(&mut self, keep: Option<NodeId>) {
        self.rows = self.model.visible_rows();
        if let Some(id) = keep {
            if let Some(ix) = self.rows.iter().position(|r| r.id == id) {
                self.cursor = ix;
            }
        }
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
        self.viewport.set_content(self.rows.len() as u32);
        self.viewport.ensure_visible(self.cursor as u32);
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.options.style);
        if area.width == 0 || area.height == 0 {
            self.list_area = Rect::default();
            return;
        }

        let selected = self.model.selected_count();
        let footer = self.options.multiple && self.options.show_footer && selected > 0;
        let footer = u16::from(footer);
        let error = u16::from(self.last_error.is_some());
        let list_h = area.height.saturating_sub(footer + error);
        let mut list = Rect::new(area.x, area.y, area.width, list_h);

        self.viewport.set_viewport(list_h);
        self.viewport.set_content(self.rows.len() as u32);
        self.viewport.ensure_visible(self.cursor as u32);

        if self.options.show_scrollbar && self.viewport.is_scrollable() && list.width > 1 {
            let bar = Rect::new(list.x + list.width - 1, list.y, 1, list.height);
            list.width -= 1;
            render::render_scrollbar(bar, buf, &self.viewport, self.options.scrollbar_style);
        }
        self.list_area = list;

        if self.rows.is_empty() {
            let empty = &self.options.empty_text;
            render::put_str(list.x, list.y, list.width, buf, empty, self.options.muted_style);
        } else {
            for (line, ix) in self.viewport.visible_rows().enumerate() {
                self.render_row(ix as usize, list.x, list.y + line as u16, list.width, buf);
            }
        }

        let mut y = list.y + list_h;
        if let Some((_, message)) = &self.last_error {
            let text = format!("Error: {message}");
            render::put_str(area.x, y, area.width, buf, &text, self.options.error_style);
            y += 1;
        }
        if footer == 1 {
            let noun = if selected == 1 { "item" } else { "items" };
            let text = format!("{selected} {noun} selected");
            render::put_str(area.x, y, area.width, buf, &text, self.options.muted_style);
        }
    }

    fn render_row(&self, ix: usize, x: u16, y: u16, width: u16, buf: &mut Buffer) {
        let row = &self.rows[ix];
        let Some(node) = self.model.node(&row.id) else {
            return;
        };
        let selected = self.model.is_selected(&row.id);

        let mut style = self.options.style;
        if row.disabled {
            style = style.patch(self.options.disabled_style);
        } else if selected && !self.options.multiple {
            style = style.patch(self.options.selected_style);
        }
        if ix == self.cursor {
            style = style.patch(self.options.cursor_style);
            buf.set_style(Rect::new(x, y, width, 1), style);
        }

        let mut dx = (row.depth as u16).saturating_mul(self.options.indent).min(width);
        let expander = match (row.has_children, row.expanded, self.model.is_loading(&row.id)) {
            (true, _, true) => "… ",
            (true, true, false) => "▾ ",
            (true, false, false) => "▸ ",
            (false, _, _) => "  ",
        };
        dx += render::put_str(x + dx, y, width - dx, buf, expander, style);
        if self.options.multiple {
            let mark = if selected { "[x] " } else { "[ ] " };
            dx += render::put_str(x + dx, y, width - dx, buf, mark, style);
        }
        if let Some(icon) = &node.icon {
            dx += render::put_str(x + dx, y, width - dx, buf, icon, style);
            dx += render::put_str(x + dx, y, width - dx, buf, " ", style);
        }
        render::put_str(x + dx, y, width - dx, buf, &node.label, style);
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use futures::future;

    use super::*;
    use crate::input::KeyCode;
    use crate::input::MouseEvent;
    use crate::keymap::key_char;
    use crate::render::row_text;

    fn items() -> Vec<TreeNode> {
        vec![
            TreeNode::new(1, "fruits").with_children(vec![
                TreeNode::new(2, "apple"),
                TreeNode::new(3, "pear").disabled(),
            ]),
            TreeNode::new(4, "remote").loadable(),
        ]
    }

    fn slow_loader(id: NodeId) -> future::Ready<Result<Vec<TreeNode>, LoadError>> {
        future::ready(Ok(vec![TreeNode::new(format!("{id}.1"), "child")]))
    }

    fn press(view: &mut TreeView, code: KeyCode) -> TreeAction {
        view.handle_event(code.into())
    }

    fn draw(view: &mut TreeView, w: u16, h: u16) -> Buffer {
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        buf
    }

    #[test]
    fn enter_expands_parents_and_selects_leaves() {
        let mut view = TreeView::new(items());
        assert_eq!(press(&mut view, KeyCode::Enter), TreeAction::ExpandChanged(1.into()));
        assert_eq!(view.rows().len(), 4);

        press(&mut view, KeyCode::Down);
        assert_eq!(
            press(&mut view, KeyCode::Enter),
            TreeAction::Activated {
                id: 2.into(),
                selection: SelectionChange::Single(2.into()),
            }
        );

        press(&mut view, KeyCode::Down);
        assert_eq!(press(&mut view, KeyCode::Enter), TreeAction::None);
        assert_eq!(view.handle_event(key_char(' ').into()), TreeAction::None);
    }

    #[test]
    fn left_collapses_or_jumps_to_parent() {
        let mut view = TreeView::new(items());
        press(&mut view, KeyCode::Right);
        press(&mut view, KeyCode::Right);
        assert_eq!(view.cursor_id(), Some(2.into()));
        press(&mut view, KeyCode::Left);
        assert_eq!(view.cursor_id(), Some(1.into()));
        assert_eq!(press(&mut view, KeyCode::Left), TreeAction::ExpandChanged(1.into()));
        assert_eq!(view.rows().len(), 2);
    }

    #[test]
    fn second_expand_while_loading_is_ignored() {
        let mut view = TreeView::new(items()).with_loader(slow_loader);
        press(&mut view, KeyCode::End);
        assert_eq!(press(&mut view, KeyCode::Right), TreeAction::LoadRequested(4.into()));
        assert!(view.model().is_loading(&4.into()));

        // Collapse and re-expand attempts are gated on the loading flag.
        assert_eq!(press(&mut view, KeyCode::Left), TreeAction::None);
        assert_eq!(press(&mut view, KeyCode::Enter), TreeAction::None);

        let loads = view.take_pending_loads();
        assert_eq!(loads.len(), 1);
        let outcome = block_on(loads.into_iter().next().unwrap());
        assert_eq!(view.complete_load(outcome), TreeAction::Redraw);
        assert_eq!(view.rows().last().map(|r| r.id.to_string()), Some("4.1".to_string()));
    }

    #[test]
    fn failed_load_surfaces_error_line() {
        let failing = |_: NodeId| future::ready(Err::<Vec<TreeNode>, _>(LoadError::new("timeout")));
        let mut view = TreeView::new(items()).with_loader(failing);
        press(&mut view, KeyCode::End);
        press(&mut view, KeyCode::Enter);

        let pending = view.take_pending_loads().pop().unwrap();
        let action = view.complete_load(block_on(pending));
        assert_eq!(
            action,
            TreeAction::LoadFailed {
                id: 4.into(),
                message: "timeout".to_string()
            }
        );
        assert!(!view.model().is_expanded(&4.into()));
        assert!(!view.model().is_loading(&4.into()));

        let buf = draw(&mut view, 20, 4);
        assert_eq!(row_text(&buf, 1).trim_end(), "▸ remote");
        assert_eq!(row_text(&buf, 3).trim_end(), "Error: timeout");
    }

    #[test]
    fn multi_mode_renders_checkboxes_and_footer() {
        let options = TreeViewOptions {
            multiple: true,
            ..Default::default()
        };
        let mut view = TreeView::with_options(items(), options);
        let action = view.handle_event(key_char(' ').into());
        assert_eq!(
            action,
            TreeAction::SelectionChanged(SelectionChange::Many(vec![1.into(), 2.into(), 3.into()]))
        );

        press(&mut view, KeyCode::Right);
        let buf = draw(&mut view, 24, 5);
        assert_eq!(row_text(&buf, 0).trim_end(), "▾ [x] fruits");
        assert_eq!(row_text(&buf, 1).trim_end(), "    [x] apple");
        assert_eq!(row_text(&buf, 4).trim_end(), "3 items selected");
    }

    #[test]
    fn footer_hidden_until_something_is_selected() {
        let options = TreeViewOptions {
            multiple: true,
            ..Default::default()
        };
        let mut view = TreeView::with_options(items(), options);
        let buf = draw(&mut view, 24, 3);
        assert_eq!(row_text(&buf, 2).trim_end(), "");

        press(&mut view, KeyCode::Right);
        press(&mut view, KeyCode::Down);
        view.handle_event(key_char(' ').into());
        let buf = draw(&mut view, 24, 5);
        assert_eq!(row_text(&buf, 4).trim_end(), "1 item selected");
    }

    #[test]
    fn empty_child_list_activates_as_leaf() {
        let mut view = TreeView::new(vec![TreeNode::new(1, "leaf").with_children(vec![])]);
        assert_eq!(
            press(&mut view, KeyCode::Enter),
            TreeAction::Activated {
                id: 1.into(),
                selection: SelectionChange::Single(1.into()),
            }
        );
        let buf = draw(&mut view, 12, 1);
        assert_eq!(row_text(&buf, 0).trim_end(), "  leaf");
    }

    #[test]
    fn empty_tree_shows_placeholder() {
        let mut view = TreeView::new(Vec::new());
        assert_eq!(press(&mut view, KeyCode::Down), TreeAction::None);
        let buf = draw(&mut view, 24, 2);
        assert_eq!(row_text(&buf, 0).trim_end(), "No items available");
    }

    #[test]
    fn clicking_expander_toggles_and_label_activates() {
        let mut view = TreeView::new(items());
        draw(&mut view, 20, 5);
        let click = |x, y| {
            InputEvent::Mouse(MouseEvent::new(x, y, MouseEventKind::Down(MouseButton::Left)))
        };
        assert_eq!(view.handle_event(click(0, 0)), TreeAction::ExpandChanged(1.into()));
        draw(&mut view, 20, 5);
        assert!(matches!(
            view.handle_event(click(6, 1)),
            TreeAction::Activated { .. }
        ));
        assert_eq!(view.selection(), SelectionChange::Single(2.into()));
    }
}
