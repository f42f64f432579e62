use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use futures::FutureExt;
use futures::StreamExt;
use futures::channel::oneshot;
use futures::stream::FuturesUnordered;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui_pickers::crossterm_input::input_event_from_crossterm;
use ratatui_pickers::error::LoadError;
use ratatui_pickers::tree::NodeId;
use ratatui_pickers::tree::PendingLoad;
use ratatui_pickers::tree::SelectionChange;
use ratatui_pickers::tree::TreeAction;
use ratatui_pickers::tree::TreeNode;
use ratatui_pickers::tree::TreeView;
use ratatui_pickers::tree::TreeViewOptions;
use std::io;
use std::time::Duration;

fn main() -> io::Result<()> {
    let multiple = std::env::args().any(|a| a == "--multi");
    let items = vec![
        TreeNode::new(1, "crates").with_icon("📁").with_children(vec![
            TreeNode::new(2, "core").with_icon("📁").with_children(vec![
                TreeNode::new(3, "lib.rs"),
                TreeNode::new(4, "date.rs"),
                TreeNode::new(5, "tree.rs"),
            ]),
            TreeNode::new(6, "legacy.rs").disabled(),
        ]),
        TreeNode::new("remote", "remote (lazy)").with_icon("🌐").loadable(),
        TreeNode::new("flaky", "flaky (fails)").with_icon("🌐").loadable(),
    ];

    let mut view = TreeView::with_options(
        items,
        TreeViewOptions {
            multiple,
            ..Default::default()
        },
    )
    .with_loader(slow_loader);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut view);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    res
}

/// Answers from a background thread after a short delay; `flaky` always fails.
fn slow_loader(id: NodeId) -> impl Future<Output = Result<Vec<TreeNode>, LoadError>> {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(600));
        let result = if id.to_string() == "flaky" {
            Err(LoadError::new("server returned 503"))
        } else {
            Ok((1..=3)
                .map(|i| TreeNode::new(format!("{id}/{i}"), format!("item {i}")))
                .collect())
        };
        let _ = tx.send(result);
    });
    rx.map(|received| {
        received.unwrap_or_else(|canceled| {
            Err(LoadError::with_source("loader thread exited", canceled))
        })
    })
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    view: &mut TreeView,
) -> io::Result<()> {
    let mut loads: FuturesUnordered<PendingLoad> = FuturesUnordered::new();
    let mut last = String::from("Enter/Space to select, →/← to expand");
    loop {
        while let Some(Some(outcome)) = loads.next().now_or_never() {
            report(view.complete_load(outcome), &mut last);
        }

        terminal.draw(|f| {
            let area = f.area();
            let [main, status] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .areas(area);

            let block = Block::default()
                .title("TreeView (j/k, h/l, Enter, Space, g/G, q)")
                .borders(Borders::ALL);
            let inner = block.inner(main);
            f.render_widget(block, main);

            view.render(inner, f.buffer_mut());

            let status_span = Span::styled(last.clone(), Style::default());
            f.buffer_mut()
                .set_span(status.x, status.y, &status_span, status.width);
        })?;

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let ev = crossterm::event::read()?;
        if let Event::Key(key) = &ev {
            if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('q') {
                return Ok(());
            }
        }
        let Some(ev) = input_event_from_crossterm(ev) else {
            continue;
        };
        report(view.handle_event(ev), &mut last);
        loads.extend(view.take_pending_loads());
    }
}

fn report(action: TreeAction, last: &mut String) {
    *last = match action {
        TreeAction::SelectionChanged(sel) => format!("selection: {}", describe(&sel)),
        TreeAction::Activated { id, selection } => {
            format!("activated {id}; selection: {}", describe(&selection))
        }
        TreeAction::ExpandChanged(id) => format!("toggled {id}"),
        TreeAction::LoadRequested(id) => format!("loading {id}…"),
        TreeAction::LoadFailed { id, message } => format!("{id} failed: {message}"),
        TreeAction::Redraw | TreeAction::None => return,
    };
}

fn describe(sel: &SelectionChange) -> String {
    match sel {
        SelectionChange::Single(id) => id.to_string(),
        SelectionChange::Many(ids) => {
            let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
            format!("[{}]", ids.join(", "))
        }
    }
}
