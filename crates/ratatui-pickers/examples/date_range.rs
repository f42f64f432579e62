use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
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
use ratatui_pickers::date::DateBounds;
use ratatui_pickers::date::DateFormat;
use ratatui_pickers::date::DateRange;
use ratatui_pickers::date::DateRangeAction;
use ratatui_pickers::date::DateRangePicker;
use ratatui_pickers::date::DateRangePickerOptions;
use ratatui_pickers::date::to_iso;
use std::io;
use std::time::Duration;

fn main() -> io::Result<()> {
    let format = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<DateFormat>().ok())
        .unwrap_or_default();
    let locale = std::env::args().nth(2).unwrap_or_else(|| "en-US".to_string());

    let today = chrono::Local::now().date_naive();
    let mut picker = DateRangePicker::with_options(DateRangePickerOptions {
        format,
        locale,
        label: Some(format!("Stay ({format})")),
        bounds: DateBounds::new(Some(today), today.checked_add_months(chrono::Months::new(12))),
        ..Default::default()
    });

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, &mut picker);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    picker: &mut DateRangePicker,
) -> io::Result<()> {
    let mut last = String::from("no changes yet");
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let [main, status] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .areas(area);

            let block = Block::default()
                .title("DateRangePicker (digits, Tab, Enter, arrows, PgUp/PgDn, y, Esc, q)")
                .borders(Borders::ALL);
            let inner = block.inner(main);
            f.render_widget(block, main);

            picker.render(inner, f.buffer_mut());
            if let Some((x, y)) = picker.caret_position() {
                f.set_cursor_position((x, y));
            }

            let status_span = Span::styled(last.clone(), Style::default());
            f.buffer_mut()
                .set_span(status.x, status.y, &status_span, status.width);
        })?;

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let ev = crossterm::event::read()?;
        if let Event::Key(key) = &ev {
            if key.kind == KeyEventKind::Press
                && key.code == KeyCode::Char('q')
                && !picker.is_open()
            {
                return Ok(());
            }
        }

        let Some(ev) = input_event_from_crossterm(ev) else {
            continue;
        };
        match picker.handle_event(ev) {
            DateRangeAction::RangeChanged(range) => last = describe(range),
            DateRangeAction::Opened => last = "calendar opened".to_string(),
            DateRangeAction::Closed => last = "calendar closed".to_string(),
            DateRangeAction::Redraw | DateRangeAction::None => {}
        }
    }
}

fn describe(range: DateRange) -> String {
    let side = |d: Option<chrono::NaiveDate>| d.map(to_iso).unwrap_or_else(|| "-".to_string());
    format!("start={}  end={}", side(range.start), side(range.end))
}
