use chrono::Datelike;
use chrono::Days;
use ratatui::buffer::Buffer;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::style::Stylize;

use super::calendar::CalendarMonth;
use super::calendar::CalendarView;
use super::calendar::YEAR_GRID_LEN;
use super::calendar::calendar_grid;
use super::calendar::weekday_labels;
use super::calendar::year_grid;
use super::format::DateFormat;
use super::masked::MaskedInput;
use super::range::DateBounds;
use super::range::DateRange;
use super::range::RangeSide;
use super::range::accept_typed;
use super::range::day_marks;
use super::range::select_day;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::MouseButton;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::keymap::CalendarBindings;
use crate::keymap::CalendarCommand;
use crate::render;

const CELL_W: u16 = 3;
const CALENDAR_W: u16 = CELL_W * 7;
const YEAR_COLS: usize = 4;
const YEAR_CELL_W: u16 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateRangeAction {
    None,
    Redraw,
    RangeChanged(DateRange),
    Opened,
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerFocus {
    Start,
    End,
    Calendar,
}

#[derive(Clone, Debug)]
pub struct DateRangePickerOptions {
    pub format: DateFormat,
    pub bounds: DateBounds,
    /// BCP 47 or POSIX tag (`en-US`, `es_ES`) used for weekday and month names.
    pub locale: String,
    pub disabled: bool,
    pub label: Option<String>,
    pub bindings: CalendarBindings,
    pub style: Style,
    pub muted_style: Style,
    pub focused_style: Style,
    pub endpoint_style: Style,
    pub range_style: Style,
    pub preview_style: Style,
    pub cursor_style: Style,
    pub disabled_style: Style,
}

impl Default for DateRangePickerOptions {
    fn default() -> Self {
        Self {
            format: DateFormat::default(),
            bounds: DateBounds::default(),
            locale: "en-US".to_string(),
            disabled: false,
            label: None,
            bindings: CalendarBindings::default(),
            style: Style::default(),
            muted_style: Style::default().dark_gray(),
            focused_style: Style::default().add_modifier(Modifier::UNDERLINED),
            endpoint_style: Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
            range_style: Style::default().cyan(),
            preview_style: Style::default().add_modifier(Modifier::DIM | Modifier::UNDERLINED),
            cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            disabled_style: Style::default().dark_gray().add_modifier(Modifier::CROSSED_OUT),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HitTarget {
    StartField,
    EndField,
    Toggle,
    PrevPage,
    NextPage,
    Title,
    Day(u32),
    Year(i32),
}

/// Screen regions from the last render, used to route mouse events.
#[derive(Clone, Debug, Default)]
struct HitMap {
    regions: Vec<(Rect, HitTarget)>,
    caret: Option<(u16, u16)>,
}

impl HitMap {
    fn at(&self, x: u16, y: u16) -> Option<HitTarget> {
        let pos = Position::new(x, y);
        self.regions
            .iter()
            .find(|(r, _)| r.contains(pos))
            .map(|(_, t)| *t)
    }
}

/// Two masked date inputs plus a calendar popover.
///
/// The picker owns only transient view state; the range itself is reported through
/// [`DateRangeAction::RangeChanged`] and can be pushed back with [`DateRangePicker::set_value`].
#[derive(Clone, Debug)]
pub struct DateRangePicker {
    options: DateRangePickerOptions,
    value: DateRange,
    month: CalendarMonth,
    view: CalendarView,
    year_center: i32,
    cursor_day: u32,
    year_cursor: usize,
    hovered: Option<u32>,
    open: bool,
    focus: PickerFocus,
    last_input: RangeSide,
    start_input: MaskedInput,
    end_input: MaskedInput,
    weekdays: [String; 7],
    hits: HitMap,
}

impl Default for DateRangePicker {
    fn default() -> Self {
        Self::new()
    }
}

impl DateRangePicker {
    /// A picker showing the current local month.
    pub fn new() -> Self {
        Self::with_options(DateRangePickerOptions::default())
    }

    pub fn with_options(options: DateRangePickerOptions) -> Self {
        let today = chrono::Local::now().date_naive();
        Self {
            month: CalendarMonth::of(today),
            view: CalendarView::Days,
            year_center: today.year(),
            cursor_day: today.day(),
            year_cursor: 0,
            hovered: None,
            open: false,
            focus: PickerFocus::Start,
            last_input: RangeSide::Start,
            start_input: MaskedInput::new(options.format),
            end_input: MaskedInput::new(options.format),
            weekdays: weekday_labels(&options.locale),
            value: DateRange::EMPTY,
            hits: HitMap::default(),
            options,
        }
    }

    pub fn options(&self) -> &DateRangePickerOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: DateRangePickerOptions) {
        self.weekdays = weekday_labels(&options.locale);
        self.start_input = MaskedInput::new(options.format);
        self.end_input = MaskedInput::new(options.format);
        self.options = options;
        self.sync_inputs();
    }

    pub fn value(&self) -> DateRange {
        self.value
    }

    /// Replaces the range from outside; both inputs are re-rendered from it.
    pub fn set_value(&mut self, value: DateRange) {
        self.value = value;
        self.sync_inputs();
    }

    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn set_month(&mut self, month: CalendarMonth) {
        self.month = month;
        self.year_center = month.year();
        self.cursor_day = self.cursor_day.clamp(1, month.days_in_month());
    }

    pub fn view(&self) -> CalendarView {
        self.view
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn focus(&self) -> PickerFocus {
        self.focus
    }

    pub fn set_focus(&mut self, side: RangeSide) {
        self.last_input = side;
        self.focus = match side {
            RangeSide::Start => PickerFocus::Start,
            RangeSide::End => PickerFocus::End,
        };
    }

    pub fn hovered(&self) -> Option<u32> {
        self.hovered
    }

    pub fn cursor_day(&self) -> u32 {
        self.cursor_day
    }

    pub fn input_text(&self, side: RangeSide) -> String {
        self.input(side).text()
    }

    /// Terminal cursor position for the focused input, from the last render.
    pub fn caret_position(&self) -> Option<(u16, u16)> {
        match self.focus {
            PickerFocus::Calendar => None,
            _ => self.hits.caret,
        }
    }

    pub fn open(&mut self) -> DateRangeAction {
        if self.options.disabled || self.open {
            return DateRangeAction::None;
        }
        self.open = true;
        self.view = CalendarView::Days;
        self.year_center = self.month.year();
        self.cursor_day = self
            .value
            .get(self.last_input)
            .or(self.value.start)
            .filter(|d| CalendarMonth::of(*d) == self.month)
            .map(|d| d.day())
            .unwrap_or(1);
        self.focus = PickerFocus::Calendar;
        tracing::trace!(month = %self.month, "calendar opened");
        DateRangeAction::Opened
    }

    pub fn close(&mut self) -> DateRangeAction {
        if !self.open {
            return DateRangeAction::None;
        }
        self.open = false;
        self.hovered = None;
        self.view = CalendarView::Days;
        self.set_focus(self.last_input);
        DateRangeAction::Closed
    }

    pub fn handle_event(&mut self, event: InputEvent) -> DateRangeAction {
        if self.options.disabled {
            return DateRangeAction::None;
        }
        match event {
            InputEvent::Key(key) => match self.focus {
                PickerFocus::Calendar => self.handle_calendar_key(&key),
                PickerFocus::Start => self.handle_input_key(RangeSide::Start, &key),
                PickerFocus::End => self.handle_input_key(RangeSide::End, &key),
            },
            InputEvent::Paste(text) => match self.focus {
                PickerFocus::Calendar => DateRangeAction::None,
                _ => {
                    let side = self.last_input;
                    self.input_mut(side).set_text(&text);
                    self.accept_input(side)
                }
            },
            InputEvent::Mouse(m) => self.handle_mouse(m),
        }
    }

    fn handle_input_key(&mut self, side: RangeSide, key: &KeyEvent) -> DateRangeAction {
        let plain = !key.modifiers.ctrl && !key.modifiers.alt;
        match key.code {
            KeyCode::Char(c) if plain && c.is_ascii_digit() => {
                if !self.input_mut(side).push(c) {
                    return DateRangeAction::None;
                }
                return self.accept_input(side);
            }
            KeyCode::Backspace if plain => {
                if !self.input_mut(side).pop() {
                    return DateRangeAction::None;
                }
                return self.accept_input(side);
            }
            _ => {}
        }

        match self.options.bindings.input_command(key) {
            Some(CalendarCommand::Open) => self.open(),
            Some(CalendarCommand::Close) => self.close(),
            Some(CalendarCommand::NextField) | Some(CalendarCommand::PrevField) => {
                self.set_focus(match side {
                    RangeSide::Start => RangeSide::End,
                    RangeSide::End => RangeSide::Start,
                });
                DateRangeAction::Redraw
            }
            Some(CalendarCommand::Clear) => {
                self.input_mut(side).clear();
                self.accept_input(side)
            }
            _ => DateRangeAction::None,
        }
    }

    fn handle_calendar_key(&mut self, key: &KeyEvent) -> DateRangeAction {
        let Some(cmd) = self.options.bindings.calendar_command(key) else {
            return DateRangeAction::None;
        };
        match (self.view, cmd) {
            (_, CalendarCommand::Close) => self.close(),
            (_, CalendarCommand::NextField) => {
                self.last_input = RangeSide::End;
                self.close()
            }
            (_, CalendarCommand::PrevField) => {
                self.last_input = RangeSide::Start;
                self.close()
            }
            (CalendarView::Days, CalendarCommand::Select) => self.pick_day(self.cursor_day),
            (CalendarView::Days, CalendarCommand::Left) => self.move_cursor_days(-1),
            (CalendarView::Days, CalendarCommand::Right) => self.move_cursor_days(1),
            (CalendarView::Days, CalendarCommand::Up) => self.move_cursor_days(-7),
            (CalendarView::Days, CalendarCommand::Down) => self.move_cursor_days(7),
            (CalendarView::Days, CalendarCommand::PrevPage) => {
                self.set_month(self.month.prev());
                self.follow_cursor();
                DateRangeAction::Redraw
            }
            (CalendarView::Days, CalendarCommand::NextPage) => {
                self.set_month(self.month.next());
                self.follow_cursor();
                DateRangeAction::Redraw
            }
            (CalendarView::Days, CalendarCommand::ToggleYears) => {
                self.view = CalendarView::Years;
                self.year_center = self.month.year();
                self.year_cursor = self.year_index(self.month.year()).unwrap_or(0);
                self.hovered = None;
                DateRangeAction::Redraw
            }
            (CalendarView::Years, CalendarCommand::Select) => {
                let year = year_grid(self.year_center)[self.year_cursor];
                self.pick_year(year)
            }
            (CalendarView::Years, CalendarCommand::Left) => self.move_year_cursor(-1),
            (CalendarView::Years, CalendarCommand::Right) => self.move_year_cursor(1),
            (CalendarView::Years, CalendarCommand::Up) => {
                self.move_year_cursor(-(YEAR_COLS as i32))
            }
            (CalendarView::Years, CalendarCommand::Down) => self.move_year_cursor(YEAR_COLS as i32),
            (CalendarView::Years, CalendarCommand::PrevPage) => {
                self.year_center -= YEAR_GRID_LEN as i32;
                DateRangeAction::Redraw
            }
            (CalendarView::Years, CalendarCommand::NextPage) => {
                self.year_center += YEAR_GRID_LEN as i32;
                DateRangeAction::Redraw
            }
            (CalendarView::Years, CalendarCommand::ToggleYears) => {
                self.view = CalendarView::Days;
                DateRangeAction::Redraw
            }
            _ => DateRangeAction::None,
        }
    }

    fn handle_mouse(&mut self, m: MouseEvent) -> DateRangeAction {
        let target = self.hits.at(m.x, m.y);
        match m.kind {
            MouseEventKind::Moved => {
                let hovered = match target {
                    Some(HitTarget::Day(day)) => Some(day),
                    _ => None,
                };
                if hovered == self.hovered {
                    return DateRangeAction::None;
                }
                self.hovered = hovered;
                if let Some(day) = hovered {
                    self.cursor_day = day;
                }
                DateRangeAction::Redraw
            }
            MouseEventKind::Down(MouseButton::Left) => match target {
                Some(HitTarget::StartField) => {
                    self.set_focus(RangeSide::Start);
                    DateRangeAction::Redraw
                }
                Some(HitTarget::EndField) => {
                    self.set_focus(RangeSide::End);
                    DateRangeAction::Redraw
                }
                Some(HitTarget::Toggle) => {
                    if self.open {
                        self.close()
                    } else {
                        self.open()
                    }
                }
                Some(HitTarget::PrevPage) => {
                    self.focus = PickerFocus::Calendar;
                    self.handle_calendar_key(&KeyEvent::new(KeyCode::PageUp))
                }
                Some(HitTarget::NextPage) => {
                    self.focus = PickerFocus::Calendar;
                    self.handle_calendar_key(&KeyEvent::new(KeyCode::PageDown))
                }
                Some(HitTarget::Title) => {
                    self.focus = PickerFocus::Calendar;
                    self.view = match self.view {
                        CalendarView::Days => CalendarView::Years,
                        CalendarView::Years => CalendarView::Days,
                    };
                    self.year_center = self.month.year();
                    DateRangeAction::Redraw
                }
                Some(HitTarget::Day(day)) => {
                    self.focus = PickerFocus::Calendar;
                    self.cursor_day = day;
                    self.pick_day(day)
                }
                Some(HitTarget::Year(year)) => {
                    self.focus = PickerFocus::Calendar;
                    self.pick_year(year)
                }
                None if self.open => self.close(),
                None => DateRangeAction::None,
            },
            _ => DateRangeAction::None,
        }
    }

    fn pick_day(&mut self, day: u32) -> DateRangeAction {
        let Some(sel) = select_day(day, self.value, self.month, self.options.bounds) else {
            return DateRangeAction::None;
        };
        self.value = sel.range;
        self.sync_inputs();
        if sel.close {
            self.last_input = RangeSide::End;
            self.close();
        } else {
            self.last_input = RangeSide::Start;
            self.hovered = Some(day);
        }
        DateRangeAction::RangeChanged(self.value)
    }

    fn pick_year(&mut self, year: i32) -> DateRangeAction {
        self.set_month(self.month.with_year(year));
        self.view = CalendarView::Days;
        self.follow_cursor();
        DateRangeAction::Redraw
    }

    fn move_cursor_days(&mut self, delta: i64) -> DateRangeAction {
        let Some(current) = self.month.date(self.cursor_day) else {
            return DateRangeAction::None;
        };
        let next = if delta >= 0 {
            current.checked_add_days(Days::new(delta as u64))
        } else {
            current.checked_sub_days(Days::new(delta.unsigned_abs()))
        };
        let Some(next) = next else {
            return DateRangeAction::None;
        };
        self.month = CalendarMonth::of(next);
        self.cursor_day = next.day();
        self.follow_cursor();
        DateRangeAction::Redraw
    }

    fn move_year_cursor(&mut self, delta: i32) -> DateRangeAction {
        let next = self.year_cursor as i32 + delta;
        if next < 0 {
            self.year_center -= YEAR_GRID_LEN as i32;
            self.year_cursor = (next + YEAR_GRID_LEN as i32) as usize;
        } else if next >= YEAR_GRID_LEN as i32 {
            self.year_center += YEAR_GRID_LEN as i32;
            self.year_cursor = (next - YEAR_GRID_LEN as i32) as usize;
        } else {
            self.year_cursor = next as usize;
        }
        DateRangeAction::Redraw
    }

    fn follow_cursor(&mut self) {
        self.hovered = Some(self.cursor_day);
    }

    fn year_index(&self, year: i32) -> Option<usize> {
        year_grid(self.year_center).iter().position(|y| *y == year)
    }

    fn accept_input(&mut self, side: RangeSide) -> DateRangeAction {
        let raw = self.input(side).text();
        let outcome = accept_typed(
            &raw,
            side,
            self.value,
            self.options.format,
            self.options.bounds,
        );

        if let Some(date) = outcome.navigate_to {
            self.set_month(CalendarMonth::of(date));
            self.cursor_day = date.day();
        }
        if outcome.focus_next {
            self.set_focus(RangeSide::End);
        }
        if outcome.range == self.value {
            return DateRangeAction::Redraw;
        }

        self.value = outcome.range;
        let other = match side {
            RangeSide::Start => RangeSide::End,
            RangeSide::End => RangeSide::Start,
        };
        let format = self.options.format;
        let other_value = self.value.get(other);
        self.input_mut(other).set_date(other_value, format);
        DateRangeAction::RangeChanged(self.value)
    }

    fn sync_inputs(&mut self) {
        let format = self.options.format;
        self.start_input.set_date(self.value.start, format);
        self.end_input.set_date(self.value.end, format);
    }

    fn input(&self, side: RangeSide) -> &MaskedInput {
        match side {
            RangeSide::Start => &self.start_input,
            RangeSide::End => &self.end_input,
        }
    }

    fn input_mut(&mut self, side: RangeSide) -> &mut MaskedInput {
        match side {
            RangeSide::Start => &mut self.start_input,
            RangeSide::End => &mut self.end_input,
        }
    }

    /// Rows needed to draw the picker in its current state.
    pub fn desired_height(&self) -> u16 {
        let label = u16::from(self.options.label.is_some());
        let calendar = match (self.open, self.view) {
            (false, _) => 0,
            (true, CalendarView::Days) => {
                let cells = calendar_grid(self.month).len() as u16;
                2 + cells.div_ceil(7)
            }
            (true, CalendarView::Years) => 1 + (YEAR_GRID_LEN / YEAR_COLS) as u16,
        };
        label + 1 + calendar
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        self.hits = HitMap::default();
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(area, self.options.style);

        let mut y = area.y;
        let bottom = area.y + area.height;
        if let Some(label) = &self.options.label {
            render::put_str(area.x, y, area.width, buf, label, self.options.muted_style);
            y += 1;
        }
        if y >= bottom {
            return;
        }
        self.render_inputs(area.x, y, area.width, buf);
        y += 1;

        if !self.open || y >= bottom {
            return;
        }
        let cal = Rect::new(area.x, y, area.width.min(CALENDAR_W), bottom - y);
        match self.view {
            CalendarView::Days => self.render_days(cal, buf),
            CalendarView::Years => self.render_years(cal, buf),
        }
    }

    fn render_inputs(&mut self, x: u16, y: u16, width: u16, buf: &mut Buffer) {
        let disabled = self.options.disabled;
        let mut dx = 0u16;
        for side in [RangeSide::Start, RangeSide::End] {
            if side == RangeSide::End {
                dx += render::put_str(
                    x + dx,
                    y,
                    width.saturating_sub(dx),
                    buf,
                    " → ",
                    self.options.muted_style,
                );
            }
            let input = self.input(side);
            let focused = !disabled
                && matches!(
                    (self.focus, side),
                    (PickerFocus::Start, RangeSide::Start) | (PickerFocus::End, RangeSide::End)
                );
            let (text, style) = if input.is_empty() && !focused {
                (input.mask().placeholder().to_string(), self.options.muted_style)
            } else if focused {
                (input.text(), self.options.style.patch(self.options.focused_style))
            } else if disabled {
                (input.text(), self.options.disabled_style)
            } else {
                (input.text(), self.options.style)
            };
            let caret = input.caret() as u16;
            let used = render::put_str(x + dx, y, width.saturating_sub(dx), buf, &text, style);
            let target = match side {
                RangeSide::Start => HitTarget::StartField,
                RangeSide::End => HitTarget::EndField,
            };
            self.hits.regions.push((Rect::new(x + dx, y, used, 1), target));
            if focused {
                self.hits.caret = Some((x + dx + caret.min(used), y));
            }
            dx += used;
        }
        let toggle = if self.open { " ▴" } else { " ▾" };
        let used = render::put_str(
            x + dx,
            y,
            width.saturating_sub(dx),
            buf,
            toggle,
            self.options.muted_style,
        );
        self.hits.regions.push((Rect::new(x + dx, y, used, 1), HitTarget::Toggle));
    }

    fn render_header(&mut self, area: Rect, buf: &mut Buffer, title: &str) {
        let style = self.options.style.add_modifier(Modifier::BOLD);
        render::put_str(area.x, area.y, 1, buf, "‹", style);
        render::put_centered(area.x + 1, area.y, area.width.saturating_sub(2), buf, title, style);
        if area.width >= 2 {
            render::put_str(area.x + area.width - 1, area.y, 1, buf, "›", style);
        }
        self.hits.regions.push((Rect::new(area.x, area.y, 1, 1), HitTarget::PrevPage));
        self.hits.regions.push((
            Rect::new(area.x + 1, area.y, area.width.saturating_sub(2), 1),
            HitTarget::Title,
        ));
        if area.width >= 2 {
            self.hits
                .regions
                .push((Rect::new(area.x + area.width - 1, area.y, 1, 1), HitTarget::NextPage));
        }
    }

    fn render_days(&mut self, area: Rect, buf: &mut Buffer) {
        let title = self.month.title(&self.options.locale);
        self.render_header(Rect::new(area.x, area.y, area.width, 1), buf, &title);
        if area.height < 2 {
            return;
        }

        let weekday_y = area.y + 1;
        for (col, label) in self.weekdays.iter().enumerate() {
            let short: String = label.chars().take(2).collect();
            let x = area.x + col as u16 * CELL_W;
            if x >= area.x + area.width {
                break;
            }
            render::put_str(
                x,
                weekday_y,
                CELL_W.min(area.x + area.width - x),
                buf,
                &short,
                self.options.muted_style,
            );
        }

        let in_calendar = self.focus == PickerFocus::Calendar;
        for (i, cell) in calendar_grid(self.month).into_iter().enumerate() {
            let Some(day) = cell else { continue };
            let row = (i / 7) as u16;
            let col = (i % 7) as u16;
            let y = area.y + 2 + row;
            let x = area.x + col * CELL_W;
            if y >= area.y + area.height || x + CELL_W > area.x + area.width {
                continue;
            }

            let marks = day_marks(day, self.value, self.month, self.options.bounds, self.hovered);
            let mut style = self.options.style;
            if marks.disabled {
                style = style.patch(self.options.disabled_style);
            } else if marks.start || marks.end {
                style = style.patch(self.options.endpoint_style);
            } else if marks.in_range {
                style = style.patch(self.options.range_style);
            } else if marks.preview {
                style = style.patch(self.options.preview_style);
            }
            if in_calendar && day == self.cursor_day && !marks.disabled {
                style = style.patch(self.options.cursor_style);
            }

            let text = format!("{day:>2} ");
            render::put_str(x, y, CELL_W, buf, &text, style);
            self.hits.regions.push((Rect::new(x, y, CELL_W, 1), HitTarget::Day(day)));
        }
    }

    fn render_years(&mut self, area: Rect, buf: &mut Buffer) {
        let years = year_grid(self.year_center);
        let title = format!("{} – {}", years[0], years[YEAR_GRID_LEN - 1]);
        self.render_header(Rect::new(area.x, area.y, area.width, 1), buf, &title);

        for (i, year) in years.into_iter().enumerate() {
            let row = (i / YEAR_COLS) as u16;
            let col = (i % YEAR_COLS) as u16;
            let y = area.y + 1 + row;
            let x = area.x + col * YEAR_CELL_W;
            if y >= area.y + area.height || x + YEAR_CELL_W > area.x + area.width {
                continue;
            }
            let mut style = self.options.style;
            if year == self.month.year() {
                style = style.patch(self.options.endpoint_style);
            }
            if self.focus == PickerFocus::Calendar && i == self.year_cursor {
                style = style.patch(self.options.cursor_style);
            }
            render::put_str(x, y, YEAR_CELL_W, buf, &format!("{year:>4} "), style);
            self.hits.regions.push((Rect::new(x, y, YEAR_CELL_W, 1), HitTarget::Year(year)));
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::keymap;
    use crate::render::row_text;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn picker() -> DateRangePicker {
        let mut p = DateRangePicker::with_options(DateRangePickerOptions {
            format: DateFormat::DdMmYyyy,
            ..Default::default()
        });
        p.set_month(CalendarMonth::new(2026, 4).unwrap());
        p
    }

    fn type_text(p: &mut DateRangePicker, text: &str) -> Vec<DateRangeAction> {
        text.chars()
            .map(|c| p.handle_event(InputEvent::Key(keymap::key_char(c))))
            .collect()
    }

    #[test]
    fn typing_start_then_end_builds_range() {
        let mut p = picker();
        let actions = type_text(&mut p, "10042026");
        assert_eq!(
            actions.last(),
            Some(&DateRangeAction::RangeChanged(DateRange {
                start: Some(ymd(2026, 4, 10)),
                end: None
            }))
        );
        assert_eq!(p.focus(), PickerFocus::End);

        type_text(&mut p, "12042026");
        assert_eq!(p.value().end, Some(ymd(2026, 4, 12)));
        assert_eq!(p.input_text(RangeSide::End), "12/04/2026");
    }

    #[test]
    fn backspacing_to_empty_clears_side() {
        let mut p = picker();
        p.set_value(DateRange::new(Some(ymd(2026, 4, 10)), Some(ymd(2026, 4, 12))));
        p.set_focus(RangeSide::End);
        let mut last = DateRangeAction::None;
        for _ in 0..8 {
            last = p.handle_event(KeyCode::Backspace.into());
        }
        assert_eq!(
            last,
            DateRangeAction::RangeChanged(DateRange {
                start: Some(ymd(2026, 4, 10)),
                end: None
            })
        );
    }

    #[test]
    fn keyboard_selection_closes_calendar_on_completion() {
        let mut p = picker();
        assert_eq!(p.handle_event(KeyCode::Enter.into()), DateRangeAction::Opened);
        assert_eq!(p.cursor_day(), 1);

        p.handle_event(KeyCode::Right.into());
        assert_eq!(p.cursor_day(), 2);
        let first = p.handle_event(KeyCode::Enter.into());
        assert!(matches!(first, DateRangeAction::RangeChanged(_)));
        assert!(p.is_open());

        p.handle_event(KeyCode::Down.into());
        assert_eq!(p.hovered(), Some(9));
        let second = p.handle_event(KeyCode::Enter.into());
        assert_eq!(
            second,
            DateRangeAction::RangeChanged(DateRange {
                start: Some(ymd(2026, 4, 2)),
                end: Some(ymd(2026, 4, 9))
            })
        );
        assert!(!p.is_open());
        assert_eq!(p.input_text(RangeSide::Start), "02/04/2026");
    }

    #[test]
    fn cursor_crosses_month_boundaries() {
        let mut p = picker();
        p.open();
        p.handle_event(KeyCode::Left.into());
        assert_eq!(p.month(), CalendarMonth::new(2026, 3).unwrap());
        assert_eq!(p.cursor_day(), 31);
    }

    #[test]
    fn year_view_picks_year() {
        let mut p = picker();
        p.open();
        p.handle_event(InputEvent::Key(keymap::key_char('y')));
        assert_eq!(p.view(), CalendarView::Years);
        p.handle_event(KeyCode::Right.into());
        p.handle_event(KeyCode::Enter.into());
        assert_eq!(p.view(), CalendarView::Days);
        assert_eq!(p.month(), CalendarMonth::new(2027, 4).unwrap());
    }

    #[test]
    fn disabled_picker_ignores_input() {
        let mut p = DateRangePicker::with_options(DateRangePickerOptions {
            disabled: true,
            ..Default::default()
        });
        assert_eq!(p.handle_event(KeyCode::Enter.into()), DateRangeAction::None);
        assert_eq!(p.open(), DateRangeAction::None);
    }

    #[test]
    fn render_draws_grid_and_routes_clicks() {
        let mut p = picker();
        p.open();
        let area = Rect::new(0, 0, 30, p.desired_height());
        let mut buf = Buffer::empty(area);
        p.render(area, &mut buf);

        assert!(row_text(&buf, 0).starts_with("dd/mm/yyyy → dd/mm/yyyy"));
        assert!(row_text(&buf, 1).contains("April 2026"));
        assert!(row_text(&buf, 2).starts_with("Su Mo Tu We"));
        // April 2026 starts on a Wednesday: day 1 sits in the fourth column.
        assert_eq!(&row_text(&buf, 3)[..12], "          1 ");

        let click = |x, y| {
            InputEvent::Mouse(MouseEvent::new(x, y, MouseEventKind::Down(MouseButton::Left)))
        };
        p.handle_event(click(9, 3));
        assert_eq!(p.value().start, Some(ymd(2026, 4, 1)));

        p.handle_event(InputEvent::Mouse(MouseEvent::new(0, 4, MouseEventKind::Moved)));
        assert_eq!(p.hovered(), Some(5));
        p.handle_event(click(0, 4));
        assert_eq!(p.value().end, Some(ymd(2026, 4, 5)));
        assert!(!p.is_open());
    }
}
