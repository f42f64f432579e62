use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && modifiers_match(pattern.modifiers, event.modifiers)
}

fn modifiers_match(pattern: KeyModifiers, event: KeyModifiers) -> bool {
    pattern.shift == event.shift && pattern.ctrl == event.ctrl && pattern.alt == event.alt
}

fn any_matches(patterns: &[KeyEvent], key: &KeyEvent) -> bool {
    patterns.iter().any(|p| key_event_matches(p, key))
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_shift(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code).with_modifiers(KeyModifiers::shift())
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers {
        shift: false,
        ctrl: true,
        alt: false,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarCommand {
    Open,
    Close,
    Select,
    Left,
    Right,
    Up,
    Down,
    PrevPage,
    NextPage,
    ToggleYears,
    NextField,
    PrevField,
    Clear,
}

/// Keys understood by [`crate::date::DateRangePicker`].
///
/// Digits and `Backspace` always edit the focused input and are not configurable.
#[derive(Clone, Debug)]
pub struct CalendarBindings {
    pub open: Vec<KeyEvent>,
    pub close: Vec<KeyEvent>,
    pub select: Vec<KeyEvent>,
    pub left: Vec<KeyEvent>,
    pub right: Vec<KeyEvent>,
    pub up: Vec<KeyEvent>,
    pub down: Vec<KeyEvent>,
    pub prev_page: Vec<KeyEvent>,
    pub next_page: Vec<KeyEvent>,
    pub toggle_years: Vec<KeyEvent>,
    pub next_field: Vec<KeyEvent>,
    pub prev_field: Vec<KeyEvent>,
    pub clear: Vec<KeyEvent>,
}

impl Default for CalendarBindings {
    fn default() -> Self {
        Self {
            open: vec![key(KeyCode::Enter), key(KeyCode::Down)],
            close: vec![key(KeyCode::Esc)],
            select: vec![key(KeyCode::Enter), key_char(' ')],
            left: vec![key(KeyCode::Left), key_char('h')],
            right: vec![key(KeyCode::Right), key_char('l')],
            up: vec![key(KeyCode::Up), key_char('k')],
            down: vec![key(KeyCode::Down), key_char('j')],
            prev_page: vec![
                key(KeyCode::PageUp),
                key_char('<'),
                key_shift(KeyCode::Char('<')),
            ],
            next_page: vec![
                key(KeyCode::PageDown),
                key_char('>'),
                key_shift(KeyCode::Char('>')),
            ],
            toggle_years: vec![key_char('y')],
            next_field: vec![key(KeyCode::Tab)],
            // Terminals report Shift+Tab as BackTab with SHIFT still set.
            prev_field: vec![
                key(KeyCode::BackTab),
                key_shift(KeyCode::BackTab),
                key_shift(KeyCode::Tab),
            ],
            clear: vec![key(KeyCode::Delete), key_ctrl('u')],
        }
    }
}

impl CalendarBindings {
    /// Command for `key` while the calendar popover has focus.
    pub fn calendar_command(&self, key: &KeyEvent) -> Option<CalendarCommand> {
        let table = [
            (&self.close, CalendarCommand::Close),
            (&self.select, CalendarCommand::Select),
            (&self.left, CalendarCommand::Left),
            (&self.right, CalendarCommand::Right),
            (&self.up, CalendarCommand::Up),
            (&self.down, CalendarCommand::Down),
            (&self.prev_page, CalendarCommand::PrevPage),
            (&self.next_page, CalendarCommand::NextPage),
            (&self.toggle_years, CalendarCommand::ToggleYears),
            (&self.next_field, CalendarCommand::NextField),
            (&self.prev_field, CalendarCommand::PrevField),
        ];
        lookup(&table, key)
    }

    /// Command for `key` while one of the text inputs has focus.
    pub fn input_command(&self, key: &KeyEvent) -> Option<CalendarCommand> {
        let table = [
            (&self.open, CalendarCommand::Open),
            (&self.close, CalendarCommand::Close),
            (&self.next_field, CalendarCommand::NextField),
            (&self.prev_field, CalendarCommand::PrevField),
            (&self.clear, CalendarCommand::Clear),
        ];
        lookup(&table, key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeCommand {
    Up,
    Down,
    Expand,
    Collapse,
    Activate,
    ToggleSelect,
    Top,
    Bottom,
    PageUp,
    PageDown,
}

/// Keys understood by [`crate::tree::TreeView`].
#[derive(Clone, Debug)]
pub struct TreeBindings {
    pub up: Vec<KeyEvent>,
    pub down: Vec<KeyEvent>,
    pub expand: Vec<KeyEvent>,
    pub collapse: Vec<KeyEvent>,
    pub activate: Vec<KeyEvent>,
    pub toggle_select: Vec<KeyEvent>,
    pub top: Vec<KeyEvent>,
    pub bottom: Vec<KeyEvent>,
    pub page_up: Vec<KeyEvent>,
    pub page_down: Vec<KeyEvent>,
}

impl Default for TreeBindings {
    fn default() -> Self {
        Self {
            up: vec![key(KeyCode::Up), key_char('k')],
            down: vec![key(KeyCode::Down), key_char('j')],
            expand: vec![key(KeyCode::Right), key_char('l')],
            collapse: vec![key(KeyCode::Left), key_char('h')],
            activate: vec![key(KeyCode::Enter)],
            toggle_select: vec![key_char(' ')],
            top: vec![key(KeyCode::Home), key_char('g')],
            bottom: vec![
                key(KeyCode::End),
                key_char('G'),
                key_shift(KeyCode::Char('G')),
            ],
            page_up: vec![key(KeyCode::PageUp), key_ctrl('u')],
            page_down: vec![key(KeyCode::PageDown), key_ctrl('d')],
        }
    }
}

impl TreeBindings {
    pub fn command_for(&self, key: &KeyEvent) -> Option<TreeCommand> {
        let table = [
            (&self.up, TreeCommand::Up),
            (&self.down, TreeCommand::Down),
            (&self.expand, TreeCommand::Expand),
            (&self.collapse, TreeCommand::Collapse),
            (&self.activate, TreeCommand::Activate),
            (&self.toggle_select, TreeCommand::ToggleSelect),
            (&self.top, TreeCommand::Top),
            (&self.bottom, TreeCommand::Bottom),
            (&self.page_up, TreeCommand::PageUp),
            (&self.page_down, TreeCommand::PageDown),
        ];
        lookup(&table, key)
    }
}

fn lookup<C: Copy>(table: &[(&Vec<KeyEvent>, C)], key: &KeyEvent) -> Option<C> {
    table
        .iter()
        .find(|(patterns, _)| any_matches(patterns, key))
        .map(|(_, cmd)| *cmd)
}
