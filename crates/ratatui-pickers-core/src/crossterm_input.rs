use crossterm::event as ct;

use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;
use crate::input::MouseButton;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;

/// Converts a crossterm event; key releases/repeats and unsupported events map to `None`.
pub fn input_event_from_crossterm(ev: ct::Event) -> Option<InputEvent> {
    match ev {
        ct::Event::Key(key) if key.kind == ct::KeyEventKind::Press => {
            key_event_from_crossterm(key).map(InputEvent::Key)
        }
        ct::Event::Paste(s) => Some(InputEvent::Paste(s)),
        ct::Event::Mouse(m) => mouse_event_from_crossterm(m).map(InputEvent::Mouse),
        _ => None,
    }
}

pub fn key_event_from_crossterm(key: ct::KeyEvent) -> Option<KeyEvent> {
    let code = match key.code {
        ct::KeyCode::Char(c) => KeyCode::Char(c),
        ct::KeyCode::Enter => KeyCode::Enter,
        ct::KeyCode::Backspace => KeyCode::Backspace,
        ct::KeyCode::Delete => KeyCode::Delete,
        ct::KeyCode::Tab => KeyCode::Tab,
        ct::KeyCode::BackTab => KeyCode::BackTab,
        ct::KeyCode::Esc => KeyCode::Esc,
        ct::KeyCode::Left => KeyCode::Left,
        ct::KeyCode::Right => KeyCode::Right,
        ct::KeyCode::Up => KeyCode::Up,
        ct::KeyCode::Down => KeyCode::Down,
        ct::KeyCode::Home => KeyCode::Home,
        ct::KeyCode::End => KeyCode::End,
        ct::KeyCode::PageUp => KeyCode::PageUp,
        ct::KeyCode::PageDown => KeyCode::PageDown,
        _ => return None,
    };

    Some(KeyEvent {
        code,
        modifiers: modifiers_from_crossterm(key.modifiers),
    })
}

pub fn mouse_event_from_crossterm(m: ct::MouseEvent) -> Option<MouseEvent> {
    let kind = match m.kind {
        ct::MouseEventKind::Down(b) => MouseEventKind::Down(button(b)),
        ct::MouseEventKind::Up(b) => MouseEventKind::Up(button(b)),
        ct::MouseEventKind::Moved => MouseEventKind::Moved,
        ct::MouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        ct::MouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        _ => return None,
    };

    Some(MouseEvent {
        x: m.column,
        y: m.row,
        kind,
        modifiers: modifiers_from_crossterm(m.modifiers),
    })
}

fn modifiers_from_crossterm(m: ct::KeyModifiers) -> KeyModifiers {
    KeyModifiers {
        shift: m.contains(ct::KeyModifiers::SHIFT),
        ctrl: m.contains(ct::KeyModifiers::CONTROL),
        alt: m.contains(ct::KeyModifiers::ALT),
    }
}

fn button(b: ct::MouseButton) -> MouseButton {
    match b {
        ct::MouseButton::Left => MouseButton::Left,
        ct::MouseButton::Right => MouseButton::Right,
        ct::MouseButton::Middle => MouseButton::Middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::CalendarBindings;
    use crate::keymap::CalendarCommand;
    use crate::keymap::TreeBindings;
    use crate::keymap::TreeCommand;

    fn pressed(code: ct::KeyCode, modifiers: ct::KeyModifiers) -> KeyEvent {
        match input_event_from_crossterm(ct::Event::Key(ct::KeyEvent::new(code, modifiers))) {
            Some(InputEvent::Key(key)) => key,
            other => panic!("expected a key event, got {other:?}"),
        }
    }

    #[test]
    fn shift_tab_reaches_prev_field() {
        let key = pressed(ct::KeyCode::BackTab, ct::KeyModifiers::SHIFT);
        assert!(key.modifiers.shift);

        let b = CalendarBindings::default();
        assert_eq!(b.input_command(&key), Some(CalendarCommand::PrevField));
        assert_eq!(b.calendar_command(&key), Some(CalendarCommand::PrevField));
    }

    #[test]
    fn uppercase_g_jumps_to_bottom() {
        let key = pressed(ct::KeyCode::Char('G'), ct::KeyModifiers::SHIFT);
        let b = TreeBindings::default();
        assert_eq!(b.command_for(&key), Some(TreeCommand::Bottom));
    }

    #[test]
    fn releases_are_dropped() {
        let mut release = ct::KeyEvent::new(ct::KeyCode::Enter, ct::KeyModifiers::NONE);
        release.kind = ct::KeyEventKind::Release;
        assert_eq!(input_event_from_crossterm(ct::Event::Key(release)), None);
    }
}
