//! Input Module - terminal key events for event handlers.
//!
//! Bridges crossterm's key events to the key codes carried by [`Event`], so a
//! terminal front end can fire `keyup` / `keydown` handlers the way a browser
//! would.
//!
//! # API
//!
//! - `convert_key_event` - Convert a crossterm KeyEvent to a [`KeyInput`]
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//!
//! # Example
//!
//! ```ignore
//! loop {
//!     if let Ok(Some(InputEvent::Key(key))) = poll_event(Duration::from_millis(50)) {
//!         let event = key.to_event("keyup", input_node, Some(buffer.clone()));
//!         tree.dispatch_event(&event);
//!     }
//! }
//! ```

use std::time::Duration;

use crossterm::event::{
    poll, read, Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind,
    KeyModifiers,
};

use crate::types::Event;

/// Key code of Enter.
pub const ENTER_KEY: u32 = 13;
/// Key code of Escape.
pub const ESCAPE_KEY: u32 = 27;
/// Key code of Backspace.
pub const BACKSPACE_KEY: u32 = 8;
/// Key code of Tab.
pub const TAB_KEY: u32 = 9;

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Terminal event after conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key was pressed (or repeated).
    Key(KeyInput),
    /// Terminal resize (new width, height).
    Resize(u16, u16),
    /// Anything else, including key releases.
    None,
}

/// A pressed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    /// Browser-style key code (`13` for Enter, `65` for `a`/`A`).
    pub key_code: Option<u32>,
    /// Printable character, if the key produces one.
    pub ch: Option<char>,
    /// Control held.
    pub ctrl: bool,
}

impl KeyInput {
    /// Build the [`Event`] delivered to a handler.
    pub fn to_event<N>(&self, name: &str, target: N, value: Option<String>) -> Event<N> {
        let mut event = Event::new(name, target);
        event.key_code = self.key_code;
        event.value = value;
        event
    }

    /// Whether this is Ctrl+C.
    pub fn is_interrupt(&self) -> bool {
        self.ctrl && matches!(self.ch, Some('c') | Some('C'))
    }
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert a crossterm KeyEvent. Releases convert to `None`.
pub fn convert_key_event(event: CrosstermKeyEvent) -> Option<KeyInput> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let (key_code, ch) = match event.code {
        KeyCode::Char(c) => (Some(char_key_code(c)), Some(c)),
        KeyCode::Enter => (Some(ENTER_KEY), None),
        KeyCode::Esc => (Some(ESCAPE_KEY), None),
        KeyCode::Backspace => (Some(BACKSPACE_KEY), None),
        KeyCode::Tab => (Some(TAB_KEY), None),
        KeyCode::Delete => (Some(46), None),
        KeyCode::Left => (Some(37), None),
        KeyCode::Up => (Some(38), None),
        KeyCode::Right => (Some(39), None),
        KeyCode::Down => (Some(40), None),
        KeyCode::F(n) => (Some(111 + u32::from(n)), None),
        _ => (None, None),
    };

    Some(KeyInput {
        key_code,
        ch,
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
    })
}

/// Letters map to their upper-case code, like browser `keyCode`.
fn char_key_code(c: char) -> u32 {
    if c.is_ascii_alphabetic() {
        c.to_ascii_uppercase() as u32
    } else {
        c as u32
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    match read()? {
        CrosstermEvent::Key(key) => Ok(convert_key_event(key).map_or(InputEvent::None, InputEvent::Key)),
        CrosstermEvent::Resize(w, h) => Ok(InputEvent::Resize(w, h)),
        _ => Ok(InputEvent::None),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_convert_enter_and_escape() {
        let enter = convert_key_event(key(KeyCode::Enter, KeyModifiers::empty(), KeyEventKind::Press));
        let escape = convert_key_event(key(KeyCode::Esc, KeyModifiers::empty(), KeyEventKind::Press));

        assert_eq!(enter.and_then(|k| k.key_code), Some(ENTER_KEY));
        assert_eq!(escape.and_then(|k| k.key_code), Some(ESCAPE_KEY));
    }

    #[test]
    fn test_convert_letters() {
        let lower = convert_key_event(key(KeyCode::Char('a'), KeyModifiers::empty(), KeyEventKind::Press)).unwrap();
        assert_eq!(lower.key_code, Some(65));
        assert_eq!(lower.ch, Some('a'));

        let digit = convert_key_event(key(KeyCode::Char('1'), KeyModifiers::empty(), KeyEventKind::Repeat)).unwrap();
        assert_eq!(digit.key_code, Some('1' as u32));
    }

    #[test]
    fn test_convert_function_keys() {
        let f2 = convert_key_event(key(KeyCode::F(2), KeyModifiers::empty(), KeyEventKind::Press)).unwrap();
        assert_eq!(f2.key_code, Some(113));
        assert_eq!(f2.ch, None);
    }

    #[test]
    fn test_release_is_ignored() {
        let released = convert_key_event(key(KeyCode::Enter, KeyModifiers::empty(), KeyEventKind::Release));
        assert!(released.is_none());
    }

    #[test]
    fn test_ctrl_c_is_interrupt() {
        let input = convert_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press)).unwrap();
        assert!(input.ctrl);
        assert!(input.is_interrupt());
    }

    #[test]
    fn test_to_event_carries_code_and_value() {
        let input = convert_key_event(key(KeyCode::Enter, KeyModifiers::empty(), KeyEventKind::Press)).unwrap();
        let event = input.to_event("keyup", 7u32, Some("milk".to_string()));

        assert_eq!(event.name, "keyup");
        assert_eq!(event.target, 7);
        assert_eq!(event.key_code, Some(ENTER_KEY));
        assert_eq!(event.value.as_deref(), Some("milk"));
    }
}
