//! Terminal adapter trait and capability detection (spec §4.5).

pub mod cross;

use crate::error::Result;
use crate::render::buffer::RenderBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Rune(char),
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Escape,
    Backspace,
    Tab,
    /// Tick sentinel: delivered when no real key arrived within a poll
    /// window, so the input thread never blocks the reader forever.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermEvent {
    Key(KeyCode),
    Resize { width: u16, height: u16 },
    Closed,
    Error,
}

/// Terminal color capability, detected from the environment per spec
/// §4.5's inspection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    TrueColor,
    Indexed256,
}

/// Inspects the process environment in the order spec §4.5 mandates:
/// `COLORTERM`, then `TERM`, then known emulator markers. Defaults to
/// 256-color.
pub fn detect_capability() -> Capability {
    detect_capability_from(|name| std::env::var(name).ok())
}

/// Testable variant of `detect_capability` taking an environment
/// lookup function instead of reading the real process environment.
pub fn detect_capability_from(lookup: impl Fn(&str) -> Option<String>) -> Capability {
    if let Some(v) = lookup("COLORTERM") {
        let v = v.to_ascii_lowercase();
        if v.contains("truecolor") || v.contains("24bit") {
            return Capability::TrueColor;
        }
    }
    if let Some(v) = lookup("TERM") {
        let v = v.to_ascii_lowercase();
        if v.contains("truecolor") || v.contains("24bit") || v == "xterm-direct" {
            return Capability::TrueColor;
        }
    }
    for marker in ["WT_SESSION", "KITTY_WINDOW_ID", "KONSOLE_VERSION", "ITERM_SESSION_ID"] {
        if lookup(marker).is_some() {
            return Capability::TrueColor;
        }
    }
    Capability::Indexed256
}

/// The terminal adapter contract: detect capabilities, emit ANSI, and
/// deliver input/resize events. A small (<=6 method), low-frequency
/// interface — a trait object is acceptable per Design Note §9.
pub trait Adapter {
    fn init(&mut self) -> Result<()>;
    /// Reverses `init`; MUST be idempotent and safe to call from a
    /// panic hook.
    fn fini(&mut self);
    fn flush(&mut self, buf: &RenderBuffer) -> Result<()>;
    fn poll_event(&mut self) -> Option<TermEvent>;
    fn capability(&self) -> Capability;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorterm_truecolor_wins() {
        let cap = detect_capability_from(|k| {
            if k == "COLORTERM" {
                Some("truecolor".to_string())
            } else {
                None
            }
        });
        assert_eq!(cap, Capability::TrueColor);
    }

    #[test]
    fn kitty_marker_implies_truecolor() {
        let cap = detect_capability_from(|k| {
            if k == "KITTY_WINDOW_ID" {
                Some("1".to_string())
            } else {
                None
            }
        });
        assert_eq!(cap, Capability::TrueColor);
    }

    #[test]
    fn no_markers_defaults_to_256() {
        let cap = detect_capability_from(|_| None);
        assert_eq!(cap, Capability::Indexed256);
    }
}
