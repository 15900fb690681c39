//! Hotkey chords
//!
//! Parses chord strings such as `"alt+shift+g"` into key groups and tracks
//! the pressed-key set to decide when the chord becomes active.

use crate::error::{ShiftError, ShiftResult};
use crate::input::parse_key;
use evdev::Key;
use std::collections::HashSet;
use std::fmt;

/// State carried by an `EV_KEY` event value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Released,
    Pressed,
    Repeat,
}

impl KeyState {
    /// Map an evdev key event value (0, 1, 2)
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyState::Released),
            1 => Some(KeyState::Pressed),
            2 => Some(KeyState::Repeat),
            _ => None,
        }
    }
}

/// Keys that satisfy one element of a chord (left/right variants of a
/// modifier, or the single terminal key)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGroup {
    pub keys: Vec<Key>,
}

impl KeyGroup {
    fn satisfied_by(&self, pressed: &HashSet<Key>) -> bool {
        self.keys.iter().any(|key| pressed.contains(key))
    }
}

/// A parsed hotkey chord
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    spec: String,
    modifiers: Vec<KeyGroup>,
    terminal: Key,
}

fn modifier_group(name: &str) -> Option<KeyGroup> {
    let keys = match name {
        "ctrl" | "control" => vec![Key::KEY_LEFTCTRL, Key::KEY_RIGHTCTRL],
        "shift" => vec![Key::KEY_LEFTSHIFT, Key::KEY_RIGHTSHIFT],
        "alt" | "option" => vec![Key::KEY_LEFTALT, Key::KEY_RIGHTALT],
        "meta" | "cmd" | "command" | "super" | "win" => {
            vec![Key::KEY_LEFTMETA, Key::KEY_RIGHTMETA]
        }
        _ => return None,
    };
    Some(KeyGroup { keys })
}

impl Hotkey {
    /// Parse a chord string. Requires at least one modifier and exactly one
    /// terminal key; case and whitespace are ignored.
    pub fn parse(spec: &str) -> ShiftResult<Self> {
        let invalid = |reason: &str| ShiftError::Hotkey {
            hotkey: spec.to_string(),
            reason: reason.to_string(),
        };

        let normalized: String = spec
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if normalized.is_empty() {
            return Err(invalid("empty chord"));
        }

        let mut modifiers: Vec<KeyGroup> = Vec::new();
        let mut terminals: Vec<Key> = Vec::new();

        for part in normalized.split('+') {
            if part.is_empty() {
                return Err(invalid("empty key name"));
            }
            if let Some(group) = modifier_group(part) {
                if !modifiers.contains(&group) {
                    modifiers.push(group);
                }
                continue;
            }
            match parse_key(part) {
                Some(key) => terminals.push(key),
                None => return Err(invalid(&format!("unknown key '{}'", part))),
            }
        }

        if modifiers.is_empty() {
            return Err(invalid("at least one modifier is required"));
        }
        let terminal = match terminals.as_slice() {
            [key] => *key,
            [] => return Err(invalid("missing terminal key")),
            _ => return Err(invalid("only one non-modifier key is allowed")),
        };

        Ok(Self {
            spec: normalized,
            modifiers,
            terminal,
        })
    }

    pub fn terminal(&self) -> Key {
        self.terminal
    }

    pub fn modifiers(&self) -> &[KeyGroup] {
        &self.modifiers
    }

    /// True when every group has at least one key in `pressed`
    pub fn is_active(&self, pressed: &HashSet<Key>) -> bool {
        pressed.contains(&self.terminal)
            && self
                .modifiers
                .iter()
                .all(|group| group.satisfied_by(pressed))
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spec)
    }
}

/// Owns the pressed-key set and reports chord activation once per
/// physical press-and-hold.
#[derive(Debug)]
pub struct ChordTracker {
    hotkey: Hotkey,
    pressed: HashSet<Key>,
    latched: bool,
}

impl ChordTracker {
    pub fn new(hotkey: Hotkey) -> Self {
        Self {
            hotkey,
            pressed: HashSet::new(),
            latched: false,
        }
    }

    pub fn hotkey(&self) -> &Hotkey {
        &self.hotkey
    }

    /// Feed one key event; returns true when the chord just became active.
    pub fn handle(&mut self, key: Key, state: KeyState) -> bool {
        match state {
            KeyState::Repeat => false,
            KeyState::Pressed => {
                self.pressed.insert(key);
                if !self.latched && self.hotkey.is_active(&self.pressed) {
                    self.latched = true;
                    return true;
                }
                false
            }
            KeyState::Released => {
                self.pressed.remove(&key);
                if !self.hotkey.is_active(&self.pressed) {
                    self.latched = false;
                }
                false
            }
        }
    }

    /// Forget every tracked key (called once a trigger is accepted)
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.latched = false;
    }

    pub fn pressed_count(&self) -> usize {
        self.pressed.len()
    }
}
