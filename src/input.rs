//! Key injection using Linux evdev/uinput
//!
//! Sends the copy and paste chords through a virtual keyboard, so it works
//! on both X11 and Wayland without compositor-specific protocols.

use crate::error::{ShiftError, ShiftResult};
use evdev::{uinput::VirtualDeviceBuilder, AttributeSet, Key};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Name of the uinput device. The listener skips devices with this name so
/// injected chords are never read back as user input.
pub const VIRTUAL_KEYBOARD_NAME: &str = "ShiftLang Virtual Keyboard";

/// Injects the copy and paste chords into the focused window
pub trait KeyInjector: Send {
    /// Send the copy chord (Ctrl+C)
    fn copy(&mut self) -> ShiftResult<()>;

    /// Send the paste chord (Ctrl+V)
    fn paste(&mut self) -> ShiftResult<()>;
}

/// Virtual keyboard for simulating key presses
pub struct VirtualKeyboard {
    device: evdev::uinput::VirtualDevice,
}

impl VirtualKeyboard {
    /// Create a new virtual keyboard device (needs write access to /dev/uinput)
    pub fn new() -> ShiftResult<Self> {
        let mut keys = AttributeSet::<Key>::new();
        for key in [
            Key::KEY_LEFTCTRL,
            Key::KEY_RIGHTCTRL,
            Key::KEY_LEFTSHIFT,
            Key::KEY_RIGHTSHIFT,
            Key::KEY_C,
            Key::KEY_V,
            Key::KEY_INSERT,
        ] {
            keys.insert(key);
        }

        let device = VirtualDeviceBuilder::new()
            .and_then(|builder| builder.name(VIRTUAL_KEYBOARD_NAME).with_keys(&keys))
            .and_then(|builder| builder.build())
            .map_err(|e| {
                ShiftError::Injection(format!("Failed to create virtual keyboard: {}", e))
            })?;

        info!("⌨️ Virtual keyboard created");
        Ok(Self { device })
    }

    fn emit(&mut self, key: Key, value: i32) -> ShiftResult<()> {
        self.device
            .emit(&[evdev::InputEvent::new(
                evdev::EventType::KEY,
                key.code(),
                value,
            )])
            .map_err(|e| ShiftError::Injection(format!("{:?}: {}", key, e)))
    }

    /// Press and release a single key
    pub fn tap_key(&mut self, key: Key) -> ShiftResult<()> {
        self.press_key(key)?;
        thread::sleep(Duration::from_millis(10));
        self.release_key(key)
    }

    pub fn press_key(&mut self, key: Key) -> ShiftResult<()> {
        debug!("Key down: {:?}", key);
        self.emit(key, 1)
    }

    pub fn release_key(&mut self, key: Key) -> ShiftResult<()> {
        debug!("Key up: {:?}", key);
        self.emit(key, 0)
    }

    /// Type a key combination (e.g., Ctrl+C)
    pub fn key_combo(&mut self, modifiers: &[Key], key: Key) -> ShiftResult<()> {
        for modifier in modifiers {
            self.press_key(*modifier)?;
            thread::sleep(Duration::from_millis(5));
        }

        let tapped = self.tap_key(key);

        // Release modifiers even if the tap failed, so none stays stuck
        for modifier in modifiers.iter().rev() {
            self.release_key(*modifier)?;
            thread::sleep(Duration::from_millis(5));
        }

        tapped
    }
}

impl KeyInjector for VirtualKeyboard {
    fn copy(&mut self) -> ShiftResult<()> {
        self.key_combo(&[Key::KEY_LEFTCTRL], Key::KEY_C)
    }

    fn paste(&mut self) -> ShiftResult<()> {
        self.key_combo(&[Key::KEY_LEFTCTRL], Key::KEY_V)
    }
}

/// Parse a non-modifier key name (as used in chord strings) to an evdev Key
pub fn parse_key(name: &str) -> Option<Key> {
    let name = name.trim().to_lowercase();

    if let Some(key) = letter_or_digit(&name) {
        return Some(key);
    }

    let key = match name.as_str() {
        // Function keys
        "f1" => Key::KEY_F1,
        "f2" => Key::KEY_F2,
        "f3" => Key::KEY_F3,
        "f4" => Key::KEY_F4,
        "f5" => Key::KEY_F5,
        "f6" => Key::KEY_F6,
        "f7" => Key::KEY_F7,
        "f8" => Key::KEY_F8,
        "f9" => Key::KEY_F9,
        "f10" => Key::KEY_F10,
        "f11" => Key::KEY_F11,
        "f12" => Key::KEY_F12,
        // Navigation
        "up" => Key::KEY_UP,
        "down" => Key::KEY_DOWN,
        "left" => Key::KEY_LEFT,
        "right" => Key::KEY_RIGHT,
        "home" => Key::KEY_HOME,
        "end" => Key::KEY_END,
        "pageup" | "pgup" => Key::KEY_PAGEUP,
        "pagedown" | "pgdn" => Key::KEY_PAGEDOWN,
        // Common
        "space" => Key::KEY_SPACE,
        "enter" | "return" => Key::KEY_ENTER,
        "tab" => Key::KEY_TAB,
        "esc" | "escape" => Key::KEY_ESC,
        "backspace" => Key::KEY_BACKSPACE,
        "delete" | "del" => Key::KEY_DELETE,
        "insert" | "ins" => Key::KEY_INSERT,
        "pause" => Key::KEY_PAUSE,
        _ => return None,
    };
    Some(key)
}

const LETTERS: [Key; 26] = [
    Key::KEY_A,
    Key::KEY_B,
    Key::KEY_C,
    Key::KEY_D,
    Key::KEY_E,
    Key::KEY_F,
    Key::KEY_G,
    Key::KEY_H,
    Key::KEY_I,
    Key::KEY_J,
    Key::KEY_K,
    Key::KEY_L,
    Key::KEY_M,
    Key::KEY_N,
    Key::KEY_O,
    Key::KEY_P,
    Key::KEY_Q,
    Key::KEY_R,
    Key::KEY_S,
    Key::KEY_T,
    Key::KEY_U,
    Key::KEY_V,
    Key::KEY_W,
    Key::KEY_X,
    Key::KEY_Y,
    Key::KEY_Z,
];

const DIGITS: [Key; 10] = [
    Key::KEY_0,
    Key::KEY_1,
    Key::KEY_2,
    Key::KEY_3,
    Key::KEY_4,
    Key::KEY_5,
    Key::KEY_6,
    Key::KEY_7,
    Key::KEY_8,
    Key::KEY_9,
];

/// Every letter key A-Z
pub fn letter_keys() -> &'static [Key] {
    &LETTERS
}

/// Every digit key 0-9 (top row)
pub fn digit_keys() -> &'static [Key] {
    &DIGITS
}

fn letter_or_digit(name: &str) -> Option<Key> {
    let mut chars = name.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match ch {
        'a'..='z' => Some(LETTERS[(ch as u8 - b'a') as usize]),
        '0'..='9' => Some(DIGITS[(ch as u8 - b'0') as usize]),
        _ => None,
    }
}
