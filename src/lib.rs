//! ShiftLang Library
//!
//! Select text anywhere, press the hotkey, and the selection is replaced by
//! its translation.

pub mod clipboard;
pub mod config;
pub mod diagnostics;
pub mod direction;
pub mod error;
pub mod hotkey;
pub mod input;
pub mod language;
pub mod listener;
pub mod pipeline;
pub mod session;
pub mod translate;

pub use error::{ShiftError, ShiftResult};
