//! Mock Desktop for Testing
//!
//! A fake focused window plus a fake system clipboard. The copy chord puts
//! the current selection on the clipboard; the paste chord replaces the
//! selection with the clipboard content.

use shiftlang::clipboard::ClipboardBackend;
use shiftlang::input::KeyInjector;
use shiftlang::{ShiftError, ShiftResult};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct DesktopState {
    pub clipboard: String,
    /// Selected text in the focused window (`None` = nothing selected)
    pub selection: Option<String>,
    /// Every paste, in order
    pub pasted: Vec<String>,
    /// Every clipboard write with its history-exclusion flag
    pub writes: Vec<(String, bool)>,
    pub copies: usize,
    pub fail_paste: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockDesktop {
    pub state: Arc<Mutex<DesktopState>>,
}

impl MockDesktop {
    pub fn with_selection(text: &str) -> Self {
        let desktop = Self::default();
        desktop.state.lock().unwrap().selection = Some(text.to_string());
        desktop
    }

    pub fn without_selection() -> Self {
        Self::default()
    }

    pub fn set_clipboard(&self, text: &str) {
        self.state.lock().unwrap().clipboard = text.to_string();
    }

    pub fn clipboard(&self) -> String {
        self.state.lock().unwrap().clipboard.clone()
    }

    pub fn pasted(&self) -> Vec<String> {
        self.state.lock().unwrap().pasted.clone()
    }

    pub fn writes(&self) -> Vec<(String, bool)> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn copies(&self) -> usize {
        self.state.lock().unwrap().copies
    }

    pub fn fail_paste(&self) {
        self.state.lock().unwrap().fail_paste = true;
    }
}

impl ClipboardBackend for MockDesktop {
    fn read(&self) -> ShiftResult<String> {
        Ok(self.state.lock().unwrap().clipboard.clone())
    }

    fn write(&self, text: &str, exclude_from_history: bool) -> ShiftResult<()> {
        let mut state = self.state.lock().unwrap();
        state.clipboard = text.to_string();
        state
            .writes
            .push((text.to_string(), exclude_from_history));
        Ok(())
    }
}

impl KeyInjector for MockDesktop {
    fn copy(&mut self) -> ShiftResult<()> {
        let mut state = self.state.lock().unwrap();
        state.copies += 1;
        if let Some(selection) = state.selection.clone() {
            state.clipboard = selection;
        }
        Ok(())
    }

    fn paste(&mut self) -> ShiftResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_paste {
            return Err(ShiftError::Injection("uinput write failed".to_string()));
        }
        let text = state.clipboard.clone();
        state.selection = Some(text.clone());
        state.pasted.push(text);
        Ok(())
    }
}
