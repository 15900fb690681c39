//! Clipboard Bridge
//!
//! Reads and writes the system clipboard. The clipboard is shared with every
//! other application, so capture never trusts a single read: it clears the
//! clipboard first and polls until a fresh value shows up.

use crate::error::{ShiftError, ShiftResult};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Raw clipboard access
pub trait ClipboardBackend: Send + Sync {
    /// Current text content (empty when the clipboard holds no text)
    fn read(&self) -> ShiftResult<String>;

    /// Replace the content. With `exclude_from_history`, the entry is
    /// flagged so clipboard managers do not record it.
    fn write(&self, text: &str, exclude_from_history: bool) -> ShiftResult<()>;

    /// Reset the content to the empty sentinel
    fn clear(&self) -> ShiftResult<()> {
        self.write("", true)
    }
}

/// System clipboard through arboard (X11, Wayland data-control, others)
pub struct SystemClipboard {
    // Kept alive for the whole process: on X11 the content disappears
    // with its owner.
    inner: Mutex<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> ShiftResult<Self> {
        let clipboard = arboard::Clipboard::new()
            .map_err(|e| ShiftError::Clipboard(format!("Failed to open clipboard: {}", e)))?;
        Ok(Self {
            inner: Mutex::new(clipboard),
        })
    }
}

impl ClipboardBackend for SystemClipboard {
    fn read(&self) -> ShiftResult<String> {
        let mut clipboard = self.inner.lock()?;
        match clipboard.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(ShiftError::Clipboard(e.to_string())),
        }
    }

    fn write(&self, text: &str, exclude_from_history: bool) -> ShiftResult<()> {
        let mut clipboard = self.inner.lock()?;
        let set = clipboard.set();

        #[cfg(all(
            unix,
            not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
        ))]
        let set = if exclude_from_history {
            use arboard::SetExtLinux;
            set.exclude_from_history()
        } else {
            set
        };

        #[cfg(windows)]
        let set = if exclude_from_history {
            use arboard::SetExtWindows;
            set.exclude_from_history()
        } else {
            set
        };

        #[cfg(not(any(
            windows,
            all(
                unix,
                not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))
            )
        )))]
        let _ = exclude_from_history;

        set.text(text.to_string())
            .map_err(|e| ShiftError::Clipboard(e.to_string()))
    }

    fn clear(&self) -> ShiftResult<()> {
        let mut clipboard = self.inner.lock()?;
        clipboard
            .clear()
            .map_err(|e| ShiftError::Clipboard(e.to_string()))
    }
}

/// Clear / capture / write protocol on top of a [`ClipboardBackend`]
///
/// Backend calls can block on the display server, so each one runs on the
/// blocking pool.
#[derive(Clone)]
pub struct ClipboardBridge {
    backend: Arc<dyn ClipboardBackend>,
}

impl ClipboardBridge {
    pub fn new(backend: Arc<dyn ClipboardBackend>) -> Self {
        Self { backend }
    }

    async fn blocking<T, F>(&self, op: F) -> ShiftResult<T>
    where
        F: FnOnce(&dyn ClipboardBackend) -> ShiftResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        tokio::task::spawn_blocking(move || op(backend.as_ref()))
            .await
            .map_err(|e| ShiftError::Clipboard(format!("clipboard task failed: {}", e)))?
    }

    /// Clear the clipboard before a copy.
    ///
    /// Returns the value capture must see change. That is the empty sentinel
    /// normally, or whatever is still there when clearing failed.
    pub async fn prepare_capture(&self) -> String {
        match self.clear().await {
            Ok(()) => String::new(),
            Err(e) => {
                warn!("Could not clear clipboard before copy: {}", e);
                self.read().await.unwrap_or_default()
            }
        }
    }

    /// Poll until the clipboard holds non-empty text different from
    /// `previous`, or `timeout` elapses (returns an empty string).
    pub async fn capture(&self, previous: &str, timeout: Duration, poll_interval: Duration) -> String {
        let deadline = Instant::now() + timeout;

        loop {
            match self.read().await {
                Ok(text) if !text.trim().is_empty() && text != previous => {
                    debug!("📋 Captured {} chars", text.chars().count());
                    return text;
                }
                Ok(_) => {}
                Err(e) => debug!("Clipboard read failed, retrying: {}", e),
            }

            let now = Instant::now();
            if now >= deadline {
                return String::new();
            }
            tokio::time::sleep(poll_interval.min(deadline - now)).await;
        }
    }

    /// Write `text`, excluded from clipboard history where supported
    pub async fn write(&self, text: &str) -> ShiftResult<()> {
        let text = text.to_string();
        self.blocking(move |backend| backend.write(&text, true)).await
    }

    /// Reset the clipboard to empty
    pub async fn clear(&self) -> ShiftResult<()> {
        self.blocking(|backend| backend.clear()).await
    }

    pub async fn read(&self) -> ShiftResult<String> {
        self.blocking(|backend| backend.read()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a scripted sequence of reads, then repeats the last one
    struct ScriptedClipboard {
        reads: Vec<ShiftResult<String>>,
        calls: AtomicUsize,
        fail_clear: bool,
    }

    impl ScriptedClipboard {
        fn new(reads: Vec<ShiftResult<String>>) -> Self {
            Self {
                reads,
                calls: AtomicUsize::new(0),
                fail_clear: false,
            }
        }
    }

    impl ClipboardBackend for ScriptedClipboard {
        fn read(&self) -> ShiftResult<String> {
            let idx = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reads.get(idx.min(self.reads.len() - 1)) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(_)) => Err(ShiftError::Clipboard("busy".to_string())),
                None => Ok(String::new()),
            }
        }

        fn write(&self, _text: &str, _exclude: bool) -> ShiftResult<()> {
            Ok(())
        }

        fn clear(&self) -> ShiftResult<()> {
            if self.fail_clear {
                Err(ShiftError::Clipboard("locked".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn bridge(backend: ScriptedClipboard) -> ClipboardBridge {
        ClipboardBridge::new(Arc::new(backend))
    }

    #[tokio::test]
    async fn test_capture_waits_for_fresh_value() {
        let bridge = bridge(ScriptedClipboard::new(vec![
            Ok(String::new()),
            Err(ShiftError::Clipboard("busy".to_string())),
            Ok("   ".to_string()),
            Ok("selected".to_string()),
        ]));

        let text = bridge
            .capture("", Duration::from_secs(1), Duration::from_millis(5))
            .await;
        assert_eq!(text, "selected");
    }

    #[tokio::test]
    async fn test_capture_ignores_stale_value() {
        let bridge = bridge(ScriptedClipboard::new(vec![Ok("old".to_string())]));

        let text = bridge
            .capture("old", Duration::from_millis(60), Duration::from_millis(10))
            .await;
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_capture_times_out_not_before() {
        let bridge = bridge(ScriptedClipboard::new(vec![Ok(String::new())]));
        let timeout = Duration::from_millis(120);

        let start = Instant::now();
        let text = bridge.capture("", timeout, Duration::from_millis(20)).await;
        assert!(text.is_empty());
        assert!(start.elapsed() >= timeout);
    }

    #[test]
    fn test_prepare_capture_falls_back_to_current_value() {
        let mut backend = ScriptedClipboard::new(vec![Ok("leftover".to_string())]);
        backend.fail_clear = true;
        let previous = tokio_test::block_on(bridge(backend).prepare_capture());
        assert_eq!(previous, "leftover");

        let backend = ScriptedClipboard::new(vec![Ok("leftover".to_string())]);
        assert_eq!(tokio_test::block_on(bridge(backend).prepare_capture()), "");
    }

    #[test]
    fn test_write_error_surfaces() {
        struct ReadOnly;

        impl ClipboardBackend for ReadOnly {
            fn read(&self) -> ShiftResult<String> {
                Ok(String::new())
            }

            fn write(&self, _text: &str, _exclude: bool) -> ShiftResult<()> {
                Err(ShiftError::Clipboard("read-only".to_string()))
            }
        }

        let bridge = ClipboardBridge::new(Arc::new(ReadOnly));
        let err = tokio_test::block_on(bridge.write("hello")).unwrap_err();
        assert!(err.to_string().contains("read-only"));
        // The default clear writes the empty sentinel, so it fails the same way
        assert!(tokio_test::block_on(bridge.clear()).is_err());
    }
}
