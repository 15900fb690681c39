//! Capture → translate → replace pipeline
//!
//! One run per accepted trigger, strictly sequential:
//! clear clipboard, inject copy, capture, resolve direction, translate,
//! write clipboard, inject paste, optionally clear again.

use crate::clipboard::ClipboardBridge;
use crate::config::{Config, Timing};
use crate::direction::{Direction, DirectionResolver};
use crate::input::KeyInjector;
use crate::translate::router::TranslationRouter;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn};

/// What a single run ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The clipboard never received a fresh value after the copy chord
    NoSelection,
    /// Text was replaced (`changed == false` means the original went back)
    Translated {
        direction: Direction,
        provider: Option<String>,
        changed: bool,
    },
    ClipboardFailed(String),
    InjectionFailed(String),
}

/// Something to run when the hotkey fires
#[async_trait]
pub trait TriggerHandler: Send + Sync {
    async fn on_trigger(&self);
}

pub struct Pipeline {
    clipboard: ClipboardBridge,
    injector: Arc<Mutex<Box<dyn KeyInjector>>>,
    router: TranslationRouter,
    resolver: DirectionResolver,
    timing: Timing,
    clear_after_paste: bool,
}

impl Pipeline {
    pub fn new(
        clipboard: ClipboardBridge,
        injector: Box<dyn KeyInjector>,
        router: TranslationRouter,
        config: &Config,
    ) -> Self {
        Self {
            clipboard,
            injector: Arc::new(Mutex::new(injector)),
            resolver: DirectionResolver::new(&config.source_language),
            router,
            timing: config.timing,
            clear_after_paste: config.clear_clipboard_after_paste,
        }
    }

    /// Send the copy or paste chord. The injector sleeps between key
    /// events, so it runs on the blocking pool.
    async fn inject(&self, copy: bool) -> Result<(), String> {
        let injector = Arc::clone(&self.injector);
        let task = tokio::task::spawn_blocking(move || {
            let mut injector = injector.lock().map_err(|e| e.to_string())?;
            let result = if copy {
                injector.copy()
            } else {
                injector.paste()
            };
            result.map_err(|e| e.to_string())
        });
        task.await.map_err(|e| e.to_string())?
    }

    /// Execute one full run. Never panics on runtime failures; every problem
    /// ends the run with an outcome and a log line.
    pub async fn run(&self) -> PipelineOutcome {
        let started = Instant::now();

        // Let the user release the chord so it does not combine with Ctrl+C
        tokio::time::sleep(self.timing.release_delay()).await;

        let previous = self.clipboard.prepare_capture().await;
        if let Err(e) = self.inject(true).await {
            warn!("❌ Copy injection failed: {}", e);
            return PipelineOutcome::InjectionFailed(e);
        }
        tokio::time::sleep(self.timing.copy_settle()).await;

        let selected = self
            .clipboard
            .capture(
                &previous,
                self.timing.capture_timeout(),
                self.timing.capture_poll(),
            )
            .await;
        if selected.is_empty() {
            info!("No text selected (clipboard unchanged), skipping");
            return PipelineOutcome::NoSelection;
        }
        debug!("Selected: {:?}", selected);

        let direction = self.resolver.resolve(&selected);
        info!("🔁 Translating {} chars ({:?})", selected.chars().count(), direction);

        let translation = self.router.route(&selected, direction).await;
        let changed = translation.changed(&selected);
        debug!("Translated: {:?}", translation.text);

        if let Err(e) = self.clipboard.write(&translation.text).await {
            warn!("❌ Could not write translation to clipboard: {}", e);
            return PipelineOutcome::ClipboardFailed(e.to_string());
        }
        tokio::time::sleep(self.timing.paste_delay()).await;

        if let Err(e) = self.inject(false).await {
            warn!("❌ Paste injection failed: {}", e);
            return PipelineOutcome::InjectionFailed(e);
        }

        if self.clear_after_paste {
            tokio::time::sleep(self.timing.clear_delay()).await;
            if let Err(e) = self.clipboard.clear().await {
                warn!("Could not clear clipboard after paste: {}", e);
            }
        }

        if changed {
            info!(
                "✅ Replaced selection via {} in {:?}",
                translation.provider.as_deref().unwrap_or("?"),
                started.elapsed()
            );
        } else {
            warn!("⚠️ Translation failed, original text pasted back");
        }

        PipelineOutcome::Translated {
            direction,
            provider: translation.provider,
            changed,
        }
    }
}

#[async_trait]
impl TriggerHandler for Pipeline {
    async fn on_trigger(&self) {
        let outcome = self.run().await;
        debug!("Pipeline outcome: {:?}", outcome);
    }
}
