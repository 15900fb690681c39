use crate::error::{ShiftError, ShiftResult};
use crate::hotkey::Hotkey;
use crate::language;
use crate::translate::ProviderKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "SHIFTLANG_CONFIG";

/// Platform default chord
pub fn default_hotkey() -> &'static str {
    if cfg!(target_os = "linux") {
        "alt+shift+g"
    } else if cfg!(target_os = "macos") {
        "cmd+shift+g"
    } else {
        "ctrl+shift+q"
    }
}

/// Values the `init` command writes over the loaded config
#[derive(Debug, Default)]
pub struct Preferences {
    pub source: Option<String>,
    pub target: Option<String>,
    pub hotkey: Option<String>,
    pub provider: Option<String>,
    pub force: bool,
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Trigger
    pub hotkey: String,
    /// Consumed by the installer; the daemon only reports it.
    pub auto_start: bool,

    // Languages
    pub source_language: String,
    pub target_language: String,

    // Provider
    pub translation_provider: String,
    pub openrouter_api_key: String,
    pub openrouter_model: String,

    // Clipboard
    pub clear_clipboard_after_paste: bool,

    // Meta
    pub log_level: String,

    pub timing: Timing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hotkey: default_hotkey().to_string(),
            auto_start: false,
            source_language: "hebrew".to_string(),
            target_language: "english".to_string(),
            translation_provider: "google".to_string(),
            openrouter_api_key: "".to_string(),
            openrouter_model: "openrouter/free".to_string(),
            clear_clipboard_after_paste: true,
            log_level: "info".to_string(),
            timing: Timing::default(),
        }
    }
}

/// Delays, poll intervals and timeouts of one pipeline run.
///
/// Kept in the config so tests (and slow desktops) can tune them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub capture_timeout_ms: u64,
    pub capture_poll_ms: u64,
    pub cooldown_ms: u64,
    pub provider_timeout_secs: u64,
    /// Wait for the user to let go of the chord before injecting Ctrl+C
    pub release_delay_ms: u64,
    pub copy_settle_ms: u64,
    pub paste_delay_ms: u64,
    pub clear_delay_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            capture_timeout_ms: 2000,
            capture_poll_ms: 100,
            cooldown_ms: 1500,
            provider_timeout_secs: 30,
            release_delay_ms: 200,
            copy_settle_ms: 50,
            paste_delay_ms: 300,
            clear_delay_ms: 500,
        }
    }
}

impl Timing {
    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }

    pub fn capture_poll(&self) -> Duration {
        Duration::from_millis(self.capture_poll_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn release_delay(&self) -> Duration {
        Duration::from_millis(self.release_delay_ms)
    }

    pub fn copy_settle(&self) -> Duration {
        Duration::from_millis(self.copy_settle_ms)
    }

    pub fn paste_delay(&self) -> Duration {
        Duration::from_millis(self.paste_delay_ms)
    }

    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }
}

impl Config {
    /// Load config from `path`, falling back to defaults.
    ///
    /// Never fails: a missing file means defaults, a corrupt one is moved
    /// aside to `config.json.corrupt` and defaults are used. The warning is
    /// handed back because this runs before logging is set up.
    pub fn load_reporting(path: &Path) -> (Self, Option<String>) {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return (Self::default(), None);
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                let warning = format!("Could not read config {:?}, using defaults: {}", path, e);
                return (Self::default(), Some(warning));
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => (config, None),
            Err(e) => {
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                let warning = format!(
                    "Config file corrupted or invalid, using defaults (moved to {:?}): {}",
                    backup_path, e
                );
                (Self::default(), Some(warning))
            }
        }
    }

    /// Apply preferences given on the command line, rejecting chords and
    /// providers that would not load back
    pub fn with_preferences(mut self, prefs: Preferences) -> ShiftResult<Self> {
        if let Some(source) = prefs.source {
            self.source_language = source;
        }
        if let Some(target) = prefs.target {
            self.target_language = target;
        }
        if let Some(hotkey) = prefs.hotkey {
            Hotkey::parse(&hotkey)?;
            self.hotkey = hotkey;
        }
        if let Some(provider) = prefs.provider {
            if ProviderKind::from_name(&provider).is_none() {
                return Err(ShiftError::Config(format!("unknown provider '{}'", provider)));
            }
            self.translation_provider = provider;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn save_to(&self, path: &Path) -> ShiftResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check invariants that defaults cannot repair
    pub fn validate(&self) -> ShiftResult<()> {
        if self.source_language.trim().is_empty() || self.target_language.trim().is_empty() {
            return Err(ShiftError::Config(
                "source_language and target_language must be set".to_string(),
            ));
        }

        if language::canonical_name(&self.source_language)
            == language::canonical_name(&self.target_language)
        {
            return Err(ShiftError::Config(format!(
                "source_language and target_language are both '{}'",
                self.source_language
            )));
        }

        Ok(())
    }
}

/// Config location: `$SHIFTLANG_CONFIG`, else `<config dir>/shiftlang/config.json`
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shiftlang")
        .join("config.json")
}
