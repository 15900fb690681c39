//! ShiftLang - translate selected text in place
//!
//! Select text, press the hotkey, get the translation pasted over it.

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use shiftlang::clipboard::{ClipboardBridge, SystemClipboard};
use shiftlang::config::{config_path, default_hotkey, Config, Preferences};
use shiftlang::diagnostics::{self, Report};
use shiftlang::direction::DirectionResolver;
use shiftlang::hotkey::{ChordTracker, Hotkey};
use shiftlang::input::VirtualKeyboard;
use shiftlang::listener::{self, Dispatcher, Keyboard, CHANNEL_CAPACITY};
use shiftlang::pipeline::{Pipeline, TriggerHandler};
use shiftlang::session::{self, InstanceLock, SessionGuard};
use shiftlang::translate::{self, LanguagePair, ProviderKind};
use shiftlang::{ShiftError, ShiftResult};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to $SHIFTLANG_CONFIG or the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Listen for the hotkey and translate selections (default)
    Run,
    /// List detected keyboards
    Devices,
    /// Only log hotkey detections
    CheckHotkey,
    /// Translate one string with the configured providers
    Translate { text: String },
    /// Check keyboards, clipboard and provider
    Diagnose,
    /// Write the config file with the given preferences
    Init {
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        target: Option<String>,
        #[arg(long)]
        hotkey: Option<String>,
        /// google or openrouter
        #[arg(long)]
        provider: Option<String>,
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(verbose: bool, level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { level };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    });
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn resolve_hotkey(config: &Config) -> ShiftResult<Hotkey> {
    match Hotkey::parse(&config.hotkey) {
        Ok(hotkey) => Ok(hotkey),
        Err(e) => {
            warn!("⚠️ {}; using default '{}'", e, default_hotkey());
            Hotkey::parse(default_hotkey())
        }
    }
}

/// Logs detections without touching the clipboard
struct HotkeyLogger {
    hotkey: String,
}

#[async_trait]
impl TriggerHandler for HotkeyLogger {
    async fn on_trigger(&self) {
        info!("🎯 Hotkey detected: {}", self.hotkey);
    }
}

/// Start the readers and dispatch until Ctrl+C
async fn listen(
    keyboards: Vec<Keyboard>,
    hotkey: Hotkey,
    guard: Arc<SessionGuard>,
    handler: Arc<dyn TriggerHandler>,
) -> ShiftResult<()> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let started = listener::start_monitors(keyboards, &tx);
    drop(tx);
    if started == 0 {
        return Err(ShiftError::NoKeyboards);
    }

    info!("Press {} to translate selected text, Ctrl+C to exit", hotkey);
    let dispatcher = Dispatcher::new(ChordTracker::new(hotkey), guard, handler);

    tokio::select! {
        _ = dispatcher.run(rx) => {
            Err(ShiftError::Device("all keyboard monitors stopped".to_string()))
        }
        _ = tokio::signal::ctrl_c() => {
            info!("👋 Goodbye!");
            Ok(())
        }
    }
}

async fn run_daemon(config: Config) -> ShiftResult<()> {
    let lock = InstanceLock::acquire(&session::lock_path())?;
    config.validate()?;
    let hotkey = resolve_hotkey(&config)?;

    let keyboards = listener::discover_keyboards()?;
    let virtual_keyboard = VirtualKeyboard::new()?;
    let clipboard = ClipboardBridge::new(Arc::new(SystemClipboard::new()?));
    let router = translate::build_router(&config)?;

    info!("🌐 ShiftLang v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        "   Translation: {} ↔ {} via {}{}",
        config.source_language,
        config.target_language,
        router.primary_name(),
        if router.has_fallback() { " (fallback: google)" } else { "" }
    );
    info!("   Hotkey: {}", hotkey);
    info!("   Keyboards: {}", keyboards.len());
    info!("   Lock: {:?}", lock.path());
    if config.auto_start {
        info!("   Autostart is enabled");
    }

    let pipeline = Pipeline::new(clipboard, Box::new(virtual_keyboard), router, &config);
    let guard = SessionGuard::new(config.timing.cooldown());
    debug!("   Cooldown: {:?}", guard.cooldown());
    listen(keyboards, hotkey, guard, Arc::new(pipeline)).await
}

fn list_devices() -> ShiftResult<()> {
    let keyboards = listener::discover_keyboards()?;
    println!("Keyboards ({}):", keyboards.len());
    for keyboard in &keyboards {
        println!(
            "  {}  {}  [{}]",
            keyboard.path.display(),
            keyboard.name,
            keyboard.identity
        );
    }
    Ok(())
}

async fn check_hotkey(config: Config) -> ShiftResult<()> {
    let hotkey = resolve_hotkey(&config)?;
    let keyboards = listener::discover_keyboards()?;
    let logger = HotkeyLogger {
        hotkey: hotkey.to_string(),
    };
    let guard = SessionGuard::new(config.timing.cooldown());
    listen(keyboards, hotkey, guard, Arc::new(logger)).await
}

async fn translate_once(config: Config, text: &str) -> ShiftResult<()> {
    config.validate()?;
    let router = translate::build_router(&config)?;
    let direction = DirectionResolver::new(&config.source_language).resolve(text);
    let translation = router.route(text, direction).await;
    info!(
        "{:?} via {}",
        direction,
        translation.provider.as_deref().unwrap_or("none")
    );
    println!("{}", translation.text);
    Ok(())
}

fn init_config(config: Config, path: &Path, prefs: Preferences) -> ShiftResult<()> {
    if path.exists() && !prefs.force {
        return Err(ShiftError::Config(format!(
            "{} already exists (use --force to replace it)",
            path.display()
        )));
    }
    let config = config.with_preferences(prefs)?;
    config.save_to(path)?;
    println!("Preferences saved to {}", path.display());
    Ok(())
}

async fn diagnose(config: Config) -> ShiftResult<bool> {
    let mut report = Report::default();

    diagnostics::check_keyboards(&mut report, &listener::discover_keyboards());

    match SystemClipboard::new() {
        Ok(clipboard) => {
            let bridge = ClipboardBridge::new(Arc::new(clipboard));
            diagnostics::check_clipboard(&mut report, &bridge).await
        }
        Err(e) => report.push("clipboard", false, e.to_string()),
    }

    let kind = ProviderKind::from_config(&config);
    diagnostics::check_api_key(&mut report, kind, &config);
    match translate::create_translator(kind, &config) {
        Ok(translator) => {
            let pair = LanguagePair::from_config(&config);
            diagnostics::check_provider(&mut report, &translator, &pair).await
        }
        Err(e) => report.push("provider", false, e.to_string()),
    }

    print!("{}", report);
    Ok(report.all_passed())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config_file = args.config.clone().unwrap_or_else(config_path);
    let (config, load_warning) = Config::load_reporting(&config_file);
    init_logging(args.verbose, &config.log_level);
    if let Some(warning) = load_warning {
        warn!("⚠️ {}", warning);
    }

    let result = match args.command.unwrap_or(Command::Run) {
        Command::Run => run_daemon(config).await,
        Command::Devices => list_devices(),
        Command::CheckHotkey => check_hotkey(config).await,
        Command::Translate { text } => translate_once(config, &text).await,
        Command::Init {
            source,
            target,
            hotkey,
            provider,
            force,
        } => {
            let prefs = Preferences {
                source,
                target,
                hotkey,
                provider,
                force,
            };
            init_config(config, &config_file, prefs)
        }
        Command::Diagnose => match diagnose(config).await {
            Ok(true) => Ok(()),
            Ok(false) => return ExitCode::FAILURE,
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(ShiftError::AlreadyRunning(path)) => {
            println!("ShiftLang is already running (lock: {})", path.display());
            ExitCode::SUCCESS
        }
        Err(ShiftError::NoKeyboards) => {
            error!("❌ No keyboard devices found");
            eprintln!("Make sure you're in the 'input' group:");
            eprintln!("  sudo usermod -a -G input $USER");
            eprintln!("Then log out and log back in.");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("❌ {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
