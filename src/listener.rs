//! Input Listener
//!
//! Reads raw key events from every physical keyboard (evdev) and recognizes
//! the configured chord.
//!
//! Each device gets its own reader thread that only forwards key deltas over
//! a channel. A single [`Dispatcher`] task owns the pressed-key set, does the
//! chord matching and asks the [`SessionGuard`] before starting a run, so
//! device reading never waits on a translation.

use crate::error::{ShiftError, ShiftResult};
use crate::hotkey::{ChordTracker, KeyState};
use crate::input::{digit_keys, letter_keys, VIRTUAL_KEYBOARD_NAME};
use crate::pipeline::TriggerHandler;
use crate::session::SessionGuard;
use evdev::{AttributeSetRef, Device, InputEventKind, Key};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Capacity of the key-delta channel between readers and the dispatcher
pub const CHANNEL_CAPACITY: usize = 256;

/// One key state change read from a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDelta {
    pub device: String,
    pub key: Key,
    pub state: KeyState,
}

/// A keyboard that passed discovery
pub struct Keyboard {
    pub path: PathBuf,
    pub name: String,
    pub identity: String,
    pub device: Device,
}

/// Full alphabet, all digits and space: anything less is a mouse, a power
/// button, a media remote...
pub fn is_keyboard(keys: &AttributeSetRef<Key>) -> bool {
    letter_keys()
        .iter()
        .chain(digit_keys())
        .all(|key| keys.contains(*key))
        && keys.contains(Key::KEY_SPACE)
}

/// Identity of the physical device behind an event node.
///
/// One keyboard often exposes several nodes whose `phys` differ only in the
/// trailing `/inputN`. Nodes without `phys` are never merged.
pub fn physical_identity(phys: Option<&str>, vendor: u16, product: u16, path: &Path) -> String {
    match phys.map(str::trim).filter(|p| !p.is_empty()) {
        Some(phys) => {
            let base = match phys.rsplit_once('/') {
                Some((base, last))
                    if last.len() > 5
                        && last.starts_with("input")
                        && last[5..].chars().all(|c| c.is_ascii_digit()) =>
                {
                    base
                }
                _ => phys,
            };
            format!("{}:{:04x}:{:04x}", base, vendor, product)
        }
        None => path.display().to_string(),
    }
}

/// Enumerate keyboards, skipping our own virtual keyboard and duplicate
/// nodes of the same physical device.
pub fn discover_keyboards() -> ShiftResult<Vec<Keyboard>> {
    let mut candidates: Vec<(PathBuf, Device)> = evdev::enumerate().collect();
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let mut seen = HashSet::new();
    let mut keyboards = Vec::new();

    for (path, device) in candidates {
        let name = device.name().unwrap_or("unknown").to_string();
        if name == VIRTUAL_KEYBOARD_NAME {
            debug!("Skipping own virtual keyboard {:?}", path);
            continue;
        }
        if !device.supported_keys().is_some_and(is_keyboard) {
            continue;
        }

        let id = device.input_id();
        let identity = physical_identity(device.physical_path(), id.vendor(), id.product(), &path);
        if !seen.insert(identity.clone()) {
            debug!("Skipping {:?} ({}): same physical keyboard as an earlier node", path, name);
            continue;
        }

        debug!("⌨️ Found keyboard: {} at {:?}", name, path);
        keyboards.push(Keyboard {
            path,
            name,
            identity,
            device,
        });
    }

    if keyboards.is_empty() {
        return Err(ShiftError::NoKeyboards);
    }
    Ok(keyboards)
}

/// Start a reader thread for one keyboard. A read error stops this device
/// only; the thread also ends once the dispatcher is gone.
pub fn spawn_monitor(
    keyboard: Keyboard,
    tx: mpsc::Sender<KeyDelta>,
) -> ShiftResult<thread::JoinHandle<()>> {
    let Keyboard {
        path,
        name,
        mut device,
        ..
    } = keyboard;

    let handle = thread::Builder::new()
        .name(format!("kbd-{}", path.display()))
        .spawn(move || {
            debug!("👂 Monitoring {} ({:?})", name, path);
            loop {
                let events = match device.fetch_events() {
                    Ok(events) => events,
                    Err(e) => {
                        warn!("⚠️ Device {} stopped: {}", name, e);
                        return;
                    }
                };
                for event in events {
                    let InputEventKind::Key(key) = event.kind() else {
                        continue;
                    };
                    let Some(state) = KeyState::from_value(event.value()) else {
                        continue;
                    };
                    let delta = KeyDelta {
                        device: name.clone(),
                        key,
                        state,
                    };
                    if tx.blocking_send(delta).is_err() {
                        debug!("Dispatcher gone, stopping {}", name);
                        return;
                    }
                }
            }
        })?;
    Ok(handle)
}

/// Spawn a monitor per keyboard; returns how many are running
pub fn start_monitors(keyboards: Vec<Keyboard>, tx: &mpsc::Sender<KeyDelta>) -> usize {
    let mut started = 0;
    for keyboard in keyboards {
        let name = keyboard.name.clone();
        match spawn_monitor(keyboard, tx.clone()) {
            Ok(_) => started += 1,
            Err(e) => error!("Could not start monitor for {}: {}", name, e),
        }
    }
    started
}

/// Owns the chord state; turns key deltas into guarded trigger runs
pub struct Dispatcher {
    tracker: ChordTracker,
    guard: Arc<SessionGuard>,
    handler: Arc<dyn TriggerHandler>,
}

impl Dispatcher {
    pub fn new(
        tracker: ChordTracker,
        guard: Arc<SessionGuard>,
        handler: Arc<dyn TriggerHandler>,
    ) -> Self {
        Self {
            tracker,
            guard,
            handler,
        }
    }

    /// Process deltas until every sender is dropped, then wait for the run
    /// still in flight.
    pub async fn run(mut self, mut rx: mpsc::Receiver<KeyDelta>) {
        let mut runs = JoinSet::new();

        while let Some(delta) = rx.recv().await {
            while let Some(finished) = runs.try_join_next() {
                Self::reap(finished);
            }

            if !self.tracker.handle(delta.key, delta.state) {
                continue;
            }
            let Some(session) = self.guard.try_acquire() else {
                continue;
            };

            info!("🔥 Hotkey {} detected on {}", self.tracker.hotkey(), delta.device);
            self.tracker.reset();

            let handler = Arc::clone(&self.handler);
            runs.spawn(async move {
                // Held for the whole run; dropping it releases the guard
                let _session = session;
                handler.on_trigger().await;
            });
        }

        while let Some(finished) = runs.join_next().await {
            Self::reap(finished);
        }
    }

    fn reap(result: Result<(), tokio::task::JoinError>) {
        if let Err(e) = result {
            error!("Pipeline run aborted: {}", e);
        }
    }
}
