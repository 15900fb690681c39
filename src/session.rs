//! Session Guard
//!
//! At most one pipeline run in flight, a minimum interval between accepted
//! triggers, and one daemon per user.

use crate::error::{ShiftError, ShiftResult};
use std::fs::{File, OpenOptions, TryLockError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct GuardState {
    busy: bool,
    last_trigger: Option<Instant>,
}

/// Busy flag + trigger cooldown, shared by every device reader
#[derive(Debug)]
pub struct SessionGuard {
    state: Mutex<GuardState>,
    cooldown: Duration,
}

impl SessionGuard {
    pub fn new(cooldown: Duration) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(GuardState::default()),
            cooldown,
        })
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Start a session if none is active and the cooldown has passed.
    /// Dropping the returned [`TriggerSession`] releases the guard.
    pub fn try_acquire(self: &Arc<Self>) -> Option<TriggerSession> {
        self.try_acquire_at(Instant::now())
    }

    /// [`try_acquire`](Self::try_acquire) with an explicit clock reading
    pub fn try_acquire_at(self: &Arc<Self>, now: Instant) -> Option<TriggerSession> {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };

        if state.busy {
            debug!("Trigger dropped: a run is in progress");
            return None;
        }
        if let Some(last) = state.last_trigger {
            if now.saturating_duration_since(last) < self.cooldown {
                debug!("Trigger dropped: within cooldown");
                return None;
            }
        }

        state.busy = true;
        state.last_trigger = Some(now);
        Some(TriggerSession {
            guard: Arc::clone(self),
        })
    }

    pub fn release(&self) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.state.lock().map(|state| state.busy).unwrap_or(true)
    }
}

/// One accepted trigger; releases the guard on drop, including on error
/// paths and panics inside the run.
#[derive(Debug)]
pub struct TriggerSession {
    guard: Arc<SessionGuard>,
}

impl Drop for TriggerSession {
    fn drop(&mut self) {
        self.guard.release();
    }
}

/// Exclusive advisory lock marking the running daemon
#[derive(Debug)]
pub struct InstanceLock {
    _file: File,
    path: PathBuf,
}

impl InstanceLock {
    /// Take the lock without blocking; [`ShiftError::AlreadyRunning`] if held
    pub fn acquire(path: &Path) -> ShiftResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;

        match file.try_lock() {
            Ok(()) => {
                debug!("🔒 Instance lock held at {:?}", path);
                Ok(Self {
                    _file: file,
                    path: path.to_path_buf(),
                })
            }
            Err(TryLockError::WouldBlock) => Err(ShiftError::AlreadyRunning(path.to_path_buf())),
            Err(TryLockError::Error(e)) => {
                warn!("Could not lock {:?}: {}", path, e);
                Err(ShiftError::Io(e))
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Lock file location: the runtime dir if there is one, else /tmp per user
pub fn lock_path() -> PathBuf {
    match dirs::runtime_dir() {
        Some(dir) => dir.join("shiftlang.lock"),
        None => {
            let user = std::env::var("USER").unwrap_or_else(|_| "shiftlang".to_string());
            PathBuf::from(format!("/tmp/shiftlang-{}.lock", user))
        }
    }
}
