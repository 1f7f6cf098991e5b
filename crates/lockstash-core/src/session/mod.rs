//! Session-scoped handling of the plaintext master password.
//!
//! A [`Session`] is an explicit context object owned by whoever drives the
//! vault - there is no process-wide singleton. It holds the master password
//! between a successful login and a lock, and hands it out only through
//! scoped access so no long-lived plaintext copies escape.

pub mod biometric;

use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Errors raised by session access.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// No master password is held - the session was never unlocked, was
    /// explicitly locked, or idled past its auto-lock deadline. Any operation
    /// that needs to decrypt must force re-authentication.
    #[error("session expired - re-authentication required")]
    Expired,
}

struct Unlocked {
    password: SecretString,
    last_used: Instant,
}

/// Holder for the master password of one authenticated session.
///
/// The password lives in a [`SecretString`], so the buffer is zeroized when it
/// is replaced or dropped and is redacted from `Debug` output. `unlock`,
/// `with_password` and `lock` are individually atomic with respect to each
/// other; a reader never observes a half-cleared value.
///
/// At most one value is live per session: unlocking again replaces (and
/// zeroizes) the previous password. Nothing here is ever persisted.
pub struct Session {
    state: Mutex<Option<Unlocked>>,
    auto_lock_after: Option<Duration>,
}

impl Session {
    /// Create a locked session with no idle timeout.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
            auto_lock_after: None,
        }
    }

    /// Create a locked session that expires after `idle` without access.
    ///
    /// Mirrors clearing the password when the app sits in the background past
    /// a deadline. Expiry is checked on access; an expired value is cleared
    /// the first time anything touches the session afterwards.
    pub fn with_auto_lock(idle: Duration) -> Self {
        Self {
            state: Mutex::new(None),
            auto_lock_after: Some(idle),
        }
    }

    /// Store the master password for this session.
    ///
    /// Any previously held password is zeroized before being replaced.
    pub fn unlock(&self, password: &str) {
        let mut state = self.lock_state();
        *state = Some(Unlocked {
            password: SecretString::from(password.to_owned()),
            last_used: Instant::now(),
        });
    }

    /// Run `f` with scoped access to the session password.
    ///
    /// The plaintext is only visible inside the closure; callers must not copy
    /// it out into long-lived storage. Fails with [`SessionError::Expired`]
    /// when the session is locked or idled out.
    pub fn with_password<F, R>(&self, f: F) -> Result<R, SessionError>
    where
        F: FnOnce(&str) -> R,
    {
        let mut state = self.lock_state();

        if self.idle_expired(state.as_ref()) {
            *state = None;
            return Err(SessionError::Expired);
        }

        match state.as_mut() {
            Some(unlocked) => {
                unlocked.last_used = Instant::now();
                Ok(f(unlocked.password.expose_secret()))
            }
            None => Err(SessionError::Expired),
        }
    }

    /// Whether a live password is currently held.
    pub fn is_unlocked(&self) -> bool {
        let state = self.lock_state();
        state.is_some() && !self.idle_expired(state.as_ref())
    }

    /// Zeroize and drop the held password. Idempotent; call on logout and on
    /// teardown. Clearing is best-effort against OS-forced kills.
    pub fn lock(&self) {
        let mut state = self.lock_state();
        *state = None;
    }

    fn idle_expired(&self, state: Option<&Unlocked>) -> bool {
        match (state, self.auto_lock_after) {
            (Some(unlocked), Some(idle)) => unlocked.last_used.elapsed() > idle,
            _ => false,
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, Option<Unlocked>> {
        // A poisoned lock only guards a zeroizable buffer; keep serving it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("unlocked", &self.is_unlocked())
            .field("auto_lock_after", &self.auto_lock_after)
            .finish()
    }
}
