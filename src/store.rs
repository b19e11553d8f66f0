//! Lock-guarded home of the shared [`LampConfig`].
//!
//! Built on `critical-section` so the same store works across threads,
//! embassy tasks, or a second core. The critical section is the sole arbiter
//! of access: every read and every write, including the render pass and the
//! `dump` snapshot, goes through [`ConfigStore::with_lock`].

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::LampConfig;

/// Shared configuration store.
///
/// One instance exists for the process lifetime, shared by reference between
/// the command interpreter and the animation loop. The lock is held only for
/// the in-memory closure body, never across I/O or a blocking wait. A
/// multi-field update performed inside one `with_lock` call is observed by
/// concurrent readers as fully old or fully new, never mixed.
pub struct ConfigStore {
    inner: Mutex<RefCell<LampConfig>>,
}

impl ConfigStore {
    /// Create a store owning the given configuration.
    pub fn new(config: LampConfig) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(config)),
        }
    }

    /// Run `f` with exclusive access to the configuration.
    ///
    /// The lock is released on every exit path, including an early return
    /// from inside `f`.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut LampConfig) -> R) -> R {
        critical_section::with(|cs| {
            let mut config = self.inner.borrow(cs).borrow_mut();
            f(&mut config)
        })
    }

    /// Clone the current configuration for read-only use outside the lock.
    pub fn snapshot(&self) -> LampConfig {
        self.with_lock(|config| config.clone())
    }

    /// Record the daylight gate's verdict.
    ///
    /// The only field the gate owns; the command interpreter never writes it.
    pub fn set_lamp_on(&self, on: bool) {
        self.with_lock(|config| config.lamp_on = on);
    }
}
