//! OS signal handling for the kiosk loop.
//!
//! SIGTERM, SIGINT and SIGHUP only raise a flag; the event loop polls it
//! between key events, so shutdown goes through the same serialized path as
//! every other state change.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::consts::{SIGINT, SIGTERM};

/// Shutdown flag shared between signal handlers and the event loop.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    flag: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Create the flag and register OS hooks. Registration failures are
    /// reported on stderr and otherwise ignored.
    #[must_use]
    pub fn register() -> Self {
        let signal = Self::unregistered();
        for (name, sig) in [("SIGTERM", SIGTERM), ("SIGINT", SIGINT)] {
            if let Err(e) = signal_hook::flag::register(sig, Arc::clone(&signal.flag)) {
                eprintln!("[ACU-SIGNAL] failed to register {name}: {e}");
            }
        }
        #[cfg(unix)]
        {
            use signal_hook::consts::SIGHUP;
            if let Err(e) = signal_hook::flag::register(SIGHUP, Arc::clone(&signal.flag)) {
                eprintln!("[ACU-SIGNAL] failed to register SIGHUP: {e}");
            }
        }
        signal
    }

    /// A flag no OS signal can reach (tests, embedding).
    #[must_use]
    pub fn unregistered() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub fn request(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}
