//! Ctrl+C handling.
//!
//! A single process-wide `ctrlc` hook sets a shared [`AtomicBool`]. The
//! walker, the hasher and the finder poll that flag and stop at the next
//! check; the binary then exits with code 130 and deletes nothing.
//!
//! ```rust,no_run
//! use dedupe::duplicates::FinderConfig;
//! use dedupe::signal::install_handler;
//!
//! let shutdown = install_handler().expect("signal handler");
//! let config = FinderConfig::default().with_shutdown_flag(shutdown.flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Handler with no shutdown requested and no signal hook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request shutdown as if Ctrl+C had been pressed.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clear a previous request.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// The flag to hand to pipeline stages.
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// The Ctrl+C hook could not be registered.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static INSTALLED: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the Ctrl+C hook, or reuse the one already installed.
///
/// The returned handler starts with the flag cleared. Calling this more
/// than once in a process (as the integration tests do through
/// `run_app`) returns the same flag.
///
/// # Errors
///
/// Returns `SignalError` if `ctrlc` refuses to register the hook for a
/// reason other than a hook already being present.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = INSTALLED.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.flag();

    let result = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let mut err = std::io::stderr();
        let _ = writeln!(err, "\nInterrupted, stopping...");
        let _ = err.flush();
        log::info!("Shutdown signal received");
    });

    match result {
        Ok(()) => {}
        Err(ctrlc::Error::MultipleHandlers) => {
            log::debug!("Ctrl+C hook already registered, using an unhooked flag");
        }
        Err(e) => return Err(SignalError::InstallFailed(e)),
    }

    // Another thread may have won the race; use whichever handler landed.
    let installed = INSTALLED.get_or_init(|| handler);
    installed.reset();
    Ok(installed.clone())
}
