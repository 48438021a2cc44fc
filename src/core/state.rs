//! Process-level session state for serve mode.
//!
//! Two pieces of state cross thread boundaries:
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C / SIGTERM received)
//! - `SESSION`: The active preview session (staging path + wake-up channel)
//!
//! Everything else about a session lives in its `MirrorSynchronizer`.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

/// Shutdown has been requested
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Registered preview session, taken by the signal handler
static SESSION: Mutex<Option<SessionHandle>> = Mutex::new(None);

/// What the signal handler needs to end a preview session.
struct SessionHandle {
    staging: PathBuf,
    shutdown_tx: UnboundedSender<()>,
}

/// Setup the global Ctrl+C / SIGTERM handler. Call once at program start
///
/// The handler behavior depends on whether a session has been registered:
/// - No session: exit immediately, there is nothing to clean up
/// - Session: remove the staging directory synchronously, then wake the
///   serve loop so it can finish its own (idempotent) teardown
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        let Some(session) = SESSION.lock().take() else {
            std::process::exit(0);
        };

        crate::log!("serve"; "shutting down...");
        crate::mirror::remove_staging(&session.staging);
        let _ = session.shutdown_tx.send(());
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the active session for signal-driven teardown
pub fn register_session(staging: PathBuf, shutdown_tx: UnboundedSender<()>) {
    *SESSION.lock() = Some(SessionHandle {
        staging,
        shutdown_tx,
    });
}

/// Forget the active session (normal exit path)
pub fn clear_session() {
    SESSION.lock().take();
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
