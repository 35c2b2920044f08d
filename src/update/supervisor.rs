//! Background update check that never delays or fails the main operation
//!
//! The check runs on its own thread, started before the subcommand. The
//! thread is joined after the subcommand returns, and also on unwind through
//! [`UpdateTask`]'s `Drop`, so the process cannot exit while it is running.
//! Check errors and panics stop at this boundary; a panic in the check is
//! logged at debug instead of being printed by the default hook.

use std::panic;
use std::sync::Once;
use std::thread::{self, JoinHandle};

use crate::error::UpdateCheckError;

const THREAD_NAME: &str = "update-check";

static QUIET_PANIC_HOOK: Once = Once::new();

/// Route panics on the update thread to the log; other threads keep the previous hook
fn install_quiet_panic_hook() {
    QUIET_PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if thread::current().name() == Some(THREAD_NAME) {
                tracing::debug!(panic = %info, "update check panicked");
            } else {
                previous(info);
            }
        }));
    });
}

/// Work performed by the background update task
pub trait UpdateCheck: Send + 'static {
    fn check_for_updates(&self) -> Result<(), UpdateCheckError>;
}

/// Handle to the running update check
#[derive(Debug)]
pub struct UpdateTask {
    handle: Option<JoinHandle<()>>,
}

impl UpdateTask {
    /// Start `check` on a dedicated thread
    pub fn spawn<C: UpdateCheck>(check: C) -> Self {
        install_quiet_panic_hook();

        let spawned = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                if let Err(e) = check.check_for_updates() {
                    tracing::debug!(error = %e, "update check failed");
                }
            });

        match spawned {
            Ok(handle) => Self {
                handle: Some(handle),
            },
            Err(e) => {
                tracing::debug!(error = %e, "could not start update check thread");
                Self::idle()
            }
        }
    }

    /// A task with nothing to wait for
    pub fn idle() -> Self {
        Self { handle: None }
    }

    /// Block until the check has finished
    pub fn join(mut self) {
        self.wait();
    }

    fn wait(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::debug!("update check ended by panic");
            }
        }
    }
}

impl Drop for UpdateTask {
    fn drop(&mut self) {
        self.wait();
    }
}

/// Run `op` with the update check in the background.
///
/// The check is started before `op` and joined after it, whether `op`
/// returns an error or panics. The check's own outcome is never observed
/// by the caller.
pub fn run_with_update_check<C, T, F>(check: Option<C>, op: F) -> T
where
    C: UpdateCheck,
    F: FnOnce() -> T,
{
    let task = match check {
        Some(check) => UpdateTask::spawn(check),
        None => UpdateTask::idle(),
    };

    let outcome = op();
    task.join();
    outcome
}
