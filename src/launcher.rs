//! Child process launch.
//!
//! The child gets the terminal directly (inherited stdio) and exactly
//! the environment in [`LaunchParams`]. While it runs, terminal
//! interrupts are absorbed here so the launcher outlives the child and
//! can forward its exit status.

use std::process::{Command, ExitStatus};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use signal_hook::SigId;
use thiserror::Error;

use crate::args::LaunchParams;

/// Failure to start or wait for the child.
#[derive(Debug, Error)]
#[error("Failed to execute command '{command}': {source}")]
pub struct SpawnError {
    pub command: String,
    #[source]
    pub source: std::io::Error,
}

#[cfg(unix)]
const ABSORBED_SIGNALS: &[i32] = &[signal_hook::consts::SIGINT, signal_hook::consts::SIGQUIT];
#[cfg(not(unix))]
const ABSORBED_SIGNALS: &[i32] = &[signal_hook::consts::SIGINT];

/// Keeps terminal-generated signals from killing the launcher while the
/// child (same foreground group) handles them. Unregisters on drop.
struct SignalGuard {
    ids: Vec<SigId>,
}

impl SignalGuard {
    fn install() -> Self {
        let flag = Arc::new(AtomicBool::new(false));
        let ids = ABSORBED_SIGNALS
            .iter()
            .filter_map(|&signal| {
                signal_hook::flag::register(signal, Arc::clone(&flag))
                    .map_err(|e| tracing::warn!(signal, error = %e, "Failed to register signal handler"))
                    .ok()
            })
            .collect();
        Self { ids }
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

/// Spawn the command and wait for it. Returns the exit code to forward.
pub fn launch(params: &LaunchParams) -> Result<i32, SpawnError> {
    let spawn_err = |source| SpawnError {
        command: params.command.clone(),
        source,
    };

    let mut cmd = Command::new(&params.command);
    cmd.args(&params.args).env_clear().envs(&params.env);

    tracing::info!(command = %params.command, args = ?params.args, "Launching child process");

    let _signals = SignalGuard::install();
    let mut child = cmd.spawn().map_err(spawn_err)?;
    let status = child.wait().map_err(spawn_err)?;

    let code = exit_code(status);
    tracing::info!(code, "Child process exited");
    Ok(code)
}

/// Exit code to report for a finished child.
///
/// Signal deaths map to `128 + signal` on Unix, as shells report them.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
