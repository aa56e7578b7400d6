//! Opt-in diagnostics.
//!
//! The launched command owns the terminal, so nothing is logged unless
//! `AI_CLAUDE_LOG` names a file. Verbosity follows `RUST_LOG`.

use std::path::{Path, PathBuf};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable naming the log file path.
pub const LOG_PATH_ENV: &str = "AI_CLAUDE_LOG";

const DEFAULT_FILTER: &str = "ai_claude_start=info";

/// Per-invocation log file next to `base`: `{base}.{unix_secs}.{pid}`.
///
/// Launches nest (a profile can launch a shell that launches another
/// profile), so every process writes its own file.
pub fn log_file_path(base: &Path, unix_secs: u64, pid: u32) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!(".{}.{}", unix_secs, pid));
    PathBuf::from(name)
}

/// Install the file subscriber when `AI_CLAUDE_LOG` is set.
///
/// Failures to open the file are reported on stderr and leave logging
/// off; they never stop the launch.
pub fn init_tracing() {
    let Some(base) = std::env::var_os(LOG_PATH_ENV).filter(|p| !p.is_empty()) else {
        return;
    };

    let unix_secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let path = log_file_path(Path::new(&base), unix_secs, std::process::id());

    let file = match std::fs::File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {}", path.display(), e);
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_timer(fmt::time::UtcTime::rfc_3339()),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Logging started");
}
