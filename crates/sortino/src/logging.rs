use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log files larger than this are trimmed when logging starts
pub const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Bytes of recent history kept by a trim
pub const KEEP_LOG_SIZE: u64 = 1024 * 1024;

const TRIM_MARKER: &str = "--- earlier sortino log entries trimmed ---\n";

/// Cut `path` down to roughly its last `keep` bytes once it exceeds `max`.
///
/// The kept tail starts at a line boundary. Returns whether the file was
/// trimmed; a missing file is not an error.
pub(crate) fn trim_log_file(path: &Path, max: u64, keep: u64) -> io::Result<bool> {
    let len = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if len <= max {
        return Ok(false);
    }

    let content = fs::read(path)?;
    let cut = content.len().saturating_sub(keep as usize);
    let tail = &content[cut..];
    let tail = match tail.iter().position(|&b| b == b'\n') {
        Some(newline) if cut > 0 => &tail[newline + 1..],
        _ => tail,
    };

    let mut trimmed = Vec::with_capacity(TRIM_MARKER.len() + tail.len());
    trimmed.extend_from_slice(TRIM_MARKER.as_bytes());
    trimmed.extend_from_slice(tail);
    fs::write(path, trimmed)?;
    Ok(true)
}

/// Initialize logging.
///
/// Without `log_file`, logs go to stderr so they never mix with the report on
/// stdout. With `log_file`, they are appended to that file, which is trimmed
/// to its last 1MB once it grows past 5MB. `RUST_LOG` takes precedence over
/// `level`.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> color_eyre::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sortino={level},sortino_core=warn")));

    let mut trim_error = None;
    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            trim_error = trim_log_file(path, MAX_LOG_SIZE, KEEP_LOG_SIZE).err();

            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true),
            )
        }
        None => None,
    };
    let stderr_layer = log_file
        .is_none()
        .then(|| fmt::layer().with_writer(io::stderr).with_target(false));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    if let Some(e) = trim_error {
        tracing::warn!(error = %e, "Could not trim log file");
    }
    match log_file {
        Some(path) => tracing::debug!(path = %path.display(), "Logging to file"),
        None => tracing::debug!("Logging to stderr"),
    }
    Ok(())
}
