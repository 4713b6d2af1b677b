//! File logging setup and process-wide panic capture.
//!
//! # Responsibility
//! - Start the rolling file logger exactly once per process.
//! - Route panics into the log with a flattened, size-capped payload.
//!
//! # Invariants
//! - Repeated `init_logging` calls with the same level and directory are
//!   no-ops; a conflicting call fails without touching the live logger.
//! - The log directory must be absolute so rotation never depends on the
//!   process working directory.

use std::path::{Path, PathBuf};

use flexi_logger::{detailed_format, Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use log::{error, info};
use once_cell::sync::OnceCell;

const LOG_BASENAME: &str = "workshop";
const LOG_ROTATE_BYTES: u64 = 10 * 1024 * 1024;
const LOG_KEEP_FILES: usize = 5;
const PANIC_PAYLOAD_MAX: usize = 160;

static LOGGING: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: String,
    log_dir: PathBuf,
    // Dropping the handle would stop the writer; the cell keeps it alive
    // for the process lifetime.
    _handle: LoggerHandle,
}

/// Default level when the caller does not choose one.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Starts rolling file logging under `log_dir` at `level`.
///
/// # Errors
/// Returns a message when the level is unknown, the directory is not
/// absolute or cannot be created, or logging was already initialized with a
/// different configuration.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = normalize_level(level)?;
    let log_dir = normalize_log_dir(log_dir)?;

    let state = LOGGING.get_or_try_init(|| start_logging(&level, &log_dir))?;
    if state.level != level || state.log_dir != log_dir {
        return Err(format!(
            "logging already initialized with level `{}` at `{}`",
            state.level,
            state.log_dir.display()
        ));
    }
    Ok(())
}

fn start_logging(level: &str, log_dir: &Path) -> Result<LoggingState, String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|err| format!("cannot create log dir `{}`: {err}", log_dir.display()))?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| format!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_BASENAME)
                .suppress_timestamp(),
        )
        .rotate(
            Criterion::Size(LOG_ROTATE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(LOG_KEEP_FILES),
        )
        .format(detailed_format)
        .start()
        .map_err(|err| format!("cannot start logging: {err}"))?;

    install_panic_hook();
    info!(
        "event=log_init module=core status=ok level={level} dir={}",
        log_dir.display()
    );

    Ok(LoggingState {
        level: level.to_string(),
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

fn normalize_level(level: &str) -> Result<String, String> {
    let lowered = level.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(lowered),
        _ => Err(format!("unsupported log level `{level}`")),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log dir cannot be empty".to_string());
    }
    let path = PathBuf::from(trimmed);
    if !path.is_absolute() {
        return Err(format!("log dir `{trimmed}` must be an absolute path"));
    }
    Ok(path)
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let raw = if let Some(text) = panic_info.payload().downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = panic_info.payload().downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };
        let payload = sanitize_panic_message(&raw);
        let location = panic_info
            .location()
            .map(|location| format!("{}:{}", location.file(), location.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!("event=panic module=core status=error location={location} payload={payload}");
        previous(panic_info);
    }));
}

/// Flattens newlines and caps the payload so one panic stays one log line.
fn sanitize_panic_message(message: &str) -> String {
    let flat = message.replace(['\n', '\r'], " ");
    if flat.chars().count() <= PANIC_PAYLOAD_MAX {
        return flat;
    }
    let mut capped: String = flat.chars().take(PANIC_PAYLOAD_MAX).collect();
    capped.push_str("...");
    capped
}
