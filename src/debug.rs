//! Unified logging for fontbook.
//!
//! Installs a `log::Log` implementation that routes every `log::info!()` etc.
//! from fontbook and its crates to `fontbook_debug.log` in the temp directory
//! (`/tmp/fontbook_debug.log` on most Unix systems). When `RUST_LOG` is set,
//! records are also mirrored to stderr.
//!
//! Level precedence: `--log-level` flag, then `RUST_LOG`, then the config
//! file's `log_level` (applied after the config is loaded). The log file is
//! only created once the first record passes the filter.

use parking_lot::Mutex;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Lazily opened log file
struct LogFile {
    file: Option<File>,
    attempted: bool,
}

struct LogBridge {
    file: Mutex<LogFile>,
    mirror_stderr: bool,
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

/// Set when the CLI or `RUST_LOG` chose the level; config may not override it.
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

/// Location of the debug log file.
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("fontbook_debug.log")
}

/// Install the bridge as the global logger.
///
/// Calling this more than once is harmless; only the first call installs.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let env_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| parse_rust_log(&value));
    let level = resolve_level(cli_level, env_level);

    let bridge = LogBridge {
        file: Mutex::new(LogFile {
            file: None,
            attempted: false,
        }),
        mirror_stderr: env_level.is_some(),
    };
    if BRIDGE.set(bridge).is_err() {
        return;
    }
    if let Some(bridge) = BRIDGE.get()
        && log::set_logger(bridge).is_err()
    {
        // Another logger is already installed (tests, embedding applications)
        return;
    }

    log::set_max_level(level.unwrap_or(LevelFilter::Off));
    LEVEL_PINNED.store(level.is_some(), Ordering::Relaxed);
}

/// Apply the config file's level unless the CLI or `RUST_LOG` already chose one.
pub fn apply_config_level(level: LevelFilter) {
    if !LEVEL_PINNED.load(Ordering::Relaxed) {
        log::set_max_level(level);
    }
}

/// `--log-level` wins over `RUST_LOG`.
pub fn resolve_level(
    cli_level: Option<LevelFilter>,
    env_level: Option<LevelFilter>,
) -> Option<LevelFilter> {
    cli_level.or(env_level)
}

/// Most verbose level named in a `RUST_LOG` value.
///
/// Accepts bare levels (`debug`) and `target=level` directives
/// (`fontbook=trace,warn`). Directives without a level are ignored.
pub fn parse_rust_log(value: &str) -> Option<LevelFilter> {
    value
        .split(',')
        .filter_map(|directive| {
            let level = match directive.split_once('=') {
                Some((_, level)) => level,
                None => directive,
            };
            level.trim().parse::<LevelFilter>().ok()
        })
        .max()
}

fn format_line(timestamp: &str, level: Level, target: &str, message: impl fmt::Display) -> String {
    format!("[{timestamp}] [{level:<5}] [{target}] {message}\n")
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

impl LogFile {
    fn write(&mut self, line: &str) {
        if !self.attempted {
            self.attempted = true;
            self.file = OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(log_path())
                .ok();
            let header = format!(
                "{}\nfontbook debug session started at {} (level={})\n{}\n",
                "=".repeat(80),
                get_timestamp(),
                log::max_level(),
                "=".repeat(80)
            );
            self.write_raw(&header);
        }
        self.write_raw(line);
    }

    fn write_raw(&mut self, msg: &str) {
        // Silently drop output if the file can't be written
        if let Some(file) = self.file.as_mut() {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            &get_timestamp(),
            record.level(),
            record.target(),
            record.args(),
        );
        self.file.lock().write(&line);
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().file.as_mut() {
            let _ = file.flush();
        }
    }
}
