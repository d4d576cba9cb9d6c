//! Log sink for the adapter and the core.
//!
//! Lines go to the registered host sink when there is one, otherwise to the
//! browser console (Emscripten) or standard output. Delivery is best effort.

use super::host::LogFn;
use cfg_if::cfg_if;
use log::{LevelFilter, Log, Metadata, Record};
use std::ffi::CString;
use std::sync::RwLock;

static LOGGER: HostLogger = HostLogger;
static LOG_SINK: RwLock<Option<LogFn>> = RwLock::new(None);

/// `log` backend forwarding to the host console bridge.
pub struct HostLogger;

impl Log for HostLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        emit(&format!("[{}] {}: {}", record.level(), record.target(), record.args()));
    }

    fn flush(&self) {}
}

/// Install the logger. Later calls only change the level.
pub fn init_logging(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Register (or clear, with `None`) the host log sink.
pub fn set_log_sink(sink: Option<LogFn>) {
    if let Ok(mut slot) = LOG_SINK.write() {
        *slot = sink;
    }
}

/// One line printed by the core (`lprintf`).
pub fn core_line(msg: &str) {
    let msg = msg.trim_end();
    if !msg.is_empty() {
        log::info!(target: "picodrive", "{}", msg);
    }
}

fn emit(line: &str) {
    let sink = LOG_SINK.read().ok().and_then(|slot| *slot);
    match sink {
        Some(sink) => {
            let line = to_c_string(line);
            sink(line.as_ptr());
        }
        None => write_console(line),
    }
}

fn to_c_string(line: &str) -> CString {
    CString::new(line.replace('\0', " ")).unwrap_or_default()
}

cfg_if! {
    if #[cfg(target_os = "emscripten")] {
        extern "C" {
            fn emscripten_console_log(utf8_string: *const libc::c_char);
        }

        fn write_console(line: &str) {
            let line = to_c_string(line);
            // SAFETY: `line` is a valid NUL-terminated string for the call.
            unsafe { emscripten_console_log(line.as_ptr()) };
        }
    } else {
        fn write_console(line: &str) {
            use std::io::Write;
            let _ = writeln!(std::io::stdout(), "{}", line);
        }
    }
}
