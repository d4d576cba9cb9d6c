// picodrive-web/src/platform/mod.rs

//! Platform services module
//!
//! Services the core expects its host to provide: logging, memory
//! allocation, cache maintenance and the optional codec entry points, plus
//! the host notification sinks the adapter forwards video and audio events to.

pub mod codec;
pub mod host;
pub mod log;
pub mod mem;

pub use host::{AudioFn, HostSinks, LogFn, VideoModeFn};
pub use self::log::{init_logging, set_log_sink};
