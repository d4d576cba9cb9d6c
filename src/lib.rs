// Ponto de entrada da biblioteca.
// Adapter do PicoDrive para hosts de navegador: um único emulador, buffers
// compartilhados por ponteiro e uma ABI C plana.

// Módulos principais do projeto.
pub mod core;
pub mod platform;

pub mod adapter;
pub mod audio;
pub mod cart;
pub mod config;
pub mod error;
pub mod input;
pub mod state;
pub mod video;

// A ABI C exportada para o host.
pub mod exports;

// Re-exportações para facilitar o uso.
pub use adapter::{Adapter, Frontend, Lifecycle};
pub use config::{AdapterConfig, HardwareRegion, Region, RegionOrder};
pub use self::core::{Core, CoreError, Draw, MediaType, Platform, VideoMode};
pub use error::{AdapterError, AdapterResult};
pub use input::Buttons;
pub use state::{StateCursor, StateIo, STATE_MAX_SIZE};

#[cfg(feature = "picodrive")]
pub use self::core::PicoDrive;

/// Versão do adapter.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
