// picodrive-web/src/exports.rs

//! Host-facing C ABI
//!
//! One adapter per process, held in a thread-local slot. Every entry point
//! flattens `AdapterResult` into the `1 / 0 / null` convention, logging the
//! error first. Calling an entry point from inside a host callback is
//! rejected with a warning.

use crate::adapter::Adapter;
use crate::cart::HEADER_NAME_LEN;
use crate::config::AdapterConfig;
use crate::core::Core;
use crate::input::Buttons;
use crate::platform::{self, AudioFn, HostSinks, LogFn, VideoModeFn};
use libc::c_char;
use log::{debug, warn};
use std::cell::RefCell;
use std::ffi::CStr;
use std::ptr;

thread_local! {
    static ADAPTER: RefCell<Option<Adapter>> = const { RefCell::new(None) };
    static ROM_NAME: RefCell<[u8; HEADER_NAME_LEN + 1]> = const { RefCell::new([0; HEADER_NAME_LEN + 1]) };
}

/// Install the engine behind the exports with the default configuration.
/// Replaces (and shuts down) any adapter already installed.
pub fn install_core(core: Box<dyn Core>) {
    install_core_with_config(core, AdapterConfig::default());
}

pub fn install_core_with_config(core: Box<dyn Core>, config: AdapterConfig) {
    let adapter = Adapter::with_config(core, config);
    let previous = ADAPTER.with(|slot| match slot.try_borrow_mut() {
        Ok(mut slot) => slot.replace(adapter),
        Err(_) => {
            warn!("Troca de core durante uma chamada ao adapter ignorada");
            None
        }
    });
    drop(previous);
}

/// Drop the installed adapter, if any.
pub fn uninstall() {
    let previous = ADAPTER.with(|slot| match slot.try_borrow_mut() {
        Ok(mut slot) => slot.take(),
        Err(_) => {
            warn!("Remoção do adapter durante uma chamada ignorada");
            None
        }
    });
    drop(previous);
}

pub fn is_installed() -> bool {
    ADAPTER.with(|slot| slot.try_borrow().map(|a| a.is_some()).unwrap_or(true))
}

/// Run `f` against the installed adapter, or return `default`. With the
/// `picodrive` feature the engine is installed on first use, so entry points
/// called before `pico_init` (ROM buffer, region, callbacks) are kept.
pub fn with_adapter<R>(default: R, f: impl FnOnce(&mut Adapter) -> R) -> R {
    ensure_installed();
    ADAPTER.with(|slot| match slot.try_borrow_mut() {
        Ok(mut slot) => match slot.as_mut() {
            Some(adapter) => f(adapter),
            None => {
                debug!("Nenhum adapter instalado");
                default
            }
        },
        Err(_) => {
            warn!("Chamada reentrante ao adapter ignorada");
            default
        }
    })
}

fn flag(value: bool) -> i32 {
    value as i32
}

#[cfg(feature = "picodrive")]
fn ensure_installed() {
    if !is_installed() {
        install_core(Box::new(crate::core::PicoDrive::new()));
    }
}

#[cfg(not(feature = "picodrive"))]
fn ensure_installed() {}

// ========== Ciclo de vida ==========

#[no_mangle]
pub extern "C" fn pico_init() -> i32 {
    with_adapter(0, |adapter| {
        platform::init_logging(adapter.config().log_level);
        adapter.init();
        1
    })
}

#[no_mangle]
pub extern "C" fn pico_exit() {
    with_adapter((), |adapter| adapter.exit());
}

/// The returned buffer is valid for `size` bytes until the next call to
/// `pico_get_rom_buffer` or `pico_exit`.
#[no_mangle]
pub extern "C" fn pico_get_rom_buffer(size: u32) -> *mut u8 {
    with_adapter(ptr::null_mut(), |adapter| match adapter.rom_buffer(size as usize) {
        Ok(rom) => rom.as_mut_ptr(),
        Err(err) => {
            warn!("get_rom_buffer({}): {}", size, err);
            ptr::null_mut()
        }
    })
}

/// # Safety
/// `filename` must be null or a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn pico_load_rom(filename: *const c_char) -> i32 {
    let name = if filename.is_null() {
        String::new()
    } else {
        CStr::from_ptr(filename).to_string_lossy().into_owned()
    };

    with_adapter(0, |adapter| match adapter.load_rom(&name) {
        Ok(_) => 1,
        Err(err) => {
            warn!("load_rom({}): {}", name, err);
            0
        }
    })
}

#[no_mangle]
pub extern "C" fn pico_reset() {
    with_adapter((), |adapter| adapter.reset());
}

// ========== Entrada e frames ==========

#[no_mangle]
pub extern "C" fn pico_set_input(pad: i32, buttons: u16) {
    if pad < 0 {
        return;
    }
    with_adapter((), |adapter| adapter.set_input(pad as usize, buttons));
}

#[no_mangle]
pub extern "C" fn pico_run_frame() {
    with_adapter((), |adapter| adapter.run_frame());
}

#[no_mangle]
pub extern "C" fn pico_get_frame_count() -> u32 {
    with_adapter(0, |adapter| adapter.frame_count() as u32)
}

// ========== Vídeo ==========

#[no_mangle]
pub extern "C" fn pico_get_video_buffer() -> *const u16 {
    with_adapter(ptr::null(), |adapter| adapter.video_ptr())
}

#[no_mangle]
pub extern "C" fn pico_get_video_width() -> i32 {
    with_adapter(0, |adapter| adapter.video_width() as i32)
}

#[no_mangle]
pub extern "C" fn pico_get_video_height() -> i32 {
    with_adapter(0, |adapter| adapter.video_height() as i32)
}

#[no_mangle]
pub extern "C" fn pico_is_pal() -> i32 {
    with_adapter(0, |adapter| flag(adapter.is_pal()))
}

/// NUL-terminated domestic name, overwritten by the next call.
#[no_mangle]
pub extern "C" fn pico_get_rom_name() -> *const c_char {
    ROM_NAME.with(|buf| {
        let mut buf = buf.borrow_mut();
        buf.fill(0);
        with_adapter((), |adapter| {
            let name = adapter.rom_name();
            let len = name.len().min(HEADER_NAME_LEN);
            buf[..len].copy_from_slice(&name[..len]);
        });
        buf.as_ptr() as *const c_char
    })
}

// ========== Região ==========

#[no_mangle]
pub extern "C" fn pico_set_region(region: i32) {
    with_adapter((), |adapter| adapter.set_region(region as u32));
}

#[no_mangle]
pub extern "C" fn pico_get_region() -> i32 {
    with_adapter(0, |adapter| adapter.region() as i32)
}

// ========== Botões ==========

macro_rules! button_exports {
    ($($name:ident => $button:ident),* $(,)?) => {
        $(
            #[no_mangle]
            pub extern "C" fn $name() -> i32 {
                Buttons::$button.bits() as i32
            }
        )*
    };
}

button_exports! {
    pico_get_button_up => UP,
    pico_get_button_down => DOWN,
    pico_get_button_left => LEFT,
    pico_get_button_right => RIGHT,
    pico_get_button_b => B,
    pico_get_button_c => C,
    pico_get_button_a => A,
    pico_get_button_start => START,
    pico_get_button_z => Z,
    pico_get_button_y => Y,
    pico_get_button_x => X,
    pico_get_button_mode => MODE,
}

// ========== Save states ==========

#[no_mangle]
pub extern "C" fn pico_state_save() -> i32 {
    with_adapter(0, |adapter| match adapter.state_save() {
        Ok(_) => 1,
        Err(err) => {
            warn!("state_save: {}", err);
            0
        }
    })
}

#[no_mangle]
pub extern "C" fn pico_state_load() -> i32 {
    with_adapter(0, |adapter| match adapter.state_load() {
        Ok(()) => 1,
        Err(err) => {
            warn!("state_load: {}", err);
            0
        }
    })
}

#[no_mangle]
pub extern "C" fn pico_state_exists() -> i32 {
    with_adapter(0, |adapter| flag(adapter.state_exists()))
}

#[no_mangle]
pub extern "C" fn pico_get_state_buffer() -> *const u8 {
    with_adapter(ptr::null(), |adapter| adapter.state_ptr())
}

#[no_mangle]
pub extern "C" fn pico_get_state_size() -> i32 {
    with_adapter(0, |adapter| adapter.state_size() as i32)
}

/// Negative sizes are treated as zero.
#[no_mangle]
pub extern "C" fn pico_get_state_load_buffer(size: i32) -> *mut u8 {
    let size = size.max(0) as usize;
    with_adapter(ptr::null_mut(), |adapter| match adapter.state_load_buffer(size) {
        Ok(region) => region.as_mut_ptr(),
        Err(err) => {
            warn!("get_state_load_buffer({}): {}", size, err);
            ptr::null_mut()
        }
    })
}

// ========== Callbacks do host ==========

#[no_mangle]
pub extern "C" fn pico_set_log_callback(sink: Option<LogFn>) {
    platform::set_log_sink(sink);
}

#[no_mangle]
pub extern "C" fn pico_set_video_mode_callback(sink: Option<VideoModeFn>) {
    with_adapter((), |adapter| {
        adapter.set_host_sinks(HostSinks { video_mode: sink, ..adapter.host_sinks() })
    });
}

#[no_mangle]
pub extern "C" fn pico_set_audio_callback(sink: Option<AudioFn>) {
    with_adapter((), |adapter| {
        adapter.set_host_sinks(HostSinks { audio: sink, ..adapter.host_sinks() })
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_exports_match_bits() {
        assert_eq!(pico_get_button_up(), 1 << 0);
        assert_eq!(pico_get_button_right(), 1 << 3);
        assert_eq!(pico_get_button_a(), 1 << 6);
        assert_eq!(pico_get_button_start(), 1 << 7);
        assert_eq!(pico_get_button_mode(), 1 << 11);
    }

    #[cfg(not(feature = "picodrive"))]
    #[test]
    fn test_entry_points_without_adapter() {
        uninstall();
        assert_eq!(pico_get_video_width(), 0);
        assert!(pico_get_video_buffer().is_null());
        assert_eq!(pico_state_save(), 0);
        pico_run_frame();

        let name = unsafe { CStr::from_ptr(pico_get_rom_name()) };
        assert!(name.to_bytes().is_empty());
    }
}
