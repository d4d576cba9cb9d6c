// picodrive-web/src/core/mod.rs

//! Emulator core interface
//!
//! The engine (68000/Z80/SH-2 cores, VDP, sound chips, cartridge hardware
//! database, state serializer) lives outside this crate. This module declares
//! the three seams between it and the adapter:
//!
//! - [`Core`]: what the adapter drives (power, media, frames, states)
//! - [`Draw`]: the renderer configuration the core exposes
//! - [`Platform`]: the callbacks the core fires back, synchronously, from
//!   inside the [`Core`] methods that take a platform

pub mod types;

#[cfg(feature = "picodrive")]
pub mod picodrive;

pub use types::{InputDevice, MediaType, OutBuf, Pahw, PicoOpt, PixelFormat, SoundOut, VideoMode};

#[cfg(feature = "picodrive")]
pub use picodrive::PicoDrive;

use crate::state::StateIo;

/// Failures reported by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// Media type could not be detected
    BadDetect,
    /// CD image is unreadable
    BadCd,
    /// CD image needs a BIOS that is not available
    NoCdBios,
    /// Any other non-positive loader result
    Media(i32),
    /// Serializer returned a non-zero status
    State(i32),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::BadDetect => write!(f, "media type not detected"),
            CoreError::BadCd => write!(f, "bad CD image"),
            CoreError::NoCdBios => write!(f, "CD image requires a missing BIOS"),
            CoreError::Media(code) => write!(f, "media loader failed ({})", code),
            CoreError::State(code) => write!(f, "state serializer failed ({})", code),
        }
    }
}

impl std::error::Error for CoreError {}

/// Renderer configuration owned by the core.
pub trait Draw {
    /// Select the output pixel format; `line_mode_32x` picks the 32X
    /// line-by-line path.
    fn set_out_format(&mut self, format: PixelFormat, line_mode_32x: bool);

    /// Register the framebuffer the renderer writes into.
    fn set_out_buf(&mut self, out: OutBuf);

    /// Force a full CRAM → RGB conversion on the next frame.
    fn mark_palette_dirty(&mut self);
}

/// Callbacks from the core into the adapter.
///
/// All of them fire on the caller's stack; implementations must not call back
/// into the adapter's entry points.
pub trait Platform {
    /// The guest reprogrammed the VDP; `draw` is the core's renderer so the
    /// framebuffer can be re-registered before the next line is drawn.
    fn video_mode_change(&mut self, draw: &mut dyn Draw, mode: VideoMode);

    /// 32X acceleration started; the renderer binding has been dropped.
    fn startup_32x(&mut self, draw: &mut dyn Draw);

    /// `len` bytes of PCM are ready at the start of the bound sound buffer.
    fn audio_write(&mut self, len: usize);
}

/// The emulator engine.
pub trait Core {
    /// Power up the engine (allocations, tables).
    fn init(&mut self);

    /// Tear the engine down; a later `init` starts from scratch.
    fn exit(&mut self);

    fn options(&self) -> PicoOpt;
    fn set_options(&mut self, opts: PicoOpt);

    /// Region override code; `0` means detect from the header.
    fn set_region_override(&mut self, code: u32);

    /// Nibble-packed priority used when a header allows several regions.
    fn set_auto_region_order(&mut self, order: u32);

    /// Bind the PCM output buffer and sample rate.
    fn bind_sound(&mut self, rate: u32, out: SoundOut);

    fn set_input_device(&mut self, port: usize, device: InputDevice);

    /// Renderer configuration, for use outside of a frame.
    fn draw(&mut self) -> &mut dyn Draw;

    /// Mount `rom` and power the machine. An empty `carthw_cfg` selects the
    /// built-in cartridge hardware database.
    fn load_media(
        &mut self,
        filename: &str,
        rom: &[u8],
        carthw_cfg: &str,
        platform: &mut dyn Platform,
    ) -> Result<MediaType, CoreError>;

    fn cart_unload(&mut self);

    /// Per-game preparation of the frame loop.
    fn loop_prepare(&mut self);

    /// Recompute sound timing for the current region; `preserve_state` keeps
    /// the sound chips' internal state across the change.
    fn rerate_sound(&mut self, preserve_state: bool);

    /// Re-run region detection with the current override.
    fn detect_region(&mut self);

    /// Soft reset; the guest may announce a new video mode.
    fn reset(&mut self, platform: &mut dyn Platform);

    /// Publish a pad bitmask for the next frame.
    fn set_pad(&mut self, port: usize, buttons: u16);

    /// Emulate exactly one guest frame.
    fn frame(&mut self, platform: &mut dyn Platform);

    fn is_pal(&self) -> bool;

    /// Hardware version register (region bits in `0xC0`).
    fn hardware(&self) -> u8;

    /// Additional hardware flagged for the mounted media.
    fn additional_hw(&self) -> Pahw;

    /// Copy of the mounted media's 256-byte header.
    fn media_header(&self) -> &[u8];

    /// Bring up the 32X add-on.
    fn startup_32x(&mut self, platform: &mut dyn Platform);

    /// Reset both SH-2s so they fetch PC/SP from the BIOS vectors.
    fn reset_sh2s(&mut self);

    /// Serialize the machine into `io`.
    fn save_state(&mut self, io: &mut dyn StateIo) -> Result<(), CoreError>;

    /// Restore the machine from `io`. The restored VDP state may fire a
    /// mode change.
    fn load_state(&mut self, io: &mut dyn StateIo, platform: &mut dyn Platform) -> Result<(), CoreError>;
}
