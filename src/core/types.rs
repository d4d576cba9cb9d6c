// picodrive-web/src/core/types.rs

//! Values exchanged with the emulator core.
//!
//! Bit layouts and enum discriminants follow the core's public header so the
//! FFI layer can pass them through unchanged.

use bitflags::bitflags;
use std::ptr::NonNull;

bitflags! {
    /// Core option word (`PicoIn.opt`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PicoOpt: u32 {
        const EN_FM          = 1 << 0;
        const EN_PSG         = 1 << 1;
        const EN_Z80         = 1 << 2;
        const EN_STEREO      = 1 << 3;
        const ALT_RENDERER   = 1 << 4;
        const EN_YM2413      = 1 << 5;
        const EN_SNDFILTER   = 1 << 6;
        const ACC_SPRITES    = 1 << 7;
        const DIS_32C_BORDER = 1 << 8;
        const EXT_FM         = 1 << 9;
        const EN_MCD_PCM     = 1 << 10;
        const EN_MCD_CDDA    = 1 << 11;
        const EN_MCD_GFX     = 1 << 12;
        const EN_SOFTSCALE   = 1 << 13;
        const EN_MCD_RAMCART = 1 << 15;
        const DIS_VDP_FIFO   = 1 << 16;
        const EN_DRC         = 1 << 17;
        const DIS_SPRITE_LIM = 1 << 18;
        const DIS_IDLE_DET   = 1 << 19;
        const EN_32X         = 1 << 20;
        const EN_PWM         = 1 << 21;
    }
}

impl PicoOpt {
    /// Option set pushed by `init`: every sound and add-on path enabled,
    /// accurate sprites, no 32-column border.
    pub const WEB_DEFAULT: PicoOpt = PicoOpt::EN_STEREO
        .union(PicoOpt::EN_FM)
        .union(PicoOpt::EN_PSG)
        .union(PicoOpt::EN_Z80)
        .union(PicoOpt::EN_MCD_PCM)
        .union(PicoOpt::EN_MCD_CDDA)
        .union(PicoOpt::EN_MCD_GFX)
        .union(PicoOpt::ACC_SPRITES)
        .union(PicoOpt::EN_32X)
        .union(PicoOpt::EN_PWM)
        .union(PicoOpt::DIS_32C_BORDER);
}

bitflags! {
    /// Additional hardware detected for the mounted media (`PicoIn.AHW`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Pahw: u32 {
        const MCD  = 1 << 0;
        const P32X = 1 << 1;
        const SVP  = 1 << 2;
        const PICO = 1 << 3;
        const SMS  = 1 << 4;
    }
}

/// Renderer output format (`pdso_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PixelFormat {
    None = 0,
    Rgb555 = 1,
    Indexed8 = 2,
}

/// Controller type plugged into a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum InputDevice {
    Nothing = 0,
    Pad3Btn = 1,
    Pad6Btn = 2,
    TeamPlayer = 3,
}

/// What the media loader mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    MdCart,
    Mark3,
    Cd,
}

impl MediaType {
    /// Decodes the loader's return value; non-positive values are errors.
    pub fn from_raw(raw: i32) -> Result<MediaType, super::CoreError> {
        use super::CoreError;
        match raw {
            1 => Ok(MediaType::MdCart),
            2 => Ok(MediaType::Mark3),
            3 => Ok(MediaType::Cd),
            -1 => Err(CoreError::BadDetect),
            -2 => Err(CoreError::BadCd),
            -3 => Err(CoreError::NoCdBios),
            other => Err(CoreError::Media(other)),
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::MdCart => write!(f, "Mega Drive cartridge"),
            MediaType::Mark3 => write!(f, "Mark III / SMS cartridge"),
            MediaType::Cd => write!(f, "Mega CD image"),
        }
    }
}

/// Active display geometry announced by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoMode {
    pub start_line: usize,
    pub line_count: usize,
    pub start_col: usize,
    pub col_count: usize,
}

impl VideoMode {
    pub const fn new(start_line: usize, line_count: usize, start_col: usize, col_count: usize) -> Self {
        Self { start_line, line_count, start_col, col_count }
    }

    /// Builds a mode from the core's signed arguments; negatives read as 0.
    pub fn from_raw(start_line: i32, line_count: i32, start_col: i32, col_count: i32) -> Self {
        let clamp = |v: i32| v.max(0) as usize;
        Self::new(clamp(start_line), clamp(line_count), clamp(start_col), clamp(col_count))
    }
}

/// Framebuffer registration: base pointer plus row pitch in bytes.
///
/// The pointer belongs to the adapter and stays valid for the adapter's
/// lifetime; the core writes rows `pitch` bytes apart starting at `ptr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutBuf {
    ptr: NonNull<u16>,
    pitch: usize,
}

impl OutBuf {
    pub fn new(ptr: NonNull<u16>, pitch: usize) -> Self {
        Self { ptr, pitch }
    }

    pub fn ptr(&self) -> NonNull<u16> {
        self.ptr
    }

    /// Row pitch in bytes.
    pub fn pitch(&self) -> usize {
        self.pitch
    }
}

/// PCM output binding: interleaved stereo `i16` buffer and its capacity in
/// samples (not frames).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundOut {
    ptr: NonNull<i16>,
    capacity: usize,
}

impl SoundOut {
    pub fn new(ptr: NonNull<i16>, capacity: usize) -> Self {
        Self { ptr, capacity }
    }

    pub fn ptr(&self) -> NonNull<i16> {
        self.ptr
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CoreError;

    #[test]
    fn test_web_default_options() {
        let opts = PicoOpt::WEB_DEFAULT;
        assert!(opts.contains(PicoOpt::EN_32X | PicoOpt::EN_PWM));
        assert!(opts.contains(PicoOpt::DIS_32C_BORDER));
        assert!(!opts.contains(PicoOpt::ALT_RENDERER));
        assert!(!opts.contains(PicoOpt::EN_DRC));
    }

    #[test]
    fn test_media_type_decoding() {
        assert_eq!(MediaType::from_raw(1), Ok(MediaType::MdCart));
        assert_eq!(MediaType::from_raw(3), Ok(MediaType::Cd));
        assert_eq!(MediaType::from_raw(-1), Err(CoreError::BadDetect));
        assert_eq!(MediaType::from_raw(0), Err(CoreError::Media(0)));
    }

    #[test]
    fn test_video_mode_from_raw_clamps_negatives() {
        let mode = VideoMode::from_raw(-8, 224, -1, 320);
        assert_eq!(mode, VideoMode::new(0, 224, 0, 320));
    }
}
