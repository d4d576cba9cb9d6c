// picodrive-web/src/config.rs

//! Configuração do adapter.
//! Valores que `init` empurra para o core: opções, taxa de áudio, região e
//! tipo de controle.

use crate::audio::SND_RATE;
use crate::core::{InputDevice, PicoOpt};
use log::LevelFilter;

/// Códigos de override de região aceitos por `set_region`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Region {
    Auto = 0,
    JapanNtsc = 1,
    JapanPal = 2,
    Usa = 4,
    Europe = 8,
}

impl Region {
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Region> {
        match code {
            0 => Some(Region::Auto),
            1 => Some(Region::JapanNtsc),
            2 => Some(Region::JapanPal),
            4 => Some(Region::Usa),
            8 => Some(Region::Europe),
            _ => None,
        }
    }
}

/// Região efetiva, bits `0xC0` do registrador de versão do hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareRegion {
    JapanNtsc,
    JapanPal,
    Usa,
    Europe,
}

impl HardwareRegion {
    pub const MASK: u8 = 0xC0;

    pub fn from_hardware(hw: u8) -> HardwareRegion {
        match hw & Self::MASK {
            0x00 => HardwareRegion::JapanNtsc,
            0x40 => HardwareRegion::JapanPal,
            0x80 => HardwareRegion::Usa,
            _ => HardwareRegion::Europe,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            HardwareRegion::JapanNtsc => 0x00,
            HardwareRegion::JapanPal => 0x40,
            HardwareRegion::Usa => 0x80,
            HardwareRegion::Europe => 0xC0,
        }
    }

    pub fn is_pal(self) -> bool {
        matches!(self, HardwareRegion::JapanPal | HardwareRegion::Europe)
    }
}

/// Prioridade de regiões quando o cabeçalho aceita várias.
/// Codificada em nibbles, a primeira região no nibble mais baixo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionOrder(u32);

impl RegionOrder {
    /// EUA, depois Europa, depois Japão (0x184)
    pub const US_EU_JP: RegionOrder = RegionOrder(0x184);

    pub fn new(order: [Region; 3]) -> Self {
        let word = order
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, r)| acc | (r.code() & 0xF) << (i * 4));
        RegionOrder(word)
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl Default for RegionOrder {
    fn default() -> Self {
        RegionOrder::US_EU_JP
    }
}

/// Configuração aplicada por `init`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterConfig {
    pub sound_rate: u32,
    pub options: PicoOpt,
    pub region_override: u32,      // 0 = detecta pelo cabeçalho
    pub auto_region_order: RegionOrder,
    pub pad_device: InputDevice,
    pub log_level: LevelFilter,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            sound_rate: SND_RATE,
            options: PicoOpt::WEB_DEFAULT,
            region_override: Region::Auto.code(),
            auto_region_order: RegionOrder::default(),
            pad_device: InputDevice::Pad6Btn,
            log_level: LevelFilter::Info,
        }
    }
}
