#![allow(dead_code)]

use picodrive_web::core::{InputDevice, OutBuf, Pahw, PicoOpt, PixelFormat, SoundOut};
use picodrive_web::{Adapter, Core, CoreError, Draw, MediaType, Platform, StateIo, VideoMode};

/// Offset of the 256-byte cartridge header inside the ROM image
pub const HEADER_BASE: usize = 0x100;

/// Magic at the start of every state blob the fake core writes
pub const STATE_MAGIC: &[u8; 4] = b"PDST";

/// Builds a ROM image with a valid header. `region` is the header's region
/// character (`b'U'`, `b'E'`, `b'J'`).
pub fn make_rom(size: usize, name: &str, region: u8) -> Vec<u8> {
    let mut rom = vec![0u8; size];
    rom[HEADER_BASE..HEADER_BASE + 16].copy_from_slice(b"SEGA MEGA DRIVE ");

    let field = &mut rom[HEADER_BASE + 0x20..HEADER_BASE + 0x50];
    field.fill(b' ');
    field[..name.len()].copy_from_slice(name.as_bytes());

    rom[HEADER_BASE + 0xF0] = region;
    rom
}

/// Renderer state as configured by the adapter
#[derive(Debug, Default)]
pub struct FakeDraw {
    pub format: Option<(PixelFormat, bool)>,
    pub out: Option<OutBuf>,
    pub binds: u32,
    pub dirty: u32,
}

impl Draw for FakeDraw {
    fn set_out_format(&mut self, format: PixelFormat, line_mode_32x: bool) {
        self.format = Some((format, line_mode_32x));
    }

    fn set_out_buf(&mut self, out: OutBuf) {
        self.out = Some(out);
        self.binds += 1;
    }

    fn mark_palette_dirty(&mut self) {
        self.dirty += 1;
    }
}

/// Scripted engine: detects `SEGA` headers, announces a 320x224 mode on
/// load, draws a frame-dependent pattern and one frame of PCM per `frame`,
/// and serializes its counters into a small state blob.
#[derive(Debug, Default)]
pub struct FakeCore {
    pub draw: FakeDraw,
    pub opts: PicoOpt,
    pub region_override: u32,
    pub auto_region_order: u32,
    pub sound: Option<(u32, SoundOut)>,
    pub devices: [Option<InputDevice>; 2],

    pub init_calls: u32,
    pub exit_calls: u32,
    pub unloads: u32,
    pub resets: u32,
    pub rerates: Vec<bool>,
    pub startups_32x: u32,
    pub sh2_resets: u32,

    pub rom: Option<Vec<u8>>,
    pub header: Vec<u8>,
    pub ahw: Pahw,
    pub hardware: u8,
    pub pal: bool,

    pub pads: [u16; 2],
    pub pad_log: Vec<[u16; 2]>,
    pub frame_no: u32,
    pub audio_lens: Vec<usize>,

    /// Extra bytes appended to each saved state
    pub state_padding: usize,
}

impl FakeCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> VideoMode {
        VideoMode::new(8, 224, 0, 320)
    }

    fn pixel(&self, x: usize, y: usize) -> u16 {
        (((self.frame_no as usize + x + y) & 0x7FFF) as u16) | 1
    }

    fn render(&mut self) {
        let Some(out) = self.draw.out else { return };
        let mode = self.mode();
        let width = out.pitch() / 2;
        let cols = mode.col_count.min(width);
        let base = out.ptr().as_ptr();

        for y in mode.start_line..(mode.start_line + mode.line_count).min(240) {
            for x in 0..cols {
                // SAFETY: the adapter's framebuffer holds 240 rows of `width`
                // pixels.
                unsafe { *base.add(y * width + x) = self.pixel(x, y) };
            }
        }
    }

    fn write_audio(&mut self, platform: &mut dyn Platform) {
        let Some((rate, out)) = self.sound else { return };
        let fps = if self.pal { 50 } else { 60 };
        let frames = (rate / fps) as usize;
        let samples = (frames * 2).min(out.capacity());

        for i in 0..samples {
            // SAFETY: `samples` never exceeds the bound capacity.
            unsafe { *out.ptr().as_ptr().add(i) = (i as i16).wrapping_mul(3) };
        }
        self.audio_lens.push(samples * 2);
        platform.audio_write(samples * 2);
    }

    fn read_u32(io: &mut dyn StateIo) -> Result<u32, CoreError> {
        let mut word = [0u8; 4];
        match io.read(&mut word) {
            4 => Ok(u32::from_le_bytes(word)),
            _ => Err(CoreError::State(-2)),
        }
    }
}

impl Core for FakeCore {
    fn init(&mut self) {
        self.init_calls += 1;
    }

    fn exit(&mut self) {
        self.exit_calls += 1;
        self.rom = None;
    }

    fn options(&self) -> PicoOpt {
        self.opts
    }

    fn set_options(&mut self, opts: PicoOpt) {
        self.opts = opts;
    }

    fn set_region_override(&mut self, code: u32) {
        self.region_override = code;
    }

    fn set_auto_region_order(&mut self, order: u32) {
        self.auto_region_order = order;
    }

    fn bind_sound(&mut self, rate: u32, out: SoundOut) {
        self.sound = Some((rate, out));
    }

    fn set_input_device(&mut self, port: usize, device: InputDevice) {
        self.devices[port] = Some(device);
    }

    fn draw(&mut self) -> &mut dyn Draw {
        &mut self.draw
    }

    fn load_media(
        &mut self,
        _filename: &str,
        rom: &[u8],
        carthw_cfg: &str,
        platform: &mut dyn Platform,
    ) -> Result<MediaType, CoreError> {
        assert!(carthw_cfg.is_empty());
        match rom.get(HEADER_BASE..HEADER_BASE + 4) {
            Some(b"SEGA") => {}
            _ => return Err(CoreError::BadDetect),
        }

        self.rom = Some(rom.to_vec());
        self.header = rom[HEADER_BASE..HEADER_BASE + 0x100].to_vec();
        self.ahw = Pahw::empty();
        self.frame_no = 0;
        self.detect_region();

        let mode = self.mode();
        platform.video_mode_change(&mut self.draw, mode);
        Ok(MediaType::MdCart)
    }

    fn cart_unload(&mut self) {
        self.unloads += 1;
        self.rom = None;
    }

    fn loop_prepare(&mut self) {}

    fn rerate_sound(&mut self, preserve_state: bool) {
        self.rerates.push(preserve_state);
    }

    fn detect_region(&mut self) {
        let (hardware, pal) = match self.region_override {
            1 => (0x00, false),
            2 => (0x40, true),
            4 => (0x80, false),
            8 => (0xC0, true),
            _ => match self.header.get(0xF0) {
                Some(b'E') => (0xC0, true),
                Some(b'J') => (0x00, false),
                _ => (0x80, false),
            },
        };
        self.hardware = hardware;
        self.pal = pal;
    }

    fn reset(&mut self, _platform: &mut dyn Platform) {
        self.resets += 1;
        self.frame_no = 0;
    }

    fn set_pad(&mut self, port: usize, buttons: u16) {
        self.pads[port] = buttons;
    }

    fn frame(&mut self, platform: &mut dyn Platform) {
        self.frame_no += 1;
        self.pad_log.push(self.pads);
        self.render();
        self.write_audio(platform);
    }

    fn is_pal(&self) -> bool {
        self.pal
    }

    fn hardware(&self) -> u8 {
        self.hardware
    }

    fn additional_hw(&self) -> Pahw {
        self.ahw
    }

    fn media_header(&self) -> &[u8] {
        &self.header
    }

    fn startup_32x(&mut self, platform: &mut dyn Platform) {
        self.startups_32x += 1;
        self.ahw |= Pahw::P32X;
        self.draw.out = None;
        platform.startup_32x(&mut self.draw);
    }

    fn reset_sh2s(&mut self) {
        self.sh2_resets += 1;
    }

    fn save_state(&mut self, io: &mut dyn StateIo) -> Result<(), CoreError> {
        let mut blob = Vec::with_capacity(16 + self.state_padding);
        blob.extend_from_slice(STATE_MAGIC);
        blob.extend_from_slice(&self.frame_no.to_le_bytes());
        blob.extend_from_slice(&(self.pads[0] as u32 | (self.pads[1] as u32) << 16).to_le_bytes());
        blob.extend_from_slice(&(self.hardware as u32 | (self.pal as u32) << 8).to_le_bytes());
        blob.resize(blob.len() + self.state_padding, 0xEE);

        if io.write(&blob) != blob.len() {
            return Err(CoreError::State(-1));
        }
        Ok(())
    }

    fn load_state(&mut self, io: &mut dyn StateIo, platform: &mut dyn Platform) -> Result<(), CoreError> {
        let mut magic = [0u8; 4];
        if io.read(&mut magic) != 4 || &magic != STATE_MAGIC {
            return Err(CoreError::State(-2));
        }

        self.frame_no = Self::read_u32(io)?;
        let pads = Self::read_u32(io)?;
        self.pads = [pads as u16, (pads >> 16) as u16];
        let region = Self::read_u32(io)?;
        self.hardware = region as u8;
        self.pal = region & 0x100 != 0;

        let mode = self.mode();
        platform.video_mode_change(&mut self.draw, mode);
        Ok(())
    }
}

/// Adapter over a fake core, initialized, with `rom` mounted as `filename`.
pub fn loaded_adapter(rom: &[u8], filename: &str) -> Adapter<FakeCore> {
    let mut adapter = Adapter::new(Box::new(FakeCore::new()));
    adapter.init();
    adapter.rom_buffer(rom.len()).unwrap().copy_from_slice(rom);
    adapter.load_rom(filename).unwrap();
    adapter
}
