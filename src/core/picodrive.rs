// picodrive-web/src/core/picodrive.rs

//! PicoDrive via FFI.
//!
//! O core em C é um conjunto de globais (`PicoIn`, `Pico`) e chama o
//! frontend por funções C de nome fixo. Este módulo:
//!
//! - implementa [`Core`] sobre a API C (acesso às globais via `csrc/pico_glue.c`);
//! - exporta os símbolos de plataforma que o core linka (`plat_mmap`,
//!   `emu_video_mode_change`, stubs de MP3/OGG, ...);
//! - roteia os callbacks para o [`Platform`] ativo durante a chamada atual.
//!   Um callback fora de uma chamada é registrado em log e ignorado.

use super::{Core, CoreError, Draw, InputDevice, MediaType, OutBuf, Pahw, PicoOpt, PixelFormat, Platform, SoundOut, VideoMode};
use crate::platform::{codec, log as host_log, mem};
use crate::state::StateIo;
use libc::{c_char, c_int, c_long, c_uint, c_ulong, c_ushort, c_void};
use log::warn;
use std::cell::Cell;
use std::ffi::{CStr, CString};
use std::io::SeekFrom;
use std::ptr::NonNull;

/// Tamanho do cabeçalho copiado pelo loader (`media_id_header`)
const MEDIA_HEADER_LEN: usize = 0x100;

type AreaRw = unsafe extern "C" fn(p: *mut c_void, size: usize, n: usize, file: *mut c_void) -> usize;
type AreaEof = unsafe extern "C" fn(file: *mut c_void) -> usize;
type AreaSeek = unsafe extern "C" fn(file: *mut c_void, offset: c_long, whence: c_int) -> c_int;

extern "C" {
    // API pública do core
    fn PicoInit();
    fn PicoExit();
    fn PicoCartUnload();
    fn PicoLoopPrepare();
    fn PsndRerate(preserve_state: c_int);
    fn PicoDetectRegion();
    fn PicoReset() -> c_int;
    fn PicoFrame();
    fn Pico32xStartup();
    fn p32x_reset_sh2s();
    fn PicoSetInputDevice(port: c_int, device: c_int);
    fn PicoDrawSetOutFormat(which: c_int, use_32x_line_mode: c_int);
    fn PicoDrawSetOutBuf(dest: *mut c_void, increment: c_int);
    fn PicoStateFP(
        afile: *mut c_void,
        is_save: c_int,
        read: Option<AreaRw>,
        write: Option<AreaRw>,
        eof: Option<AreaEof>,
        seek: Option<AreaSeek>,
    ) -> c_int;

    // csrc/pico_glue.c
    fn pw_get_options() -> c_uint;
    fn pw_set_options(opt: c_uint);
    fn pw_set_region_override(code: c_uint);
    fn pw_set_auto_region_order(order: c_uint);
    fn pw_bind_sound(rate: c_int, out: *mut i16);
    fn pw_set_pad(port: c_int, buttons: c_ushort);
    fn pw_load_media(filename: *const c_char, rom: *const u8, size: c_uint, carthw_cfg: *const c_char) -> c_int;
    fn pw_is_pal() -> c_int;
    fn pw_hardware() -> u8;
    fn pw_additional_hw() -> c_uint;
    fn pw_media_header() -> *const u8;
    fn pw_mark_palette_dirty();
}

// ========== Trampolim de callbacks ==========

thread_local! {
    static ACTIVE: Cell<Option<NonNull<dyn Platform>>> = const { Cell::new(None) };
}

/// Restaura a plataforma anterior ao sair do escopo (chamadas aninhadas)
struct ActiveGuard(Option<NonNull<dyn Platform>>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE.with(|active| active.set(self.0));
    }
}

/// Executa `f` com `platform` como destino dos callbacks do core
fn with_platform<R>(platform: &mut dyn Platform, f: impl FnOnce() -> R) -> R {
    let ptr = NonNull::from(platform);
    // SAFETY: só o tempo de vida do trait object muda; o guard remove o
    // ponteiro antes que o empréstimo termine.
    let ptr: NonNull<dyn Platform> = unsafe { std::mem::transmute(ptr) };
    let _guard = ActiveGuard(ACTIVE.with(|active| active.replace(Some(ptr))));
    f()
}

fn dispatch(callback: &str, f: impl FnOnce(&mut dyn Platform)) {
    match ACTIVE.with(|active| active.get()) {
        // SAFETY: o ponteiro é válido enquanto `with_platform` estiver na pilha
        Some(mut platform) => f(unsafe { platform.as_mut() }),
        None => warn!("{} fora de uma chamada ao core, ignorado", callback),
    }
}

// ========== Renderer ==========

/// Configuração do renderer do core (globais de `draw.c`)
#[derive(Debug, Default)]
pub struct PicoDraw;

impl Draw for PicoDraw {
    fn set_out_format(&mut self, format: PixelFormat, line_mode_32x: bool) {
        unsafe { PicoDrawSetOutFormat(format as c_int, line_mode_32x as c_int) };
    }

    fn set_out_buf(&mut self, out: OutBuf) {
        unsafe { PicoDrawSetOutBuf(out.ptr().as_ptr() as *mut c_void, out.pitch() as c_int) };
    }

    fn mark_palette_dirty(&mut self) {
        unsafe { pw_mark_palette_dirty() };
    }
}

// ========== Core ==========

/// O core PicoDrive. O estado vive em globais do C, então só existe um.
#[derive(Debug, Default)]
pub struct PicoDrive {
    draw: PicoDraw,
}

impl PicoDrive {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Core for PicoDrive {
    fn init(&mut self) {
        unsafe { PicoInit() };
    }

    fn exit(&mut self) {
        unsafe { PicoExit() };
    }

    fn options(&self) -> PicoOpt {
        PicoOpt::from_bits_retain(unsafe { pw_get_options() })
    }

    fn set_options(&mut self, opts: PicoOpt) {
        unsafe { pw_set_options(opts.bits()) };
    }

    fn set_region_override(&mut self, code: u32) {
        unsafe { pw_set_region_override(code) };
    }

    fn set_auto_region_order(&mut self, order: u32) {
        unsafe { pw_set_auto_region_order(order) };
    }

    fn bind_sound(&mut self, rate: u32, out: SoundOut) {
        unsafe { pw_bind_sound(rate as c_int, out.ptr().as_ptr()) };
    }

    fn set_input_device(&mut self, port: usize, device: InputDevice) {
        unsafe { PicoSetInputDevice(port as c_int, device as c_int) };
    }

    fn draw(&mut self) -> &mut dyn Draw {
        &mut self.draw
    }

    fn load_media(
        &mut self,
        filename: &str,
        rom: &[u8],
        carthw_cfg: &str,
        platform: &mut dyn Platform,
    ) -> Result<MediaType, CoreError> {
        let filename = CString::new(filename.replace('\0', "")).map_err(|_| CoreError::Media(0))?;
        let carthw_cfg = CString::new(carthw_cfg.replace('\0', "")).map_err(|_| CoreError::Media(0))?;
        let size = c_uint::try_from(rom.len()).map_err(|_| CoreError::Media(0))?;

        let raw = with_platform(platform, || unsafe {
            pw_load_media(filename.as_ptr(), rom.as_ptr(), size, carthw_cfg.as_ptr())
        });
        MediaType::from_raw(raw)
    }

    fn cart_unload(&mut self) {
        unsafe { PicoCartUnload() };
    }

    fn loop_prepare(&mut self) {
        unsafe { PicoLoopPrepare() };
    }

    fn rerate_sound(&mut self, preserve_state: bool) {
        unsafe { PsndRerate(preserve_state as c_int) };
    }

    fn detect_region(&mut self) {
        unsafe { PicoDetectRegion() };
    }

    fn reset(&mut self, platform: &mut dyn Platform) {
        with_platform(platform, || unsafe { PicoReset() });
    }

    fn set_pad(&mut self, port: usize, buttons: u16) {
        unsafe { pw_set_pad(port as c_int, buttons) };
    }

    fn frame(&mut self, platform: &mut dyn Platform) {
        with_platform(platform, || unsafe { PicoFrame() });
    }

    fn is_pal(&self) -> bool {
        unsafe { pw_is_pal() != 0 }
    }

    fn hardware(&self) -> u8 {
        unsafe { pw_hardware() }
    }

    fn additional_hw(&self) -> Pahw {
        Pahw::from_bits_retain(unsafe { pw_additional_hw() })
    }

    fn media_header(&self) -> &[u8] {
        // SAFETY: `media_id_header` é um array global de 0x100 bytes
        unsafe { std::slice::from_raw_parts(pw_media_header(), MEDIA_HEADER_LEN) }
    }

    fn startup_32x(&mut self, platform: &mut dyn Platform) {
        with_platform(platform, || unsafe { Pico32xStartup() });
    }

    fn reset_sh2s(&mut self) {
        unsafe { p32x_reset_sh2s() };
    }

    fn save_state(&mut self, io: &mut dyn StateIo) -> Result<(), CoreError> {
        let mut io = io;
        let file = &mut io as *mut &mut dyn StateIo as *mut c_void;
        let ret = unsafe { PicoStateFP(file, 1, None, Some(state_write), None, Some(state_seek)) };
        match ret {
            0 => Ok(()),
            code => Err(CoreError::State(code)),
        }
    }

    fn load_state(&mut self, io: &mut dyn StateIo, platform: &mut dyn Platform) -> Result<(), CoreError> {
        let mut io = io;
        let file = &mut io as *mut &mut dyn StateIo as *mut c_void;
        let ret = with_platform(platform, || unsafe {
            PicoStateFP(file, 0, Some(state_read), None, Some(state_eof), Some(state_seek))
        });
        match ret {
            0 => Ok(()),
            code => Err(CoreError::State(code)),
        }
    }
}

// ========== Callbacks do serializador ==========

unsafe fn state_io<'a>(file: *mut c_void) -> &'a mut dyn StateIo {
    &mut **(file as *mut &mut dyn StateIo)
}

/// Leitura; `p` nulo avança sem copiar
unsafe extern "C" fn state_read(p: *mut c_void, size: usize, n: usize, file: *mut c_void) -> usize {
    let io = state_io(file);
    let len = size.saturating_mul(n);
    if p.is_null() {
        return io.skip(len);
    }
    io.read(std::slice::from_raw_parts_mut(p as *mut u8, len))
}

unsafe extern "C" fn state_write(p: *mut c_void, size: usize, n: usize, file: *mut c_void) -> usize {
    let len = size.saturating_mul(n);
    if p.is_null() || len == 0 {
        return 0;
    }
    state_io(file).write(std::slice::from_raw_parts(p as *const u8, len))
}

unsafe extern "C" fn state_eof(file: *mut c_void) -> usize {
    state_io(file).eof() as usize
}

unsafe extern "C" fn state_seek(file: *mut c_void, offset: c_long, whence: c_int) -> c_int {
    let pos = match whence {
        libc::SEEK_SET => SeekFrom::Start(offset.max(0) as u64),
        libc::SEEK_CUR => SeekFrom::Current(offset as i64),
        libc::SEEK_END => SeekFrom::End(offset as i64),
        _ => return -1,
    };
    let pos = state_io(file).seek(pos);
    c_int::try_from(pos).unwrap_or(c_int::MAX)
}

// ========== Símbolos de plataforma exigidos pelo core ==========

#[no_mangle]
pub unsafe extern "C" fn picodrive_web_log_line(line: *const c_char) {
    if !line.is_null() {
        host_log::core_line(&CStr::from_ptr(line).to_string_lossy());
    }
}

#[no_mangle]
pub extern "C" fn picodrive_web_audio_write(len: c_int) {
    dispatch("audio_write", |platform| platform.audio_write(len.max(0) as usize));
}

#[no_mangle]
pub extern "C" fn emu_video_mode_change(start_line: c_int, line_count: c_int, start_col: c_int, col_count: c_int) {
    let mode = VideoMode::from_raw(start_line, line_count, start_col, col_count);
    dispatch("video_mode_change", |platform| platform.video_mode_change(&mut PicoDraw, mode));
}

#[no_mangle]
pub extern "C" fn emu_32x_startup() {
    dispatch("32x_startup", |platform| platform.startup_32x(&mut PicoDraw));
}

#[no_mangle]
pub extern "C" fn plat_mmap(_addr: c_ulong, size: usize, need_exec: c_int, _is_fixed: c_int) -> *mut c_void {
    mem::mmap(size, need_exec != 0)
}

#[no_mangle]
pub unsafe extern "C" fn plat_mremap(ptr: *mut c_void, old_size: usize, new_size: usize) -> *mut c_void {
    mem::mremap(ptr, old_size, new_size)
}

#[no_mangle]
pub unsafe extern "C" fn plat_munmap(ptr: *mut c_void, size: usize) {
    mem::munmap(ptr, size)
}

#[no_mangle]
pub extern "C" fn plat_mem_get_for_drc(size: usize) -> *mut c_void {
    mem::mem_for_drc(size)
}

#[no_mangle]
pub extern "C" fn plat_mem_set_exec(ptr: *mut c_void, size: usize) -> c_int {
    if mem::mem_set_exec(ptr, size) {
        0
    } else {
        -1
    }
}

#[no_mangle]
pub extern "C" fn cache_flush_d_inval_i(start: *mut c_void, end: *mut c_void) {
    mem::cache_flush(start, end)
}

#[no_mangle]
pub extern "C" fn mp3_get_bitrate(_f: *mut c_void, size: c_int) -> c_int {
    codec::mp3_get_bitrate(size.max(0) as usize)
}

#[no_mangle]
pub extern "C" fn mp3_start_play(_f: *mut c_void, pos: c_int) {
    codec::mp3_start_play(pos)
}

// Os stubs não mixam nada, então nenhuma fatia sobre o buffer é criada
#[no_mangle]
pub extern "C" fn mp3_update(_buffer: *mut c_int, _length: c_int, stereo: c_int) {
    codec::mp3_update(&mut [], stereo != 0)
}

#[no_mangle]
pub extern "C" fn ogg_get_length(_f: *mut c_void) -> c_int {
    codec::ogg_get_length()
}

#[no_mangle]
pub extern "C" fn ogg_start_play(_f: *mut c_void, sample_offset: c_int) {
    codec::ogg_start_play(sample_offset)
}

#[no_mangle]
pub extern "C" fn ogg_stop_play() {
    codec::ogg_stop_play()
}

#[no_mangle]
pub extern "C" fn ogg_update(_buffer: *mut c_int, _length: c_int, stereo: c_int) {
    codec::ogg_update(&mut [], stereo != 0)
}
