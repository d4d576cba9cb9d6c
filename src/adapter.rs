// picodrive-web/src/adapter.rs

//! Adapter: ciclo de vida e driver de frames.
//!
//! Uma única instância agrega core, ROM, sinks de vídeo/áudio, latch de
//! entrada e buffer de estado. Máquina de estados:
//!
//! ```text
//! Uninit --init--> Initialized --load_rom--> GameLoaded --exit--> Uninit
//! ```
//!
//! `load_rom` em `GameLoaded` troca o cartucho; `reset` em `GameLoaded` é um
//! auto-laço.

use crate::audio::AudioSink;
use crate::cart::{self, RomBuffer};
use crate::config::{AdapterConfig, HardwareRegion, Region};
use crate::core::{Core, Draw, MediaType, Pahw, PicoOpt, Platform, VideoMode};
use crate::error::{AdapterError, AdapterResult};
use crate::input::{InputLatch, PAD_COUNT};
use crate::platform::HostSinks;
use crate::state::{StateBuffer, StateCursor, STATE_MAX_SIZE};
use crate::video::VideoSink;
use log::{debug, info, warn};

/// Estado do ciclo de vida. `GameLoaded` implica core inicializado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninit,
    Initialized,
    GameLoaded,
}

/// Lado "plataforma" do adapter: recebe os callbacks do core.
/// Fica separado do core para que ambos possam ser emprestados ao mesmo tempo.
pub struct Frontend {
    video: VideoSink,
    audio: AudioSink,
    sinks: HostSinks,
}

impl Frontend {
    fn new() -> Self {
        Self {
            video: VideoSink::new(),
            audio: AudioSink::new(),
            sinks: HostSinks::default(),
        }
    }

    pub fn video(&self) -> &VideoSink {
        &self.video
    }
}

impl Platform for Frontend {
    fn video_mode_change(&mut self, draw: &mut dyn Draw, mode: VideoMode) {
        self.video.mode_change(draw, mode, &self.sinks);
    }

    fn startup_32x(&mut self, draw: &mut dyn Draw) {
        self.video.startup_32x(draw, &self.sinks);
    }

    fn audio_write(&mut self, len: usize) {
        self.audio.write(len, &self.sinks);
    }
}

/// Fachada do emulador
pub struct Adapter<C: Core + ?Sized = dyn Core> {
    config: AdapterConfig,
    lifecycle: Lifecycle,
    rom: RomBuffer,
    frontend: Frontend,
    input: InputLatch,
    state: StateBuffer,
    frame_count: u64,
    core: Box<C>,
}

impl<C: Core + ?Sized> Adapter<C> {
    /// Adapter com a configuração padrão
    pub fn new(core: Box<C>) -> Self {
        Self::with_config(core, AdapterConfig::default())
    }

    pub fn with_config(core: Box<C>, config: AdapterConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::Uninit,
            rom: RomBuffer::new(),
            frontend: Frontend::new(),
            input: InputLatch::new(),
            state: StateBuffer::new(),
            frame_count: 0,
            core,
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle != Lifecycle::Uninit
    }

    pub fn is_game_loaded(&self) -> bool {
        self.lifecycle == Lifecycle::GameLoaded
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    pub fn frontend(&self) -> &Frontend {
        &self.frontend
    }

    pub fn host_sinks(&self) -> HostSinks {
        self.frontend.sinks
    }

    pub fn set_host_sinks(&mut self, sinks: HostSinks) {
        self.frontend.sinks = sinks;
    }

    // ========== Ciclo de vida ==========

    /// Liga o core e empurra a configuração. Idempotente.
    pub fn init(&mut self) {
        if self.is_initialized() {
            return;
        }

        self.core.init();
        self.core.set_options(self.config.options);
        self.core.set_region_override(self.config.region_override);
        self.core.set_auto_region_order(self.config.auto_region_order.bits());

        let sound_out = self.frontend.audio.sound_out();
        self.core.bind_sound(self.config.sound_rate, sound_out);
        self.frontend.video.bind(self.core.draw());

        for port in 0..PAD_COUNT {
            self.core.set_input_device(port, self.config.pad_device);
        }

        self.lifecycle = Lifecycle::Initialized;
        info!(
            "Core inicializado (opções {:#x}, {} Hz)",
            self.config.options.bits(),
            self.config.sound_rate
        );
    }

    /// Libera a ROM e desliga o core. O buffer de estado é mantido.
    pub fn exit(&mut self) {
        self.rom.release();

        if self.is_initialized() {
            self.core.exit();
            info!("Core finalizado após {} frames", self.frame_count);
        }
        self.lifecycle = Lifecycle::Uninit;
    }

    // ========== Cartucho ==========

    /// Buffer de `size` bytes para o host escrever a ROM. Substitui a
    /// anterior.
    pub fn rom_buffer(&mut self, size: usize) -> AdapterResult<&mut [u8]> {
        self.rom.replace(size)
    }

    /// Monta a ROM do buffer. `filename` só alimenta a heurística do 32X e
    /// os logs.
    pub fn load_rom(&mut self, filename: &str) -> AdapterResult<MediaType> {
        if !self.is_initialized() {
            return Err(AdapterError::NotInitialized);
        }
        let rom = self.rom.as_slice().ok_or(AdapterError::NoRom)?;

        if self.lifecycle == Lifecycle::GameLoaded {
            self.core.cart_unload();
            self.lifecycle = Lifecycle::Initialized;
            debug!("Cartucho anterior descarregado");
        }

        // Config vazia: usa o banco interno de hardware (SVP, mappers)
        let media = self
            .core
            .load_media(filename, rom, "", &mut self.frontend)
            .map_err(AdapterError::MediaLoad)?;

        self.core.loop_prepare();

        self.frontend.audio.clear();
        self.core.rerate_sound(false);

        let mut opts = self.core.options();
        opts.remove(PicoOpt::ALT_RENDERER | PicoOpt::EN_SOFTSCALE);
        opts.insert(PicoOpt::DIS_32C_BORDER);
        self.core.set_options(opts);

        self.frontend.video.bind(self.core.draw());
        self.lifecycle = Lifecycle::GameLoaded;

        if opts.contains(PicoOpt::EN_32X)
            && !self.core.additional_hw().contains(Pahw::P32X)
            && cart::wants_32x_startup(filename)
        {
            info!("Extensão .32x: forçando partida do 32X");
            self.core.startup_32x(&mut self.frontend);
            self.core.reset_sh2s();
        }

        info!("ROM carregada: {} ({}, {} bytes)", filename, media, rom.len());
        Ok(media)
    }

    /// Reset do console. Sem jogo carregado não faz nada.
    pub fn reset(&mut self) {
        if self.is_game_loaded() {
            self.core.reset(&mut self.frontend);
            debug!("Reset");
        }
    }

    // ========== Frames ==========

    /// Guarda a máscara de botões do controle `pad` (0 ou 1)
    pub fn set_input(&mut self, pad: usize, mask: u16) {
        if pad >= PAD_COUNT {
            debug!("set_input: controle {} ignorado", pad);
        }
        self.input.set(pad, mask);
    }

    pub fn input(&self) -> &InputLatch {
        &self.input
    }

    /// Publica a entrada e emula exatamente um frame
    pub fn run_frame(&mut self) {
        if !self.is_game_loaded() {
            return;
        }

        for (port, mask) in self.input.snapshot().into_iter().enumerate() {
            self.core.set_pad(port, mask);
        }

        self.core.frame(&mut self.frontend);
        self.frame_count += 1;
    }

    /// Contador de frames (diagnóstico)
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // ========== Vídeo e áudio ==========

    pub fn video_width(&self) -> usize {
        self.frontend.video.width()
    }

    pub fn video_height(&self) -> usize {
        self.frontend.video.height()
    }

    /// Primeiro pixel visível (base + offset)
    pub fn video_ptr(&self) -> *const u16 {
        self.frontend.video.visible_ptr()
    }

    /// Retângulo visível, `width * height` pixels RGB555
    pub fn visible_frame(&self) -> &[u16] {
        self.frontend.video.visible()
    }

    pub fn frame_bytes(&self) -> &[u8] {
        self.frontend.video.visible_bytes()
    }

    /// Amostras entregues no último `audio_write`
    pub fn audio_samples(&self) -> &[i16] {
        self.frontend.audio.last_samples()
    }

    // ========== Região ==========

    pub fn is_pal(&self) -> bool {
        self.is_initialized() && self.core.is_pal()
    }

    /// Override de região: 0 auto, 1 JP NTSC, 2 JP PAL, 4 EUA, 8 Europa.
    /// Códigos desconhecidos são repassados ao core sem validação.
    pub fn set_region(&mut self, code: u32) {
        if Region::from_code(code).is_none() {
            warn!("Código de região desconhecido: {:#x}", code);
        }
        self.config.region_override = code;
        if !self.is_initialized() {
            return;
        }

        self.core.set_region_override(code);
        if self.is_game_loaded() {
            self.core.detect_region();
            self.core.loop_prepare();
            self.core.rerate_sound(false);
            info!("Região alterada para {} (PAL: {})", code, self.core.is_pal());
        }
    }

    /// Bits de região do hardware (`0xC0`)
    pub fn region(&self) -> u8 {
        if self.is_initialized() {
            self.core.hardware() & HardwareRegion::MASK
        } else {
            0
        }
    }

    pub fn hardware_region(&self) -> HardwareRegion {
        HardwareRegion::from_hardware(self.region())
    }

    /// Nome doméstico do cabeçalho; vazio sem jogo carregado
    pub fn rom_name(&self) -> &[u8] {
        if !self.is_game_loaded() {
            return &[];
        }
        cart::domestic_name(self.core.media_header())
    }

    // ========== Save states ==========

    /// Serializa a máquina no buffer de estado; retorna o tamanho gravado.
    /// Em caso de falha o tamanho anterior é mantido.
    pub fn state_save(&mut self) -> AdapterResult<usize> {
        if !self.is_game_loaded() {
            return Err(AdapterError::NoGameLoaded);
        }

        let written = {
            let mut cursor = StateCursor::new(self.state.ensure()?);
            self.core.save_state(&mut cursor)?;
            cursor.pos()
        };

        if written > STATE_MAX_SIZE {
            warn!("Estado além de {} bytes, truncado", STATE_MAX_SIZE);
        }
        self.state.set_size(written);
        info!("Estado salvo: {} bytes", self.state.size());
        Ok(self.state.size())
    }

    /// Restaura a máquina a partir dos `state_size` bytes do buffer
    pub fn state_load(&mut self) -> AdapterResult<()> {
        if !self.is_game_loaded() {
            return Err(AdapterError::NoGameLoaded);
        }

        let data = self.state.state_mut().ok_or(AdapterError::NoState)?;
        let size = data.len();
        self.core.load_state(&mut StateCursor::new(data), &mut self.frontend)?;

        info!("Estado carregado: {} bytes", size);
        Ok(())
    }

    pub fn state_exists(&self) -> bool {
        self.state.exists()
    }

    pub fn state_size(&self) -> usize {
        self.state.size()
    }

    /// Bytes do último estado salvo ou preparado para carga
    pub fn state_bytes(&self) -> Option<&[u8]> {
        self.state.state()
    }

    /// Base do buffer de estado; nulo antes da primeira alocação
    pub fn state_ptr(&self) -> *const u8 {
        self.state.as_ptr()
    }

    /// Região gravável onde o host coloca um estado de `size` bytes antes de
    /// chamar `state_load`
    pub fn state_load_buffer(&mut self, size: usize) -> AdapterResult<&mut [u8]> {
        let size = size.min(STATE_MAX_SIZE);
        let region = self.state.load_region(size)?;
        Ok(&mut region[..size])
    }
}

impl<C: Core + ?Sized> Drop for Adapter<C> {
    fn drop(&mut self) {
        if self.is_initialized() {
            self.core.exit();
        }
    }
}
