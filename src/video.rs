// picodrive-web/src/video.rs

//! Saída de vídeo.
//! Framebuffer fixo de 320x240 em RGB555, geometria ativa variável por modo
//! (H32/H40, PAL/NTSC, overlay 32X) e protocolo de troca de modo.

use crate::core::{Draw, OutBuf, PixelFormat, VideoMode};
use crate::platform::HostSinks;
use log::debug;
use std::ptr::NonNull;

/// Largura máxima do framebuffer (H40)
pub const VOUT_MAX_WIDTH: usize = 320;

/// Altura máxima do framebuffer (PAL 240 linhas)
pub const VOUT_MAX_HEIGHT: usize = 240;

/// Tamanho do framebuffer em pixels
pub const VOUT_PIXELS: usize = VOUT_MAX_WIDTH * VOUT_MAX_HEIGHT;

/// Sink de vídeo
pub struct VideoSink {
    framebuffer: Box<[u16]>,    // Nunca realocado: o endereço é ABI
    width: usize,
    height: usize,
    offset: usize,              // Offset em bytes do início da área visível
    last_mode: Option<VideoMode>,
}

impl VideoSink {
    /// Cria o sink com a geometria máxima
    pub fn new() -> Self {
        Self {
            framebuffer: vec![0u16; VOUT_PIXELS].into_boxed_slice(),
            width: VOUT_MAX_WIDTH,
            height: VOUT_MAX_HEIGHT,
            offset: 0,
            last_mode: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Offset em bytes da área visível dentro do framebuffer
    pub fn visible_offset(&self) -> usize {
        self.offset
    }

    /// Pitch atual em bytes (sem padding entre linhas)
    pub fn pitch(&self) -> usize {
        self.width * 2
    }

    /// Registro do framebuffer para o core com o pitch atual
    pub fn out_buf(&mut self) -> OutBuf {
        let base = NonNull::from(&mut *self.framebuffer).cast::<u16>();
        OutBuf::new(base, self.pitch())
    }

    /// Endereço base do framebuffer
    pub fn base_ptr(&self) -> *const u16 {
        self.framebuffer.as_ptr()
    }

    /// Ponteiro para o primeiro pixel visível, recalculado a cada chamada
    pub fn visible_ptr(&self) -> *const u16 {
        // `offset` é sempre par: largura * linha * 2
        self.framebuffer.as_ptr().wrapping_add(self.offset / 2)
    }

    /// Área visível: `width * height` pixels a partir do offset
    pub fn visible(&self) -> &[u16] {
        let start = self.offset / 2;
        let end = (start + self.width * self.height).min(VOUT_PIXELS);
        &self.framebuffer[start..end]
    }

    /// Bytes da área visível (RGB555 little-endian no host wasm)
    pub fn visible_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.visible())
    }

    /// Protocolo de troca de modo, chamado pelo core quando o VDP é
    /// reprogramado.
    pub fn mode_change(&mut self, draw: &mut dyn Draw, mode: VideoMode, host: &HostSinks) {
        self.last_mode = Some(mode);

        self.width = mode.col_count.clamp(1, VOUT_MAX_WIDTH);
        self.height = mode.line_count;

        // Limpa o buffer inteiro (evita fantasmas de retângulos maiores)
        self.framebuffer.fill(0);

        let out = self.out_buf();
        draw.set_out_buf(out);

        // Sanidade: o core deve respeitar o envelope de 320x240
        let max_offset = self.width * (VOUT_MAX_HEIGHT - 1) * 2;
        self.offset = self
            .width
            .saturating_mul(mode.start_line)
            .saturating_mul(2)
            .min(max_offset);
        let rows_left = VOUT_MAX_HEIGHT - self.offset / self.pitch();
        self.height = self.height.clamp(1, rows_left);

        debug!(
            "Modo de vídeo: {}x{} (linha inicial {}, coluna inicial {})",
            self.width, self.height, mode.start_line, mode.start_col
        );

        host.notify_video_mode(self.width, self.height);

        // Força conversão completa da paleta no próximo frame
        draw.mark_palette_dirty();
    }

    /// Re-registro após a partida do 32X: o registro do framebuffer é
    /// perdido e precisa ser refeito junto com a troca de formato.
    pub fn startup_32x(&mut self, draw: &mut dyn Draw, host: &HostSinks) {
        draw.set_out_format(PixelFormat::Rgb555, false);

        match self.last_mode {
            Some(mode) => self.mode_change(draw, mode, host),
            None => {
                let out = self.out_buf();
                draw.set_out_buf(out);
            }
        }
    }

    /// Reafirma RGB555 e o registro atual do framebuffer
    pub fn bind(&mut self, draw: &mut dyn Draw) {
        draw.set_out_format(PixelFormat::Rgb555, false);
        let out = self.out_buf();
        draw.set_out_buf(out);
    }
}

impl Default for VideoSink {
    fn default() -> Self {
        Self::new()
    }
}
