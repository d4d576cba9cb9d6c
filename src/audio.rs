// picodrive-web/src/audio.rs

//! Saída de áudio.
//! PCM 16-bit com sinal, estéreo intercalado, 44.1 kHz. O core escreve no
//! buffer e chama `audio_write` com o tamanho em bytes; o sink expõe a fatia
//! ao host sem copiar, reamostrar ou enfileirar.

use crate::core::SoundOut;
use crate::platform::HostSinks;
use log::{trace, warn};
use std::ptr::NonNull;

/// Taxa de amostragem entregue ao host
pub const SND_RATE: u32 = 44_100;

/// Frames estéreo comportados: o dobro de um frame PAL (50 Hz)
pub const SND_MAX_FRAMES: usize = (SND_RATE / 50) as usize * 2;

/// Capacidade do buffer em amostras `i16` (dois canais por frame)
pub const SND_BUFFER_LEN: usize = SND_MAX_FRAMES * 2;

/// Sink de áudio
pub struct AudioSink {
    buffer: Box<[i16]>,     // Endereço estável, registrado no core
    last_len: usize,        // Amostras `i16` entregues no último write
}

impl AudioSink {
    pub fn new() -> Self {
        Self {
            buffer: vec![0i16; SND_BUFFER_LEN].into_boxed_slice(),
            last_len: 0,
        }
    }

    /// Registro do buffer para o core
    pub fn sound_out(&mut self) -> SoundOut {
        let ptr = NonNull::from(&mut *self.buffer).cast::<i16>();
        SoundOut::new(ptr, self.buffer.len())
    }

    /// Zera o buffer (troca de jogo / região)
    pub fn clear(&mut self) {
        self.buffer.fill(0);
        self.last_len = 0;
    }

    /// Callback "amostras prontas": `len_bytes / 4` frames estéreo no início
    /// do buffer.
    pub fn write(&mut self, len_bytes: usize, host: &HostSinks) -> &[i16] {
        let frames = len_bytes / 4;
        let mut len = frames * 2;
        if len > self.buffer.len() {
            warn!("audio_write além do buffer: {} bytes", len_bytes);
            len = self.buffer.len();
        }
        trace!("audio_write: {} frames", len / 2);

        self.last_len = len;
        let samples = &self.buffer[..len];
        host.notify_audio(samples);
        samples
    }

    /// Amostras entregues no último `write`
    pub fn last_samples(&self) -> &[i16] {
        &self.buffer[..self.last_len]
    }

    pub fn as_ptr(&self) -> *const i16 {
        self.buffer.as_ptr()
    }
}

impl Default for AudioSink {
    fn default() -> Self {
        Self::new()
    }
}
