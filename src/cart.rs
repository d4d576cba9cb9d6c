// picodrive-web/src/cart.rs

//! Buffer de ROM e utilitários de cartucho.
//! O host pede um buffer do tamanho da imagem, escreve os bytes e então
//! chama `load_rom`; o adapter é o único dono do buffer.

use crate::error::{AdapterError, AdapterResult};
use log::{debug, info};

/// Offset do nome doméstico dentro do cabeçalho de 256 bytes
pub const HEADER_NAME_OFFSET: usize = 0x20;

/// Tamanho do campo de nome doméstico
pub const HEADER_NAME_LEN: usize = 48;

/// Extensão que força a partida do 32X
const EXT_32X: &[u8] = b".32x";

/// Buffer de ROM do host
#[derive(Debug, Default)]
pub struct RomBuffer {
    data: Option<Box<[u8]>>,
}

impl RomBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Libera a ROM anterior e aloca `size` bytes zerados. Tamanho zero
    /// apenas libera.
    pub fn replace(&mut self, size: usize) -> AdapterResult<&mut [u8]> {
        self.release();

        if size == 0 {
            return Err(AdapterError::NoRom);
        }

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(size)
            .map_err(|_| AdapterError::OutOfMemory { what: "ROM buffer", size })?;
        bytes.resize(size, 0);
        info!("Buffer de ROM alocado: {} bytes", size);

        let data = self.data.insert(bytes.into_boxed_slice());
        Ok(&mut data[..])
    }

    /// Libera a ROM
    pub fn release(&mut self) {
        if let Some(old) = self.data.take() {
            debug!("Buffer de ROM liberado: {} bytes", old.len());
        }
    }

    /// Bytes da ROM, se houver uma não vazia
    pub fn as_slice(&self) -> Option<&[u8]> {
        self.data.as_deref().filter(|d| !d.is_empty())
    }

    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Nome doméstico (offset 0x20, 48 bytes) do cabeçalho, sem espaços à
/// direita. Um NUL encerra o nome.
pub fn domestic_name(header: &[u8]) -> &[u8] {
    let field = header
        .get(HEADER_NAME_OFFSET..)
        .map(|h| &h[..h.len().min(HEADER_NAME_LEN)])
        .unwrap_or(&[]);

    let field = match field.iter().position(|&b| b == 0) {
        Some(nul) => &field[..nul],
        None => field,
    };

    let end = field.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
    &field[..end]
}

/// Heurística do 32X: algumas imagens não se identificam no cabeçalho, então
/// a extensão `.32x` (sem diferenciar maiúsculas) força a partida do 32X.
pub fn wants_32x_startup(filename: &str) -> bool {
    let name = filename.as_bytes();
    name.len() >= EXT_32X.len() && name[name.len() - EXT_32X.len()..].eq_ignore_ascii_case(EXT_32X)
}
