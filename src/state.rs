// picodrive-web/src/state.rs

//! Save-state codec
//!
//! The core serializes through a file-like interface of five operations
//! (read, write, skip, eof, seek). [`StateCursor`] implements that interface
//! over an in-memory byte slice; [`StateBuffer`] owns the 2 MiB region the
//! host reads saved states from and writes states to be loaded into.

use crate::error::{AdapterError, AdapterResult};
use log::debug;
use std::io::SeekFrom;

/// Largest state the adapter accepts. 32X states run to ~700 KiB
/// (256 KiB SDRAM + 256 KiB DRAM + the Mega Drive state).
pub const STATE_MAX_SIZE: usize = 2 * 1024 * 1024;

/// File-like interface the core's serializer works against.
///
/// Short transfers are reported as short counts, never as errors; the core
/// decides whether a short count is fatal.
pub trait StateIo {
    /// Copy up to `dst.len()` bytes out; returns the count copied.
    fn read(&mut self, dst: &mut [u8]) -> usize;

    /// Copy up to `src.len()` bytes in; returns the count copied.
    fn write(&mut self, src: &[u8]) -> usize;

    /// Advance the position by `len` without transferring; returns `len`.
    fn skip(&mut self, len: usize) -> usize;

    fn eof(&self) -> bool;

    /// Reposition; returns the new position.
    fn seek(&mut self, pos: SeekFrom) -> usize;
}

/// In-memory cursor `{ base, size, pos }` over a state buffer.
#[derive(Debug)]
pub struct StateCursor<'a> {
    data: &'a mut [u8],
    pos: usize,
}

impl<'a> StateCursor<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}

impl StateIo for StateCursor<'_> {
    fn read(&mut self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.remaining());
        if n == 0 {
            return 0;
        }
        dst[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        n
    }

    fn write(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.remaining());
        if n == 0 {
            return 0;
        }
        self.data[self.pos..self.pos + n].copy_from_slice(&src[..n]);
        self.pos += n;
        n
    }

    fn skip(&mut self, len: usize) -> usize {
        self.pos = self.pos.saturating_add(len);
        len
    }

    fn eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn seek(&mut self, pos: SeekFrom) -> usize {
        let target = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(offset) => self.pos as i128 + offset as i128,
            SeekFrom::End(offset) => self.data.len() as i128 + offset as i128,
        };
        self.pos = target.clamp(0, usize::MAX as i128) as usize;
        self.pos
    }
}

/// Lazily allocated state region shared with the host.
///
/// Once allocated the region is never moved or freed, so the pointer handed
/// to the host stays valid for the rest of the process.
#[derive(Debug, Default)]
pub struct StateBuffer {
    data: Option<Box<[u8]>>,
    size: usize,
}

impl StateBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the region on first use and return all of it.
    pub fn ensure(&mut self) -> AdapterResult<&mut [u8]> {
        if self.data.is_none() {
            let mut bytes = Vec::new();
            bytes
                .try_reserve_exact(STATE_MAX_SIZE)
                .map_err(|_| AdapterError::OutOfMemory { what: "state buffer", size: STATE_MAX_SIZE })?;
            bytes.resize(STATE_MAX_SIZE, 0);
            self.data = Some(bytes.into_boxed_slice());
            debug!("State buffer allocated ({} bytes)", STATE_MAX_SIZE);
        }

        match self.data.as_deref_mut() {
            Some(data) => Ok(data),
            None => Err(AdapterError::OutOfMemory { what: "state buffer", size: STATE_MAX_SIZE }),
        }
    }

    /// Writable region for the host to place a state in; records `size`
    /// (clamped to [`STATE_MAX_SIZE`]) as the length to load.
    pub fn load_region(&mut self, size: usize) -> AdapterResult<&mut [u8]> {
        self.ensure()?;
        self.size = size.min(STATE_MAX_SIZE);
        self.ensure()
    }

    /// Bytes of the current state, if one is present.
    pub fn state(&self) -> Option<&[u8]> {
        match &self.data {
            Some(data) if self.size > 0 => Some(&data[..self.size]),
            _ => None,
        }
    }

    pub fn exists(&self) -> bool {
        self.state().is_some()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: usize) {
        self.size = size.min(STATE_MAX_SIZE);
    }

    /// Mutable view of the current state, for the load path.
    pub(crate) fn state_mut(&mut self) -> Option<&mut [u8]> {
        let size = self.size;
        match self.data.as_deref_mut() {
            Some(data) if size > 0 => Some(&mut data[..size]),
            _ => None,
        }
    }

    /// Base pointer of the region, null before the first allocation.
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ref().map_or(std::ptr::null(), |d| d.as_ptr())
    }
}
