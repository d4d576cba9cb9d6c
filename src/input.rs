// picodrive-web/src/input.rs

//! Controller input latch
//!
//! Two 16-bit button masks, one per port. The host may update them at any
//! time; they are published to the core once, immediately before each frame,
//! so the guest sees a coherent snapshot.

use bitflags::bitflags;

/// Number of controller ports
pub const PAD_COUNT: usize = 2;

bitflags! {
    /// Mega Drive pad bits (`MXYZ SACB RLDU`). These positions are part of
    /// the host ABI.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u16 {
        const UP    = 1 << 0;
        const DOWN  = 1 << 1;
        const LEFT  = 1 << 2;
        const RIGHT = 1 << 3;
        const B     = 1 << 4;
        const C     = 1 << 5;
        const A     = 1 << 6;
        const START = 1 << 7;
        const Z     = 1 << 8;
        const Y     = 1 << 9;
        const X     = 1 << 10;
        const MODE  = 1 << 11;
    }
}

/// Pending pad state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputLatch {
    pads: [u16; PAD_COUNT],
}

impl InputLatch {
    pub const fn new() -> Self {
        Self { pads: [0; PAD_COUNT] }
    }

    /// Store the mask for `pad`. Out-of-range ports are ignored.
    pub fn set(&mut self, pad: usize, mask: u16) {
        if let Some(slot) = self.pads.get_mut(pad) {
            *slot = mask;
        }
    }

    pub fn get(&self, pad: usize) -> u16 {
        self.pads.get(pad).copied().unwrap_or(0)
    }

    /// Masks to publish for the next frame, in port order.
    pub fn snapshot(&self) -> [u16; PAD_COUNT] {
        self.pads
    }
}
