//! Memory services for the core.
//!
//! Allocations are plain zeroed heap blocks. Executable memory is never
//! handed out: both dynamic-recompiler hooks report it as unavailable, which
//! keeps the core on its interpreter paths.

use libc::c_void;
use log::trace;
use std::ptr;

/// Zeroed block of `size` bytes. `need_exec` is ignored: the block is never
/// executable.
pub fn mmap(size: usize, need_exec: bool) -> *mut c_void {
    if need_exec {
        trace!("mmap: executable memory requested, returning plain memory");
    }
    // SAFETY: calloc accepts any size and returns null on failure.
    unsafe { libc::calloc(1, size) }
}

/// Resize a block from [`mmap`]; bytes past `old_size` are zeroed.
///
/// # Safety
/// `block` must be null or a live pointer returned by [`mmap`]/[`mremap`]
/// whose size is `old_size`.
pub unsafe fn mremap(block: *mut c_void, old_size: usize, new_size: usize) -> *mut c_void {
    let ret = libc::realloc(block, new_size);
    if !ret.is_null() && new_size > old_size {
        ptr::write_bytes((ret as *mut u8).add(old_size), 0, new_size - old_size);
    }
    ret
}

/// Release a block from [`mmap`]/[`mremap`]. Null is ignored.
///
/// # Safety
/// `block` must be null or a live pointer from [`mmap`]/[`mremap`].
pub unsafe fn munmap(block: *mut c_void, _size: usize) {
    if !block.is_null() {
        libc::free(block);
    }
}

/// Translation cache for the dynamic recompiler: never available.
pub fn mem_for_drc(_size: usize) -> *mut c_void {
    ptr::null_mut()
}

/// Mark a block executable: always refused.
pub fn mem_set_exec(_block: *mut c_void, _size: usize) -> bool {
    false
}

/// Data/instruction cache maintenance. The host keeps caches coherent.
pub fn cache_flush(_start: *mut c_void, _end: *mut c_void) {}
