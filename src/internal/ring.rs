//! Receive ring of equal sub-buffers carved from one DMA arena.
//!
//! EasyDMA fills sub-buffers back to back, so byte `k` of the stream lands at
//! arena offset `k % capacity`. The ring only tracks which sub-buffer the
//! hardware gets next; reading is done with plain indices into the arena.

use alloc::alloc::{Layout, alloc_zeroed, dealloc};
use core::ptr::NonNull;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::driver::config::RxBufferConfig;
use crate::driver::error::{Error, Result};
use crate::internal::constants::RX_ARENA_ALIGN;

// =============================================================================
// Arena
// =============================================================================

/// Heap block handed to EasyDMA, freed on drop
struct DmaArena {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl DmaArena {
    fn try_new(len: usize) -> Result<Self> {
        let layout =
            Layout::from_size_align(len, RX_ARENA_ALIGN).map_err(|_| Error::OutOfMemory)?;
        // SAFETY: `len` is non-zero (geometry is validated before allocation).
        let raw = unsafe { alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).ok_or(Error::OutOfMemory)?;
        Ok(Self { ptr, layout })
    }
}

impl Drop for DmaArena {
    fn drop(&mut self) {
        // SAFETY: `ptr` was returned by `alloc_zeroed` with this exact layout.
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

// =============================================================================
// Sub-buffer
// =============================================================================

/// One DMA target inside the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubBuffer {
    /// Position in the ring
    pub index: usize,
    /// Start of the sub-buffer
    pub ptr: *mut u8,
    /// Length in bytes
    pub len: usize,
}

// =============================================================================
// Ring
// =============================================================================

/// Closed ring of `count` sub-buffers of `sub_buffer_size` bytes.
pub struct SubBufferRing {
    arena: DmaArena,
    sub_buffer_size: usize,
    count: usize,
    /// Next sub-buffer to hand to the hardware. Only the UARTE interrupt
    /// (and init, before interrupts are enabled) advances it.
    write_next: AtomicUsize,
}

// SAFETY: the ring exclusively owns its arena; the write cursor is atomic and
// arena bytes are only read by the single task holding the channel mutex.
unsafe impl Send for SubBufferRing {}

impl SubBufferRing {
    /// Allocate a ring with the given geometry
    ///
    /// Fails with [`Error::InvalidParameter`] for a bad geometry and
    /// [`Error::OutOfMemory`] when the arena cannot be allocated.
    pub fn try_new(geometry: RxBufferConfig) -> Result<Self> {
        geometry.validate()?;
        let arena = DmaArena::try_new(geometry.capacity())?;
        Ok(Self {
            arena,
            sub_buffer_size: geometry.sub_buffer_size,
            count: geometry.sub_buffer_count,
            write_next: AtomicUsize::new(0),
        })
    }

    /// Number of sub-buffers
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// The ring is never empty
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Bytes per sub-buffer
    #[inline(always)]
    pub const fn sub_buffer_size(&self) -> usize {
        self.sub_buffer_size
    }

    /// Total capacity in bytes
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.sub_buffer_size * self.count
    }

    /// Index of the sub-buffer the next [`advance`](Self::advance) returns
    #[inline(always)]
    pub fn next_index(&self) -> usize {
        self.write_next.load(Ordering::Acquire)
    }

    /// Get the sub-buffer at `index` (wrapping)
    #[inline]
    pub fn get(&self, index: usize) -> SubBuffer {
        let index = index % self.count;
        SubBuffer {
            index,
            // SAFETY: index < count, so the offset stays inside the arena.
            ptr: unsafe { self.arena.ptr.as_ptr().add(index * self.sub_buffer_size) },
            len: self.sub_buffer_size,
        }
    }

    /// Return the next sub-buffer and move the cursor one slot on
    ///
    /// O(1), never allocates. Called from the UARTE interrupt when the
    /// hardware has latched the previous pointer.
    #[inline]
    pub fn advance(&self) -> SubBuffer {
        let index = self.write_next.load(Ordering::Relaxed);
        self.write_next
            .store((index + 1) % self.count, Ordering::Release);
        self.get(index)
    }

    /// Rewind the cursor to the first sub-buffer
    pub fn reset(&self) {
        self.write_next.store(0, Ordering::Release);
    }

    /// Copy `dst.len()` bytes out of the arena starting at byte `offset`,
    /// wrapping at the physical end of the arena
    ///
    /// `dst` must not be longer than the capacity.
    pub fn copy_out(&self, offset: usize, dst: &mut [u8]) {
        let capacity = self.capacity();
        debug_assert!(dst.len() <= capacity);
        let offset = offset % capacity;
        let first = dst.len().min(capacity - offset);
        let base = self.arena.ptr.as_ptr();
        // SAFETY: `offset + first <= capacity` and the rest starts at 0 with
        // `dst.len() - first <= offset`; `dst` never aliases the arena.
        unsafe {
            core::ptr::copy_nonoverlapping(base.add(offset), dst.as_mut_ptr(), first);
            core::ptr::copy_nonoverlapping(
                base,
                dst.as_mut_ptr().add(first),
                dst.len() - first,
            );
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
