//! Hardware byte counter
//!
//! EasyDMA only reports completion per sub-buffer. A timer in counter mode,
//! clocked by the UARTE `RXDRDY` event through an event link, counts every
//! byte as it arrives so the driver can see partial sub-buffers.
//!
//! Counts are width-`W` values that wrap; [`bytes_available`] and
//! [`advance_count`] do the modular arithmetic.

use crate::driver::error::Result;

/// Free-running per-byte counter
pub trait ByteCounter {
    /// Counter width in bits (at most 32)
    const WIDTH_BITS: u32;

    /// Clear the counter, link it to the event register at `event_address`
    /// and start counting
    ///
    /// Fails with [`Error::PlatformError`](crate::Error::PlatformError) when
    /// the link cannot be made (no free channel, peripheral busy).
    fn start(&self, event_address: usize) -> Result<()>;

    /// Snapshot of the count (one capture and one register read)
    fn capture(&self) -> u32;

    /// Stop counting and release the event link
    fn stop(&self);
}

/// Mask covering a `width`-bit count
#[inline(always)]
pub const fn count_mask(width: u32) -> u32 {
    if width >= 32 {
        u32::MAX
    } else {
        (1u32 << width) - 1
    }
}

/// Bytes between `start` and `end` on a `width`-bit counter
///
/// `end < start` is treated as a single wrap of the counter.
#[inline]
pub const fn bytes_available(start: u32, end: u32, width: u32) -> usize {
    let mask = count_mask(width);
    let (start, end) = (start & mask, end & mask);
    if end >= start {
        (end - start) as usize
    } else {
        // (2^W - start) + end without overflowing at W = 32
        ((mask - start) as usize) + 1 + end as usize
    }
}

/// Advance a `width`-bit count by `n`, wrapping
#[inline]
pub const fn advance_count(count: u32, n: usize, width: u32) -> u32 {
    count.wrapping_add(n as u32) & count_mask(width)
}

/// Availability clamped to ring capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Availability {
    /// Bytes the consumer may read (at most the capacity)
    pub bytes: usize,
    /// Bytes already overwritten because the consumer fell behind
    pub lost: usize,
}

impl Availability {
    /// Compute availability for a ring of `capacity` bytes
    #[inline]
    pub const fn new(start: u32, end: u32, width: u32, capacity: usize) -> Self {
        let raw = bytes_available(start, end, width);
        if raw > capacity {
            Self {
                bytes: capacity,
                lost: raw - capacity,
            }
        } else {
            Self { bytes: raw, lost: 0 }
        }
    }

    /// Whether the ring wrapped under the consumer
    #[inline(always)]
    pub const fn overrun(&self) -> bool {
        self.lost > 0
    }
}

// =============================================================================
// Tests
// =============================================================================
