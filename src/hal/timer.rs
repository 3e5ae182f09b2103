//! Tick timer abstraction
//!
//! The hardware side of [`DualModeTickTimer`](crate::DualModeTickTimer): a
//! counter that clears itself and raises an overflow event when it reaches
//! a programmable limit.

use crate::driver::error::Result;

/// Periodic overflow timer
pub trait TickTimerHw {
    /// Counting frequency in Hz
    const TICK_HZ: u32;

    /// Configure with `limit` ticks per overflow, enable its interrupt and
    /// start counting from zero
    fn start(&self, limit: u32) -> Result<()>;

    /// Stop counting and disable the interrupt
    fn stop(&self);

    /// Hold the count
    fn pause(&self);

    /// Continue counting after [`pause`](Self::pause)
    fn resume(&self);

    /// Reset the count to zero
    fn clear(&self);

    /// Change the number of ticks per overflow
    fn set_limit(&self, limit: u32);

    /// Current count (always below the limit)
    fn capture(&self) -> u32;

    /// Whether an overflow has happened and not been acknowledged
    fn overflow_pending(&self) -> bool;

    /// Acknowledge the overflow event
    fn clear_overflow(&self);
}
