//! Interrupt status handling for the UARTE.
//!
//! This module provides the [`InterruptStatus`] structure for parsing the
//! event bits the receive interrupt handler cares about.

use crate::internal::register::uarte::{
    INT_ENDRX, INT_ENDTX, INT_ERROR, INT_RXSTARTED, INT_RXTO, INT_TXSTOPPED,
};

/// Interrupts enabled while a channel is open
pub const RX_INTERRUPTS: u32 = INT_RXSTARTED | INT_ENDRX | INT_ERROR;

/// Events the interrupt handler reads and clears
pub const SERVICED_EVENTS: u32 = RX_INTERRUPTS | INT_RXTO;

// =============================================================================
// Interrupt Status
// =============================================================================

/// UARTE event flags parsed from an event mask.
///
/// # Example
///
/// ```ignore
/// let status = InterruptStatus::from_raw(uarte.pending_events(SERVICED_EVENTS));
/// uarte.clear_events(status.to_raw());
/// if status.rx_started {
///     // program the sub-buffer after the one just latched
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    /// RX started - hardware latched RXD.PTR and wants the next target
    pub rx_started: bool,
    /// End of RX - a sub-buffer is full (informational)
    pub end_rx: bool,
    /// RX timeout - receiver stopped
    pub rx_timeout: bool,
    /// Line error (overrun, parity, framing, break)
    pub error: bool,
    /// End of TX - transmit buffer sent
    pub end_tx: bool,
    /// TX stopped
    pub tx_stopped: bool,
}

impl InterruptStatus {
    /// Create from a raw event mask
    #[inline]
    pub fn from_raw(events: u32) -> Self {
        Self {
            rx_started: (events & INT_RXSTARTED) != 0,
            end_rx: (events & INT_ENDRX) != 0,
            rx_timeout: (events & INT_RXTO) != 0,
            error: (events & INT_ERROR) != 0,
            end_tx: (events & INT_ENDTX) != 0,
            tx_stopped: (events & INT_TXSTOPPED) != 0,
        }
    }

    /// Convert back to an event mask (for clearing)
    #[inline]
    pub fn to_raw(&self) -> u32 {
        let mut val = 0u32;
        if self.rx_started {
            val |= INT_RXSTARTED;
        }
        if self.end_rx {
            val |= INT_ENDRX;
        }
        if self.rx_timeout {
            val |= INT_RXTO;
        }
        if self.error {
            val |= INT_ERROR;
        }
        if self.end_tx {
            val |= INT_ENDTX;
        }
        if self.tx_stopped {
            val |= INT_TXSTOPPED;
        }
        val
    }

    /// Check if any event is set
    #[inline]
    pub fn any(&self) -> bool {
        self.to_raw() != 0
    }

    /// Check if a line error occurred
    #[inline]
    pub fn has_error(&self) -> bool {
        self.error
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
