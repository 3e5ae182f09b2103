//! Hardware Abstraction Layer
//!
//! Traits for every hardware touch point of the receive pipeline, so the
//! driver logic runs unchanged against the real peripherals or host mocks.
//!
//! # Modules
//!
//! - [`uarte`]: UART with EasyDMA and its interrupt line
//! - [`counter`]: Per-byte hardware counter and its wraparound arithmetic
//! - [`timer`]: Periodic overflow timer behind the tick
//! - [`gpio`]: Pin configuration collaborator
//! - `nrf52`: Register-level implementations for the nRF52840
//!
//! # Delay Integration
//!
//! Blocking queue waits use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL.

pub mod counter;
pub mod gpio;
pub mod timer;
pub mod uarte;

#[cfg(feature = "nrf52840")]
#[cfg_attr(docsrs, doc(cfg(feature = "nrf52840")))]
pub mod nrf52;

// Re-export commonly used types
pub use counter::{Availability, ByteCounter, advance_count, bytes_available};
pub use gpio::{PinConfig, Pull};
pub use timer::TickTimerHw;
pub use uarte::{InterruptSource, UartPins, Uarte, UarteTask};

/// UARTE event masks accepted by [`Uarte`] event and interrupt methods
pub mod events {
    pub use crate::internal::register::uarte::{
        INT_ALL, INT_CTS, INT_ENDRX, INT_ENDTX, INT_ERROR, INT_NCTS, INT_RXDRDY, INT_RXSTARTED,
        INT_RXTO, INT_TXDRDY, INT_TXSTARTED, INT_TXSTOPPED, SHORTS_ENDRX_STARTRX,
        SHORTS_ENDRX_STOPRX,
    };
}
