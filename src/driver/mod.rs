//! Core driver components for the nRF52840 UARTE receive pipeline.
//!
//! - [`config`] - Pins, baud rate, ring geometry and the builder
//! - [`error`] - Error type, result alias and port-layer status codes
//! - [`uart`] - [`UartDriver`], the multi-channel entry point
//! - [`interrupt`] - UARTE event parsing for the interrupt handler
//!
//! # Example
//!
//! ```ignore
//! use ph_nrf52_uarte::driver::{BaudRate, Pin, UartConfig};
//!
//! let config = UartConfig::new(Pin::new(6)?, Pin::new(8)?)
//!     .with_baud_rate(BaudRate::Baud921600)
//!     .with_rx_buffer(256, 8);
//! ```

pub mod config;
pub mod error;
pub mod interrupt;
pub mod uart;

mod channel;

pub use channel::ChannelStats;
pub use config::{BaudRate, Pin, RxBufferConfig, State, UartConfig};
pub use error::{Error, Result, into_code};
pub use interrupt::InterruptStatus;
#[cfg(feature = "nrf52840")]
pub use uart::Nrf52UartDriver;
pub use uart::{UartDriver, UartResources};
