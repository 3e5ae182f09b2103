//! nRF52840 UARTE Receive Pipeline
//!
//! A `no_std` driver for the nRF52840 UARTE as used by a cellular modem port
//! layer: continuous EasyDMA reception into a ring of sub-buffers, a hardware
//! byte counter that makes partially filled sub-buffers visible, and an
//! idle-timeout notifier driven by the system tick.
//!
//! # Architecture
//!
//! 1. **Driver** ([`driver`]): [`UartDriver`] with init/deinit, read, write
//!    and flow-control queries per channel
//! 2. **Tick** ([`tick`]): [`DualModeTickTimer`], the millisecond clock whose
//!    short active-mode period doubles as the receive-idle timeout
//! 3. **Sync** ([`sync`]): [`EventQueue`] from interrupt to consumer task,
//!    plus the locking primitives shared by both contexts
//! 4. **HAL** ([`hal`]): traits for the UARTE, byte counter, tick timer and
//!    GPIO, with register-level nRF52840 implementations
//!
//! ## Data Flow
//!
//! ```text
//! RX pin -> UARTE -> EasyDMA -> sub-buffer ring  (UARTE ISR relatches)
//!               \-> RXDRDY -> PPI -> TIMER count (byte counter)
//! tick overflow -> idle check -> EventQueue -> consumer task -> read()
//! ```
//!
//! # Features
//!
//! - `nrf52840` (default): Register-level hardware implementations
//! - `defmt`: defmt formatting for public types and defmt logging
//! - `log`: Logging through the `log` facade
//! - `trace`: Record pipeline events in a per-channel [`TraceLog`]
//!
//! # Example
//!
//! ```ignore
//! use ph_nrf52_uarte::{DualModeTickTimer, Nrf52UartDriver, Pin, UartConfig, UartEvent};
//! use ph_nrf52_uarte::hal::nrf52::Nrf52TickTimer;
//!
//! static TICK: DualModeTickTimer<'static, Nrf52TickTimer> =
//!     DualModeTickTimer::new(Nrf52TickTimer::new(TIMER0_BASE, 6));
//!
//! TICK.start()?;
//! // `OsRawMutex`: the RTOS mutex behind `lock_api::RawMutex`
//! let driver: &'static Nrf52UartDriver<'static, OsRawMutex> =
//!     Box::leak(Box::new(Nrf52UartDriver::nrf52840(&TICK)));
//!
//! let config = UartConfig::new(Pin::new(6)?, Pin::new(8)?);
//! let queue = driver.init(0, config)?;
//! driver.write(0, b"AT+CFUN=1\r\n")?;
//!
//! let mut buf = [0u8; 128];
//! loop {
//!     match queue.receive(&mut delay) {
//!         UartEvent::Received(_) => {
//!             let n = driver.read(0, &mut buf)?;
//!             handle(&buf[..n]);
//!         }
//!         UartEvent::Shutdown => break,
//!     }
//! }
//! ```
//!
//! # Memory Requirements
//!
//! Each open channel allocates its receive ring from the global allocator
//! (default 4 x 256 bytes). Transmit buffers outside data RAM are staged
//! through a temporary allocation of at most one EasyDMA transfer.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

extern crate alloc;

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;
pub mod sync;
pub mod tick;
pub mod trace;

// Internal implementation details (pub(crate) only)
mod internal;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::ChannelStats;
pub use driver::config::{BaudRate, Pin, RxBufferConfig, State, UartConfig};
pub use driver::error::{Error, Result, into_code};
pub use driver::interrupt::InterruptStatus;
#[cfg(feature = "nrf52840")]
pub use driver::uart::Nrf52UartDriver;
pub use driver::uart::{UartDriver, UartResources};
pub use sync::{EventQueue, RawMutex, SpinRawMutex, UartEvent};
pub use tick::{DualModeTickTimer, OverflowHandler, TickMode};
pub use trace::{TraceEvent, TraceLog, TraceRecord};

/// Tunable defaults and hardware limits.
pub mod constants {
    pub use crate::internal::constants::{
        ACTIVE_MODE_WIDTH_BITS, DEFAULT_BAUD_RATE, DEFAULT_EVENT_QUEUE_DEPTH, DEFAULT_IRQ_PRIORITY,
        DEFAULT_RTS_THRESHOLD, DEFAULT_RX_BUFFER_SIZE, DEFAULT_SUB_BUFFER_COUNT,
        DEFAULT_SUB_BUFFER_SIZE, MAX_DMA_TRANSFER, MAX_PIN, MIN_SUB_BUFFER_COUNT,
        NORMAL_MODE_WIDTH_BITS, TICK_HZ, TRACE_DEPTH, UARTE_COUNT,
    };
}

/// Low-level register accessors for advanced use.
///
/// These are intentionally separated from the primary facade. Most users should
/// prefer the safe driver APIs instead of touching registers directly.
///
/// # Safety
///
/// Direct register access bypasses driver invariants. Use only if you fully
/// understand the nRF52840 UARTE, TIMER and PPI peripherals and accept
/// responsibility for correct sequencing and synchronization.
#[cfg(feature = "nrf52840")]
pub mod unsafe_registers {
    pub use crate::internal::register::nvic::Nvic;
    pub use crate::internal::register::ppi::PpiRegs;
    pub use crate::internal::register::timer::TimerRegs;
    pub use crate::internal::register::uarte::UarteRegs;
}
