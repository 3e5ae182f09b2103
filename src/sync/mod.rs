//! Synchronization and Concurrency Support
//!
//! Two execution contexts share channel state: interrupt handlers (UARTE
//! and tick) acting as the only producer, and tasks acting as consumers.
//!
//! - **Primitives** (`primitives`): [`CriticalSectionCell`] for state both
//!   contexts touch (tick accumulator, overflow handler, queue storage)
//! - **Task mutex** (`mutex`): [`TaskMutex`] serializes tasks on one channel
//!   over a [`RawMutex`] supplied by the integrator ([`SpinRawMutex`] where
//!   tasks cannot preempt each other); interrupt handlers never take it
//! - **Event queue** (`queue`): [`EventQueue`] carries [`UartEvent`]s from the
//!   tick interrupt to the consumer task
//!
//! # Example
//!
//! ```ignore
//! use ph_nrf52_uarte::sync::{EventQueue, UartEvent};
//!
//! let queue = driver.init(0, config)?;
//! loop {
//!     match queue.receive(&mut delay) {
//!         UartEvent::Received(_) => {
//!             let n = driver.read(0, &mut buf)?;
//!             at_parser.feed(&buf[..n]);
//!         }
//!         UartEvent::Shutdown => break,
//!     }
//! }
//! ```

mod mutex;
mod primitives;
mod queue;

pub use mutex::{RawMutex, SpinRawMutex, TaskMutex, TaskMutexGuard};
pub use primitives::CriticalSectionCell;
pub use queue::{EventQueue, UartEvent};
