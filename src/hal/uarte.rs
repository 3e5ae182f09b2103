//! UARTE peripheral abstraction
//!
//! The driver talks to the peripheral only through [`Uarte`] and
//! [`InterruptSource`]. Methods take `&self` because they model register
//! writes: the ISR and task context share one handle.
//!
//! Events are passed as `INTEN`-style bit masks (the `INT_*` constants in
//! [`events`](crate::hal::events)), so one call can check or clear several
//! events.

use crate::driver::config::{BaudRate, Pin};
use crate::internal::constants::{DATA_RAM_END, DATA_RAM_START};

/// UARTE tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UarteTask {
    /// Start the receiver with the latched RX pointer
    StartRx,
    /// Stop the receiver (produces RXTO)
    StopRx,
    /// Start transmitting the latched TX buffer
    StartTx,
    /// Stop the transmitter (produces TXSTOPPED)
    StopTx,
    /// Flush the RX FIFO into the RX buffer
    FlushRx,
}

/// Pins currently routed to the peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartPins {
    /// Transmit
    pub tx: Option<Pin>,
    /// Receive
    pub rx: Option<Pin>,
    /// Clear to send
    pub cts: Option<Pin>,
    /// Request to send
    pub rts: Option<Pin>,
}

impl UartPins {
    /// Every connected pin
    pub fn iter(&self) -> impl Iterator<Item = Pin> {
        [self.tx, self.rx, self.cts, self.rts].into_iter().flatten()
    }
}

/// Whether `data` lies entirely inside data RAM
pub fn in_data_ram(data: &[u8]) -> bool {
    let start = data.as_ptr() as usize;
    (DATA_RAM_START..DATA_RAM_END).contains(&start) && start + data.len() <= DATA_RAM_END
}

/// UART with EasyDMA
pub trait Uarte {
    /// Set baud rate and hardware flow control
    fn configure(&self, baud_rate: BaudRate, hardware_flow_control: bool);

    /// Route pins; `None` leaves the signal disconnected
    fn set_pins(&self, pins: UartPins);

    /// Read the pin routing back
    fn pins(&self) -> UartPins;

    /// Enable the peripheral
    fn enable(&self);

    /// Disable the peripheral
    fn disable(&self);

    /// Trigger a task
    fn trigger(&self, task: UarteTask);

    /// Subset of `mask` whose events are set
    fn pending_events(&self, mask: u32) -> u32;

    /// Clear the events in `mask`
    fn clear_events(&self, mask: u32);

    /// Enable interrupts for the events in `mask`
    fn enable_interrupts(&self, mask: u32);

    /// Disable interrupts for the events in `mask`
    fn disable_interrupts(&self, mask: u32);

    /// Enable the shortcuts in `mask`
    fn enable_shorts(&self, mask: u32);

    /// Disable the shortcuts in `mask`
    fn disable_shorts(&self, mask: u32);

    /// Latch the next receive target (takes effect at the next STARTRX)
    fn set_rx_buffer(&self, ptr: *mut u8, len: usize);

    /// Latch the transmit source
    fn set_tx_buffer(&self, ptr: *const u8, len: usize);

    /// Read and clear the line error source
    fn take_error_source(&self) -> u32;

    /// Address of the per-byte `RXDRDY` event, for the byte counter link
    fn rx_ready_event_address(&self) -> usize;

    /// Whether EasyDMA can read `data` in place
    ///
    /// EasyDMA only reaches data RAM; buffers in flash must be copied.
    fn is_dma_capable(&self, data: &[u8]) -> bool {
        in_data_ram(data)
    }

    /// Block until every event in `mask` is set
    ///
    /// Bounded by the hardware (one transfer or one stop sequence), not by
    /// user time.
    fn wait_for(&self, mask: u32) {
        while self.pending_events(mask) != mask {
            core::hint::spin_loop();
        }
    }
}

/// Interrupt line of a peripheral
pub trait InterruptSource {
    /// Interrupt number in the vector table
    fn irq_number(&self) -> u8;

    /// Enable the line at `priority`
    fn enable_irq(&self, priority: u8);

    /// Disable the line
    fn disable_irq(&self);
}
