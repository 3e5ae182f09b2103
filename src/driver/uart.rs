//! UART driver
//!
//! [`UartDriver`] owns up to `CHANNELS` UARTE instances, each paired with a
//! hardware byte counter, and borrows the system [`DualModeTickTimer`]. The
//! tick timer runs in active mode while any channel is open; each of its
//! overflows is the receive-idle timeout that posts
//! [`UartEvent::Received`](crate::UartEvent::Received) to a channel's queue.
//!
//! # Wiring
//!
//! | Interrupt | Call                                   |
//! |-----------|----------------------------------------|
//! | UARTEn    | [`UartDriver::on_uarte_interrupt`]`(n)`|
//! | Tick TIMER| [`DualModeTickTimer::on_interrupt`]    |
//!
//! # Example
//!
//! ```ignore
//! use ph_nrf52_uarte::{DualModeTickTimer, Nrf52UartDriver, UartConfig, Pin};
//!
//! static TICK: DualModeTickTimer<'static, Nrf52TickTimer> =
//!     DualModeTickTimer::new(Nrf52TickTimer::new(TIMER0_BASE, 6));
//!
//! // `OsRawMutex` wraps the RTOS mutex (`lock_api::RawMutex`)
//! let driver: &'static Nrf52UartDriver<'static, OsRawMutex> =
//!     Box::leak(Box::new(Nrf52UartDriver::nrf52840(&TICK)));
//! TICK.start()?;
//!
//! let config = UartConfig::new(Pin::new(6)?, Pin::new(8)?)
//!     .with_rts(Pin::new(5)?)
//!     .with_cts(Pin::new(7)?);
//! let queue = driver.init(0, config)?;
//! driver.write(0, b"AT\r\n")?;
//! ```

use crate::driver::channel::{Channel, ChannelStats};
use crate::driver::config::{State, UartConfig};
use crate::driver::error::{Error, Result};
use crate::driver::interrupt::InterruptStatus;
use crate::hal::counter::ByteCounter;
use crate::hal::gpio::PinConfig;
use crate::hal::timer::TickTimerHw;
use crate::hal::uarte::{InterruptSource, Uarte};
use crate::internal::constants::TRACE_DEPTH;
use crate::sync::{EventQueue, RawMutex};
use crate::tick::{DualModeTickTimer, OverflowHandler};
use crate::trace::TraceLog;

/// A UARTE instance and the counter that counts its received bytes
pub struct UartResources<U, C> {
    /// The peripheral
    pub uarte: U,
    /// Its byte counter
    pub counter: C,
}

impl<U, C> UartResources<U, C> {
    /// Pair a UARTE with its counter
    pub const fn new(uarte: U, counter: C) -> Self {
        Self { uarte, counter }
    }
}

/// Multi-channel UART driver.
///
/// # Type Parameters
///
/// * `U` - UARTE peripheral
/// * `C` - byte counter
/// * `T` - tick timer hardware
/// * `G` - GPIO collaborator
/// * `M` - raw mutex serializing tasks on one channel, normally the RTOS
///   mutex from the porting layer
/// * `CHANNELS` - number of UART channels
/// * `QUEUE_DEPTH` - events per channel queue
pub struct UartDriver<'a, U, C, T, G, M, const CHANNELS: usize, const QUEUE_DEPTH: usize>
where
    T: TickTimerHw,
{
    timer: &'a DualModeTickTimer<'a, T>,
    gpio: G,
    channels: [Channel<U, C, M, QUEUE_DEPTH>; CHANNELS],
}

impl<'a, U, C, T, G, M, const CHANNELS: usize, const QUEUE_DEPTH: usize>
    UartDriver<'a, U, C, T, G, M, CHANNELS, QUEUE_DEPTH>
where
    T: TickTimerHw,
    M: RawMutex,
{
    /// Create a driver with every channel closed
    pub fn new(
        timer: &'a DualModeTickTimer<'a, T>,
        gpio: G,
        resources: [UartResources<U, C>; CHANNELS],
    ) -> Self {
        let mut id = 0u8;
        let channels = resources.map(|r| {
            let channel = Channel::new(id, r.uarte, r.counter);
            id = id.wrapping_add(1);
            channel
        });
        Self {
            timer,
            gpio,
            channels,
        }
    }

    fn channel(&self, channel: usize) -> Result<&Channel<U, C, M, QUEUE_DEPTH>> {
        self.channels.get(channel).ok_or(Error::InvalidParameter)
    }

    /// The tick timer this driver drives
    pub fn timer(&self) -> &'a DualModeTickTimer<'a, T> {
        self.timer
    }

    /// Number of channels
    pub const fn channel_count(&self) -> usize {
        CHANNELS
    }

    /// Whether `channel` is open
    pub fn state(&self, channel: usize) -> State {
        self.channels
            .get(channel)
            .map_or(State::Closed, Channel::state)
    }

    /// Configuration `channel` was opened with
    pub fn config(&self, channel: usize) -> Option<UartConfig> {
        self.channels.get(channel).and_then(Channel::config)
    }

    /// The event queue of an open channel
    pub fn event_queue(&self, channel: usize) -> Result<&EventQueue<QUEUE_DEPTH>> {
        let ch = self.channel(channel)?;
        if !ch.is_open() {
            return Err(Error::NotInitialised);
        }
        Ok(ch.queue())
    }

    /// Counters of `channel` since it was last opened
    pub fn stats(&self, channel: usize) -> Result<ChannelStats> {
        self.channel(channel).map(Channel::stats)
    }

    /// Pipeline trace of `channel` (empty unless the `trace` feature is on)
    pub fn trace(&self, channel: usize) -> Result<&TraceLog<TRACE_DEPTH>> {
        self.channel(channel).map(Channel::trace)
    }

    /// The UARTE behind `channel`
    pub fn uarte(&self, channel: usize) -> Result<&U> {
        self.channel(channel).map(Channel::uarte)
    }

    fn any_open(&self) -> bool {
        self.channels.iter().any(Channel::is_open)
    }

    #[cfg(test)]
    pub(crate) fn needs_notify(&self, channel: usize) -> bool {
        self.channels[channel].needs_notify()
    }

    #[cfg(test)]
    pub(crate) fn start_count(&self, channel: usize) -> u32 {
        self.channels[channel].start_count()
    }
}

impl<'a, U, C, T, G, M, const CHANNELS: usize, const QUEUE_DEPTH: usize>
    UartDriver<'a, U, C, T, G, M, CHANNELS, QUEUE_DEPTH>
where
    U: Uarte + InterruptSource + Sync + 'a,
    C: ByteCounter + Sync + 'a,
    T: TickTimerHw + Sync + 'a,
    G: PinConfig + Sync + 'a,
    M: RawMutex + Sync + 'a,
{
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open `channel` and return its event queue.
    ///
    /// The first open channel registers the driver as the tick overflow
    /// handler and switches the tick timer to active mode. Opening an open
    /// channel returns its queue unchanged.
    ///
    /// Init and deinit must not run concurrently with each other.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] - unknown channel or bad configuration
    /// - [`Error::PlatformError`] - byte counter link unavailable
    /// - [`Error::OutOfMemory`] - receive ring could not be allocated
    pub fn init(&'a self, channel: usize, config: UartConfig) -> Result<&'a EventQueue<QUEUE_DEPTH>> {
        let ch = self.channel(channel)?;
        if ch.is_open() {
            return Ok(ch.queue());
        }
        config.validate()?;
        if !self.timer.is_running() {
            self.timer.start()?;
        }

        let first = !self.any_open();
        ch.open(&config, &self.gpio)?;

        if first {
            self.timer.set_overflow_handler(Some(self));
            self.timer.enter_active_mode();
        }
        Ok(ch.queue())
    }

    /// Close `channel`. The last channel to close puts the tick timer back
    /// in normal mode. Closing a closed channel is not an error.
    pub fn deinit(&'a self, channel: usize) -> Result<()> {
        let ch = self.channel(channel)?;
        if !ch.is_open() {
            return Ok(());
        }
        ch.close(&self.gpio);

        if !self.any_open() {
            self.timer.set_overflow_handler(None);
            self.timer.exit_active_mode();
        }
        Ok(())
    }

    // =========================================================================
    // Data Path
    // =========================================================================

    /// Copy up to `buf.len()` received bytes into `buf`; returns the count,
    /// 0 if nothing is waiting. Never blocks on data.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] - unknown channel or empty `buf`
    /// - [`Error::NotInitialised`] - channel closed
    pub fn read(&self, channel: usize, buf: &mut [u8]) -> Result<usize> {
        self.channel(channel)?.read(buf)
    }

    /// Transmit `data`, blocking until it is on the wire; returns the count
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] - unknown channel
    /// - [`Error::NotInitialised`] - channel closed
    /// - [`Error::OutOfMemory`] - `data` needed staging and RAM ran out
    pub fn write(&self, channel: usize, data: &[u8]) -> Result<usize> {
        self.channel(channel)?.write(data)
    }

    /// Bytes waiting to be read on `channel`, without consuming them. A
    /// result of 0 arms the next receive notification.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] - unknown channel
    /// - [`Error::NotInitialised`] - channel closed
    pub fn receive_size(&self, channel: usize) -> Result<usize> {
        self.channel(channel)?.receive_size()
    }

    /// Whether `channel` is open with an RTS pin
    pub fn is_rts_flow_control_enabled(&self, channel: usize) -> bool {
        self.channels
            .get(channel)
            .is_some_and(Channel::rts_enabled)
    }

    /// Whether `channel` is open with a CTS pin
    pub fn is_cts_flow_control_enabled(&self, channel: usize) -> bool {
        self.channels
            .get(channel)
            .is_some_and(Channel::cts_enabled)
    }

    // =========================================================================
    // Interrupt Entry Points
    // =========================================================================

    /// UARTE interrupt handler for `channel`
    pub fn on_uarte_interrupt(&self, channel: usize) -> InterruptStatus {
        self.channels
            .get(channel)
            .map(Channel::on_interrupt)
            .unwrap_or_default()
    }

    /// Run the idle check on every open channel; returns how many events were
    /// posted. Called from the tick overflow.
    pub fn on_idle_tick(&self) -> usize {
        self.channels
            .iter()
            .filter(|ch| ch.on_idle_tick())
            .count()
    }
}

impl<'a, U, C, T, G, M, const CHANNELS: usize, const QUEUE_DEPTH: usize> OverflowHandler
    for UartDriver<'a, U, C, T, G, M, CHANNELS, QUEUE_DEPTH>
where
    U: Uarte + InterruptSource + Sync + 'a,
    C: ByteCounter + Sync + 'a,
    T: TickTimerHw + Sync + 'a,
    G: PinConfig + Sync + 'a,
    M: RawMutex + Sync + 'a,
{
    fn on_overflow(&self) {
        self.on_idle_tick();
    }
}

// =============================================================================
// nRF52840
// =============================================================================

#[cfg(feature = "nrf52840")]
mod nrf52840 {
    use super::{UartDriver, UartResources};
    use crate::hal::nrf52::{Nrf52ByteCounter, Nrf52Gpio, Nrf52TickTimer, Nrf52Uarte};
    use crate::internal::constants::{DEFAULT_EVENT_QUEUE_DEPTH, UARTE_COUNT};
    use crate::internal::register::timer::{TIMER1_BASE, TIMER2_BASE};
    use crate::sync::RawMutex;
    use crate::tick::DualModeTickTimer;

    /// Both nRF52840 UARTEs with the default queue depth, locked by `M`
    pub type Nrf52UartDriver<'a, M> = UartDriver<
        'a,
        Nrf52Uarte,
        Nrf52ByteCounter,
        Nrf52TickTimer,
        Nrf52Gpio,
        M,
        UARTE_COUNT,
        DEFAULT_EVENT_QUEUE_DEPTH,
    >;

    impl<'a, M: RawMutex> Nrf52UartDriver<'a, M> {
        /// UARTE0 counted by TIMER1 over PPI channel 0, UARTE1 by TIMER2
        /// over PPI channel 1
        pub fn nrf52840(timer: &'a DualModeTickTimer<'a, Nrf52TickTimer>) -> Self {
            Self::new(
                timer,
                Nrf52Gpio,
                [
                    UartResources::new(Nrf52Uarte::uarte0(), Nrf52ByteCounter::new(TIMER1_BASE, 0)),
                    UartResources::new(Nrf52Uarte::uarte1(), Nrf52ByteCounter::new(TIMER2_BASE, 1)),
                ],
            )
        }
    }
}

#[cfg(feature = "nrf52840")]
pub use nrf52840::Nrf52UartDriver;

// =============================================================================
// Tests
// =============================================================================
