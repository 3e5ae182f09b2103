//! One UART channel: receive ring, byte counter, notification state and
//! event queue.
//!
//! # Contexts
//!
//! | Context       | Entry point                        | Touches                          |
//! |---------------|------------------------------------|----------------------------------|
//! | UARTE ISR     | [`Channel::on_interrupt`]          | ring write cursor, stats         |
//! | Tick ISR      | [`Channel::on_idle_tick`]          | counter, `needs_notify`, queue   |
//! | Task (locked) | `read`, `receive_size`, `write`    | read cursor, `start_count`       |
//! | Task (owner)  | `open`, `close`                    | everything, interrupts disabled  |
//!
//! The ring itself is installed by `open` before the UARTE interrupt is
//! enabled and removed by `close` after it is disabled, so interrupt
//! handlers never see it change.

use alloc::vec::Vec;
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::driver::config::{State, UartConfig};
use crate::driver::error::{Error, Result};
use crate::driver::interrupt::{InterruptStatus, RX_INTERRUPTS, SERVICED_EVENTS};
use crate::hal::counter::{Availability, ByteCounter, advance_count};
use crate::hal::gpio::{PinConfig, Pull};
use crate::hal::uarte::{InterruptSource, UartPins, Uarte, UarteTask};
use crate::internal::constants::{MAX_DMA_TRANSFER, TRACE_DEPTH};
use crate::internal::register::uarte::{
    INT_ALL, INT_ENDTX, INT_RXTO, INT_TXSTOPPED, SHORTS_ENDRX_STARTRX,
};
use crate::internal::ring::SubBufferRing;
use crate::sync::{CriticalSectionCell, EventQueue, RawMutex, TaskMutex, UartEvent};
use crate::trace::{TraceEvent, TraceLog};

// =============================================================================
// Statistics
// =============================================================================

/// Per-channel counters, reset at every open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelStats {
    /// Times a reader found the ring overrun
    pub overruns: u32,
    /// Notifications posted to the queue
    pub notifications: u32,
    /// Notifications dropped because the queue was full
    pub notifications_dropped: u32,
    /// Line errors (overrun, parity, framing, break) cleared by the ISR
    pub line_errors: u32,
}

#[derive(Default)]
struct StatCounters {
    overruns: AtomicU32,
    notifications: AtomicU32,
    notifications_dropped: AtomicU32,
    line_errors: AtomicU32,
}

impl StatCounters {
    fn bump(counter: &AtomicU32) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ChannelStats {
        ChannelStats {
            overruns: self.overruns.load(Ordering::Relaxed),
            notifications: self.notifications.load(Ordering::Relaxed),
            notifications_dropped: self.notifications_dropped.load(Ordering::Relaxed),
            line_errors: self.line_errors.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        for counter in [
            &self.overruns,
            &self.notifications,
            &self.notifications_dropped,
            &self.line_errors,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

// =============================================================================
// Channel
// =============================================================================

/// Reader position, guarded by the channel mutex
#[derive(Debug, Default)]
pub(crate) struct ReadState {
    /// Arena offset of the next unread byte
    read_cursor: usize,
}

/// A UARTE instance with its byte counter and receive pipeline state.
pub(crate) struct Channel<U, C, M, const Q: usize> {
    id: u8,
    uarte: U,
    counter: C,
    open: AtomicBool,
    /// Serializes readers and writers; interrupt handlers never take it
    lock: TaskMutex<M, ReadState>,
    ring: UnsafeCell<Option<SubBufferRing>>,
    /// Counter value at the first unread byte
    start_count: AtomicU32,
    /// Consumer drained the ring and wants an event on the next arrival
    needs_notify: AtomicBool,
    config: CriticalSectionCell<Option<UartConfig>>,
    stats: StatCounters,
    queue: EventQueue<Q>,
    trace: TraceLog<TRACE_DEPTH>,
}

// SAFETY: the ring cell is only replaced by `open`/`close`, which run with the
// UARTE interrupt disabled and on the single owning task; everything else is
// atomic, critical-section protected or behind `lock`.
unsafe impl<U: Sync, C: Sync, M: Sync, const Q: usize> Sync for Channel<U, C, M, Q> {}

impl<U, C, M: RawMutex, const Q: usize> Channel<U, C, M, Q> {
    pub(crate) fn new(id: u8, uarte: U, counter: C) -> Self {
        Self {
            id,
            uarte,
            counter,
            open: AtomicBool::new(false),
            lock: TaskMutex::new(ReadState { read_cursor: 0 }),
            ring: UnsafeCell::new(None),
            start_count: AtomicU32::new(0),
            needs_notify: AtomicBool::new(false),
            config: CriticalSectionCell::new(None),
            stats: StatCounters::default(),
            queue: EventQueue::new(),
            trace: TraceLog::new(),
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub(crate) fn state(&self) -> State {
        if self.is_open() {
            State::Open
        } else {
            State::Closed
        }
    }

    pub(crate) fn queue(&self) -> &EventQueue<Q> {
        &self.queue
    }

    pub(crate) fn config(&self) -> Option<UartConfig> {
        self.config.get()
    }

    pub(crate) fn stats(&self) -> ChannelStats {
        self.stats.snapshot()
    }

    pub(crate) fn trace(&self) -> &TraceLog<TRACE_DEPTH> {
        &self.trace
    }

    pub(crate) fn uarte(&self) -> &U {
        &self.uarte
    }

    #[cfg(test)]
    pub(crate) fn needs_notify(&self) -> bool {
        self.needs_notify.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn start_count(&self) -> u32 {
        self.start_count.load(Ordering::Acquire)
    }

    fn ring(&self) -> Option<&SubBufferRing> {
        // SAFETY: only `install_ring` writes the cell, and never while a
        // reference obtained here can be live (see the `Sync` impl).
        unsafe { (*self.ring.get()).as_ref() }
    }

    fn install_ring(&self, ring: Option<SubBufferRing>) -> Option<SubBufferRing> {
        // SAFETY: called from `open`/`close` only, with the UARTE interrupt
        // disabled and no reader holding `lock`.
        unsafe { core::mem::replace(&mut *self.ring.get(), ring) }
    }
}

impl<U, C, M, const Q: usize> Channel<U, C, M, Q>
where
    U: Uarte + InterruptSource,
    C: ByteCounter,
    M: RawMutex,
{
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Bring the channel up. On failure everything acquired so far is
    /// released and the channel stays closed.
    pub(crate) fn open<G: PinConfig>(&self, config: &UartConfig, gpio: &G) -> Result<()> {
        // === STEP 1: byte counter, linked to RXDRDY ===
        self.counter.start(self.uarte.rx_ready_event_address())?;

        // === STEP 2: receive ring ===
        let ring = match SubBufferRing::try_new(config.rx_buffer) {
            Ok(ring) => ring,
            Err(e) => {
                self.counter.stop();
                return Err(e);
            }
        };

        // === STEP 3: reset pipeline state ===
        self.queue.clear();
        self.stats.reset();
        self.trace.clear();
        self.lock.lock().read_cursor = 0;
        self.start_count
            .store(self.counter.capture(), Ordering::Release);
        self.needs_notify.store(true, Ordering::Release);

        // === STEP 4: pins ===
        gpio.configure_output(config.tx, true);
        gpio.configure_input(config.rx, Pull::None);
        if let Some(cts) = config.cts {
            gpio.configure_input(cts, Pull::None);
        }
        if let Some(rts) = config.rts {
            gpio.configure_output(rts, true);
        }

        // === STEP 5: peripheral, first sub-buffer latched ===
        self.uarte
            .configure(config.baud_rate, config.hardware_flow_control());
        self.uarte.set_pins(UartPins {
            tx: Some(config.tx),
            rx: Some(config.rx),
            cts: config.cts,
            rts: config.rts,
        });
        self.uarte.enable();
        self.uarte.clear_events(INT_ALL);
        self.uarte.enable_shorts(SHORTS_ENDRX_STARTRX);

        let first = ring.advance();
        self.uarte.set_rx_buffer(first.ptr, first.len);
        self.install_ring(Some(ring));
        self.config.replace(Some(*config));
        self.open.store(true, Ordering::Release);

        // === STEP 6: start receiving ===
        // RXSTARTED fires as soon as the interrupt is enabled and the ISR
        // latches the second sub-buffer.
        self.uarte.trigger(UarteTask::StartRx);
        self.uarte.enable_interrupts(RX_INTERRUPTS);
        self.uarte.enable_irq(config.irq_priority);

        self.trace.record(self.id, TraceEvent::Open);
        #[cfg(feature = "defmt")]
        defmt::info!(
            "uart{}: open at {} baud, {} byte ring",
            self.id,
            config.baud_rate.bps(),
            config.rx_buffer.capacity()
        );
        #[cfg(feature = "log")]
        log::info!(
            "uart{}: open at {} baud, {} byte ring",
            self.id,
            config.baud_rate.bps(),
            config.rx_buffer.capacity()
        );
        Ok(())
    }

    /// Stop both directions, hand the pins back and free the ring.
    ///
    /// Closing a closed channel does nothing. The caller must not close a
    /// channel while another task is inside `read` or `write` on it.
    pub(crate) fn close<G: PinConfig>(&self, gpio: &G) {
        if !self.is_open() {
            return;
        }
        debug_assert!(!self.lock.is_locked(), "channel closed while in use");

        // === STEP 1: silence the ISR ===
        self.uarte.disable_irq();
        self.uarte.disable_interrupts(INT_ALL);

        // === STEP 2: stop the hardware and wait for it ===
        self.uarte.disable_shorts(SHORTS_ENDRX_STARTRX);
        self.uarte.clear_events(INT_RXTO | INT_TXSTOPPED);
        self.uarte.trigger(UarteTask::StopRx);
        self.uarte.trigger(UarteTask::StopTx);
        self.uarte.wait_for(INT_RXTO | INT_TXSTOPPED);
        self.uarte.clear_events(INT_ALL);
        self.uarte.disable();

        // === STEP 3: pins back to reset state ===
        let pins = self.uarte.pins();
        self.uarte.set_pins(UartPins::default());
        for pin in pins.iter() {
            gpio.restore_default(pin);
        }

        // === STEP 4: release counter, ring and queue ===
        self.counter.stop();
        self.open.store(false, Ordering::Release);
        drop(self.install_ring(None));
        self.config.replace(None);
        self.queue.clear();

        self.trace.record(self.id, TraceEvent::Close);
        #[cfg(feature = "defmt")]
        defmt::info!("uart{}: closed", self.id);
        #[cfg(feature = "log")]
        log::info!("uart{}: closed", self.id);
    }

    // =========================================================================
    // Receive
    // =========================================================================

    fn availability(&self, start: u32, capacity: usize) -> Availability {
        let end = self.counter.capture();
        Availability::new(start, end, C::WIDTH_BITS, capacity)
    }

    fn report_overrun(&self, avail: Availability) {
        if !avail.overrun() {
            return;
        }
        StatCounters::bump(&self.stats.overruns);
        self.trace
            .record(self.id, TraceEvent::Overrun { lost: avail.lost });
        #[cfg(feature = "defmt")]
        defmt::warn!("uart{}: receive overrun, {} bytes lost", self.id, avail.lost);
        #[cfg(feature = "log")]
        log::warn!("uart{}: receive overrun, {} bytes lost", self.id, avail.lost);
    }

    /// Copy up to `buf.len()` received bytes into `buf`
    ///
    /// After an overrun the reader skips the overwritten bytes and resumes at
    /// the oldest byte still in the ring, so bytes stay in arrival order and
    /// none is returned twice.
    pub(crate) fn read(&self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(Error::InvalidParameter);
        }
        if !self.is_open() {
            return Err(Error::NotInitialised);
        }
        let mut state = self.lock.lock();
        let ring = self.ring().ok_or(Error::NotInitialised)?;
        let capacity = ring.capacity();

        let mut start = self.start_count.load(Ordering::Acquire);
        let avail = self.availability(start, capacity);
        self.report_overrun(avail);
        if avail.overrun() {
            start = advance_count(start, avail.lost, C::WIDTH_BITS);
            state.read_cursor = (state.read_cursor + avail.lost) % capacity;
        }

        let total = avail.bytes.min(buf.len());
        ring.copy_out(state.read_cursor, &mut buf[..total]);
        state.read_cursor = (state.read_cursor + total) % capacity;
        self.start_count
            .store(advance_count(start, total, C::WIDTH_BITS), Ordering::Release);
        // drained: the next arrival gets an event
        self.needs_notify
            .store(total == avail.bytes, Ordering::Release);

        self.trace.record(self.id, TraceEvent::Read { bytes: total });
        Ok(total)
    }

    /// Bytes waiting in the ring, without consuming them
    pub(crate) fn receive_size(&self) -> Result<usize> {
        if !self.is_open() {
            return Err(Error::NotInitialised);
        }
        let _state = self.lock.lock();
        let ring = self.ring().ok_or(Error::NotInitialised)?;

        let start = self.start_count.load(Ordering::Acquire);
        let avail = self.availability(start, ring.capacity());
        self.report_overrun(avail);
        if avail.bytes == 0 {
            self.needs_notify.store(true, Ordering::Release);
        }
        Ok(avail.bytes)
    }

    // =========================================================================
    // Transmit
    // =========================================================================

    /// Send `data`, blocking until the hardware has taken every byte
    pub(crate) fn write(&self, data: &[u8]) -> Result<usize> {
        if !self.is_open() {
            return Err(Error::NotInitialised);
        }
        if data.is_empty() {
            return Ok(0);
        }
        let _state = self.lock.lock();

        if self.uarte.is_dma_capable(data) {
            for chunk in data.chunks(MAX_DMA_TRANSFER) {
                self.transmit(chunk);
            }
        } else {
            // EasyDMA cannot reach `data`; stage it in RAM one chunk at a time
            let mut staging = Vec::new();
            staging
                .try_reserve_exact(data.len().min(MAX_DMA_TRANSFER))
                .map_err(|_| Error::OutOfMemory)?;
            for chunk in data.chunks(MAX_DMA_TRANSFER) {
                staging.clear();
                staging.extend_from_slice(chunk);
                self.transmit(&staging);
            }
        }

        self.trace
            .record(self.id, TraceEvent::Write { bytes: data.len() });
        Ok(data.len())
    }

    fn transmit(&self, chunk: &[u8]) {
        self.uarte.clear_events(INT_ENDTX | INT_TXSTOPPED);
        self.uarte.set_tx_buffer(chunk.as_ptr(), chunk.len());
        self.uarte.trigger(UarteTask::StartTx);
        self.uarte.wait_for(INT_ENDTX);
        self.uarte.trigger(UarteTask::StopTx);
        self.uarte.wait_for(INT_TXSTOPPED);
        self.uarte.clear_events(INT_ENDTX | INT_TXSTOPPED);
    }

    // =========================================================================
    // Flow Control
    // =========================================================================

    pub(crate) fn rts_enabled(&self) -> bool {
        if !self.is_open() {
            return false;
        }
        let _state = self.lock.lock();
        self.uarte.pins().rts.is_some()
    }

    pub(crate) fn cts_enabled(&self) -> bool {
        if !self.is_open() {
            return false;
        }
        let _state = self.lock.lock();
        self.uarte.pins().cts.is_some()
    }

    // =========================================================================
    // Interrupt Context
    // =========================================================================

    /// UARTE interrupt: keep the next sub-buffer latched, clear line errors
    pub(crate) fn on_interrupt(&self) -> InterruptStatus {
        let status = InterruptStatus::from_raw(self.uarte.pending_events(SERVICED_EVENTS));
        self.uarte.clear_events(status.to_raw());
        if !self.is_open() {
            return status;
        }

        if status.has_error() {
            let source = self.uarte.take_error_source();
            StatCounters::bump(&self.stats.line_errors);
            self.trace.record(self.id, TraceEvent::LineError { source });
            #[cfg(feature = "defmt")]
            defmt::debug!("uart{}: line error {=u32:#x}", self.id, source);
            #[cfg(feature = "log")]
            log::debug!("uart{}: line error {:#x}", self.id, source);
        }

        if status.rx_started
            && let Some(ring) = self.ring()
        {
            // the hardware latched the previous pointer; queue the one after
            let next = ring.advance();
            self.uarte.set_rx_buffer(next.ptr, next.len);
            self.trace.record(
                self.id,
                TraceEvent::RxStarted {
                    next: next.index as u16,
                },
            );
        }

        if status.end_rx {
            self.trace.record(self.id, TraceEvent::EndRx);
        }
        status
    }

    /// Idle tick: post one event if data arrived since the consumer drained
    /// the ring. Returns whether an event was posted.
    pub(crate) fn on_idle_tick(&self) -> bool {
        if !self.is_open() {
            return false;
        }
        let Some(ring) = self.ring() else {
            return false;
        };
        let start = self.start_count.load(Ordering::Acquire);
        let avail = self.availability(start, ring.capacity());
        if avail.bytes == 0 {
            return false;
        }
        if self
            .needs_notify
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        if self.queue.send_from_isr(UartEvent::Received(avail.bytes)) {
            StatCounters::bump(&self.stats.notifications);
            self.trace
                .record(self.id, TraceEvent::Notify { bytes: avail.bytes });
            true
        } else {
            StatCounters::bump(&self.stats.notifications_dropped);
            self.trace.record(self.id, TraceEvent::NotifyDropped);
            false
        }
    }
}
