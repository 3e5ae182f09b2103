//! Testing utilities and mock implementations
//!
//! Host-side models of the UARTE, byte counter, tick timer, GPIO and the
//! OS mutex so the whole receive pipeline runs under `cargo test`.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::collections::VecDeque;
use std::sync::Arc;
use std::vec::Vec;

use crate::driver::config::{BaudRate, Pin};
use crate::driver::error::{Error, Result};
use crate::hal::counter::ByteCounter;
use crate::hal::gpio::{PinConfig, Pull};
use crate::hal::timer::TickTimerHw;
use crate::hal::uarte::{InterruptSource, UartPins, Uarte, UarteTask, in_data_ram};
use crate::internal::constants::TICK_HZ;
use crate::internal::register::uarte::{
    INT_ENDRX, INT_ENDTX, INT_ERROR, INT_RXDRDY, INT_RXSTARTED, INT_RXTO, INT_TXSTARTED,
    INT_TXSTOPPED, SHORTS_ENDRX_STARTRX,
};
use crate::sync::CriticalSectionCell;

// =============================================================================
// Mock UARTE
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct RxTransfer {
    ptr: usize,
    len: usize,
    filled: usize,
}

#[derive(Debug, Default)]
struct UarteState {
    enabled: bool,
    events: u32,
    inten: u32,
    shorts: u32,
    irq_enabled: bool,
    irq_priority: u8,
    baud_rate: Option<BaudRate>,
    hardware_flow_control: bool,
    pins: UartPins,
    rx_latched: Option<(usize, usize)>,
    rx_active: Option<RxTransfer>,
    tx_latched: (usize, usize),
    tx_pointers: Vec<usize>,
    sent: Vec<u8>,
    wire: VecDeque<u8>,
    loopback: bool,
    dropped: usize,
    error_source: u32,
    dma_capable: Option<bool>,
    tasks: Vec<UarteTask>,
}

impl UarteState {
    fn start_rx(&mut self) {
        if !self.enabled {
            return;
        }
        if let Some((ptr, len)) = self.rx_latched {
            self.rx_active = Some(RxTransfer { ptr, len, filled: 0 });
            self.events |= INT_RXSTARTED;
        }
    }
}

/// Model of one UARTE with EasyDMA.
///
/// Received bytes are written through the latched RX pointer like the real
/// DMA; a full transfer raises `ENDRX` and, with the `ENDRX_STARTRX` short,
/// immediately restarts on the next latched pointer (raising `RXSTARTED`).
/// Every stored byte raises `RXDRDY` and bumps the count seen by the paired
/// [`MockByteCounter`].
///
/// Clones share state, so a test keeps one handle while the driver owns
/// another.
#[derive(Debug, Clone)]
pub struct MockUarte {
    state: Arc<CriticalSectionCell<UarteState>>,
    rx_ready: Arc<AtomicU32>,
}

impl Default for MockUarte {
    fn default() -> Self {
        Self::new()
    }
}

impl MockUarte {
    /// Create a disabled UARTE with loopback on
    pub fn new() -> Self {
        Self {
            state: Arc::new(CriticalSectionCell::new(UarteState {
                loopback: true,
                ..UarteState::default()
            })),
            rx_ready: Arc::new(AtomicU32::new(0)),
        }
    }

    /// A byte counter linked to this UARTE's `RXDRDY`
    pub fn counter(&self) -> MockByteCounter {
        MockByteCounter::linked(Arc::clone(&self.rx_ready))
    }

    /// Override the data RAM check used by `write`
    pub fn set_dma_capable(&self, capable: bool) {
        self.state.with(|s| s.dma_capable = Some(capable));
    }

    /// Whether transmitted bytes are queued back for reception
    pub fn set_loopback(&self, loopback: bool) {
        self.state.with(|s| s.loopback = loopback);
    }

    /// Receive one byte off the wire; `false` if the receiver was not running
    pub fn push_byte(&self, byte: u8) -> bool {
        self.state.with(|s| {
            let Some(rx) = s.rx_active.as_mut() else {
                s.dropped += 1;
                return false;
            };
            // SAFETY: the driver latched a pointer into a live ring arena of
            // at least `rx.len` bytes and keeps it until StopRx.
            unsafe { (rx.ptr as *mut u8).add(rx.filled).write_volatile(byte) };
            rx.filled += 1;
            let full = rx.filled == rx.len;
            self.rx_ready.fetch_add(1, Ordering::SeqCst);
            s.events |= INT_RXDRDY;
            if full {
                s.events |= INT_ENDRX;
                s.rx_active = None;
                if s.shorts & SHORTS_ENDRX_STARTRX != 0 {
                    s.start_rx();
                }
            }
            true
        })
    }

    /// Take the bytes looped back by transmissions
    pub fn take_wire(&self) -> Vec<u8> {
        self.state.with(|s| s.wire.drain(..).collect())
    }

    /// Every byte transmitted so far
    pub fn sent(&self) -> Vec<u8> {
        self.state.with_ref(|s| s.sent.clone())
    }

    /// TX pointer of each transfer
    pub fn tx_pointers(&self) -> Vec<usize> {
        self.state.with_ref(|s| s.tx_pointers.clone())
    }

    /// Tasks triggered so far
    pub fn tasks(&self) -> Vec<UarteTask> {
        self.state.with_ref(|s| s.tasks.clone())
    }

    /// How often `task` was triggered
    pub fn task_count(&self, task: UarteTask) -> usize {
        self.state
            .with_ref(|s| s.tasks.iter().filter(|t| **t == task).count())
    }

    /// Bytes that arrived while the receiver was stopped
    pub fn dropped(&self) -> usize {
        self.state.with_ref(|s| s.dropped)
    }

    /// Raise a line error
    pub fn raise_error(&self, source: u32) {
        self.state.with(|s| {
            s.error_source |= source;
            s.events |= INT_ERROR;
        });
    }

    /// Whether the interrupt line would fire now
    pub fn irq_pending(&self) -> bool {
        self.state
            .with_ref(|s| s.irq_enabled && s.events & s.inten != 0)
    }

    pub fn is_enabled(&self) -> bool {
        self.state.with_ref(|s| s.enabled)
    }

    pub fn irq_enabled(&self) -> bool {
        self.state.with_ref(|s| s.irq_enabled)
    }

    pub fn irq_priority(&self) -> u8 {
        self.state.with_ref(|s| s.irq_priority)
    }

    pub fn interrupts(&self) -> u32 {
        self.state.with_ref(|s| s.inten)
    }

    pub fn shorts(&self) -> u32 {
        self.state.with_ref(|s| s.shorts)
    }

    pub fn events(&self) -> u32 {
        self.state.with_ref(|s| s.events)
    }

    pub fn baud_rate(&self) -> Option<BaudRate> {
        self.state.with_ref(|s| s.baud_rate)
    }

    pub fn hardware_flow_control(&self) -> bool {
        self.state.with_ref(|s| s.hardware_flow_control)
    }

    /// Whether a receive transfer is in progress
    pub fn rx_running(&self) -> bool {
        self.state.with_ref(|s| s.rx_active.is_some())
    }

    /// Pointer latched for the next receive transfer
    pub fn rx_latched(&self) -> Option<(usize, usize)> {
        self.state.with_ref(|s| s.rx_latched)
    }
}

impl Uarte for MockUarte {
    fn configure(&self, baud_rate: BaudRate, hardware_flow_control: bool) {
        self.state.with(|s| {
            s.baud_rate = Some(baud_rate);
            s.hardware_flow_control = hardware_flow_control;
        });
    }

    fn set_pins(&self, pins: UartPins) {
        self.state.with(|s| s.pins = pins);
    }

    fn pins(&self) -> UartPins {
        self.state.with_ref(|s| s.pins)
    }

    fn enable(&self) {
        self.state.with(|s| s.enabled = true);
    }

    fn disable(&self) {
        self.state.with(|s| {
            s.enabled = false;
            s.rx_active = None;
        });
    }

    fn trigger(&self, task: UarteTask) {
        self.state.with(|s| {
            s.tasks.push(task);
            if !s.enabled {
                return;
            }
            match task {
                UarteTask::StartRx => s.start_rx(),
                UarteTask::StopRx => {
                    if s.rx_active.take().is_some() {
                        s.events |= INT_ENDRX;
                    }
                    s.events |= INT_RXTO;
                }
                UarteTask::StartTx => {
                    let (ptr, len) = s.tx_latched;
                    // SAFETY: the driver keeps the TX buffer alive until
                    // ENDTX, which this model raises before returning.
                    let bytes = unsafe { core::slice::from_raw_parts(ptr as *const u8, len) };
                    s.tx_pointers.push(ptr);
                    s.sent.extend_from_slice(bytes);
                    if s.loopback {
                        s.wire.extend(bytes.iter().copied());
                    }
                    s.events |= INT_TXSTARTED | INT_ENDTX;
                }
                UarteTask::StopTx => s.events |= INT_TXSTOPPED,
                UarteTask::FlushRx => {}
            }
        });
    }

    fn pending_events(&self, mask: u32) -> u32 {
        self.state.with_ref(|s| s.events & mask)
    }

    fn clear_events(&self, mask: u32) {
        self.state.with(|s| s.events &= !mask);
    }

    fn enable_interrupts(&self, mask: u32) {
        self.state.with(|s| s.inten |= mask);
    }

    fn disable_interrupts(&self, mask: u32) {
        self.state.with(|s| s.inten &= !mask);
    }

    fn enable_shorts(&self, mask: u32) {
        self.state.with(|s| s.shorts |= mask);
    }

    fn disable_shorts(&self, mask: u32) {
        self.state.with(|s| s.shorts &= !mask);
    }

    fn set_rx_buffer(&self, ptr: *mut u8, len: usize) {
        self.state.with(|s| s.rx_latched = Some((ptr as usize, len)));
    }

    fn set_tx_buffer(&self, ptr: *const u8, len: usize) {
        self.state.with(|s| s.tx_latched = (ptr as usize, len));
    }

    fn take_error_source(&self) -> u32 {
        self.state.with(|s| core::mem::take(&mut s.error_source))
    }

    fn rx_ready_event_address(&self) -> usize {
        0x4000_2108
    }

    fn is_dma_capable(&self, data: &[u8]) -> bool {
        self.state
            .with_ref(|s| s.dma_capable)
            .unwrap_or_else(|| in_data_ram(data))
    }

    fn wait_for(&self, mask: u32) {
        // every modelled operation completes immediately
        assert_eq!(
            self.pending_events(mask),
            mask,
            "hardware would never raise {mask:#x}"
        );
    }
}

impl InterruptSource for MockUarte {
    fn irq_number(&self) -> u8 {
        2
    }

    fn enable_irq(&self, priority: u8) {
        self.state.with(|s| {
            s.irq_enabled = true;
            s.irq_priority = priority;
        });
    }

    fn disable_irq(&self) {
        self.state.with(|s| s.irq_enabled = false);
    }
}

// =============================================================================
// Mock Byte Counter
// =============================================================================

#[derive(Debug, Default)]
struct CounterState {
    base: AtomicU32,
    preset: AtomicU32,
    running: AtomicBool,
    fail_start: AtomicBool,
    starts: AtomicUsize,
    event_address: AtomicUsize,
}

/// Counter fed by a [`MockUarte`]'s `RXDRDY`, 32 bits wide.
#[derive(Debug, Clone)]
pub struct MockByteCounter {
    rx_ready: Arc<AtomicU32>,
    state: Arc<CounterState>,
}

impl MockByteCounter {
    fn linked(rx_ready: Arc<AtomicU32>) -> Self {
        Self {
            rx_ready,
            state: Arc::new(CounterState::default()),
        }
    }

    /// Count reported right after the next `start` (to exercise wraparound)
    pub fn set_preset(&self, value: u32) {
        self.state.preset.store(value, Ordering::SeqCst);
    }

    /// Make the next `start` calls fail as if no link were free
    pub fn fail_start(&self, fail: bool) {
        self.state.fail_start.store(fail, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::SeqCst)
    }

    pub fn starts(&self) -> usize {
        self.state.starts.load(Ordering::SeqCst)
    }

    pub fn event_address(&self) -> usize {
        self.state.event_address.load(Ordering::SeqCst)
    }
}

impl ByteCounter for MockByteCounter {
    const WIDTH_BITS: u32 = 32;

    fn start(&self, event_address: usize) -> Result<()> {
        if self.state.fail_start.load(Ordering::SeqCst) {
            return Err(Error::PlatformError);
        }
        let total = self.rx_ready.load(Ordering::SeqCst);
        let preset = self.state.preset.load(Ordering::SeqCst);
        self.state
            .base
            .store(total.wrapping_sub(preset), Ordering::SeqCst);
        self.state
            .event_address
            .store(event_address, Ordering::SeqCst);
        self.state.starts.fetch_add(1, Ordering::SeqCst);
        self.state.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn capture(&self) -> u32 {
        if !self.is_running() {
            return 0;
        }
        self.rx_ready
            .load(Ordering::SeqCst)
            .wrapping_sub(self.state.base.load(Ordering::SeqCst))
    }

    fn stop(&self) {
        self.state.running.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Mock Tick Timer
// =============================================================================

#[derive(Debug, Default)]
struct TimerState {
    count: u32,
    limit: u32,
    running: bool,
    paused: bool,
    pending: bool,
    starts: usize,
}

/// Tick timer that only moves when told to
#[derive(Debug, Default)]
pub struct MockTickTimer {
    state: CriticalSectionCell<TimerState>,
}

impl MockTickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `ticks` ticks pass; reaching the limit clears the count and
    /// raises the overflow event
    pub fn advance(&self, ticks: u32) {
        self.state.with(|s| {
            if !s.running || s.paused || s.limit == 0 {
                return;
            }
            let total = u64::from(s.count) + u64::from(ticks);
            if total >= u64::from(s.limit) {
                s.pending = true;
            }
            s.count = (total % u64::from(s.limit)) as u32;
        });
    }

    /// Advance exactly to the next overflow
    pub fn step_to_overflow(&self) {
        let remaining = self.state.with_ref(|s| s.limit - s.count);
        self.advance(remaining);
    }

    pub fn limit(&self) -> u32 {
        self.state.with_ref(|s| s.limit)
    }

    pub fn count(&self) -> u32 {
        self.state.with_ref(|s| s.count)
    }

    pub fn is_running(&self) -> bool {
        self.state.with_ref(|s| s.running && !s.paused)
    }

    pub fn starts(&self) -> usize {
        self.state.with_ref(|s| s.starts)
    }
}

impl TickTimerHw for MockTickTimer {
    const TICK_HZ: u32 = TICK_HZ;

    fn start(&self, limit: u32) -> Result<()> {
        self.state.with(|s| {
            *s = TimerState {
                limit,
                running: true,
                starts: s.starts + 1,
                ..TimerState::default()
            };
        });
        Ok(())
    }

    fn stop(&self) {
        self.state.with(|s| s.running = false);
    }

    fn pause(&self) {
        self.state.with(|s| s.paused = true);
    }

    fn resume(&self) {
        self.state.with(|s| s.paused = false);
    }

    fn clear(&self) {
        self.state.with(|s| s.count = 0);
    }

    fn set_limit(&self, limit: u32) {
        self.state.with(|s| s.limit = limit);
    }

    fn capture(&self) -> u32 {
        self.count()
    }

    fn overflow_pending(&self) -> bool {
        self.state.with_ref(|s| s.pending)
    }

    fn clear_overflow(&self) {
        self.state.with(|s| s.pending = false);
    }
}

// =============================================================================
// Mock GPIO
// =============================================================================

/// Pin configuration recorded by [`MockGpio`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Output { high: bool },
    Input(Pull),
    Default,
}

/// GPIO collaborator that records every configuration call
#[derive(Debug, Default)]
pub struct MockGpio {
    log: CriticalSectionCell<Vec<(Pin, PinMode)>>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last configuration applied to `pin`
    pub fn mode(&self, pin: Pin) -> Option<PinMode> {
        self.log.with_ref(|log| {
            log.iter()
                .rev()
                .find(|(p, _)| *p == pin)
                .map(|(_, mode)| *mode)
        })
    }

    /// Number of configuration calls
    pub fn calls(&self) -> usize {
        self.log.with_ref(Vec::len)
    }
}

impl PinConfig for MockGpio {
    fn configure_output(&self, pin: Pin, high: bool) {
        self.log.with(|log| log.push((pin, PinMode::Output { high })));
    }

    fn configure_input(&self, pin: Pin, pull: Pull) {
        self.log.with(|log| log.push((pin, PinMode::Input(pull))));
    }

    fn restore_default(&self, pin: Pin) {
        self.log.with(|log| log.push((pin, PinMode::Default)));
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Total milliseconds that were "delayed"
    pub fn total_ms(&self) -> u64 {
        self.total_ns() / 1_000_000
    }

    pub fn reset(&self) {
        *self.total_ns.borrow_mut() = 0;
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += u64::from(ns);
    }
}

// =============================================================================
// Mock OS Mutex
// =============================================================================

std::thread_local! {
    static LOCKS_TAKEN: core::cell::Cell<usize> = const { core::cell::Cell::new(0) };
}

/// Raw mutex that yields the thread while contended, like an RTOS mutex
/// putting the waiting task to sleep
#[derive(Debug)]
pub struct YieldingRawMutex {
    locked: AtomicBool,
}

impl YieldingRawMutex {
    /// Locks taken by the calling thread so far
    pub fn locks_taken() -> usize {
        LOCKS_TAKEN.with(core::cell::Cell::get)
    }
}

// SAFETY: only one `try_lock` succeeds until `unlock`.
unsafe impl lock_api::RawMutex for YieldingRawMutex {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self {
        locked: AtomicBool::new(false),
    };

    type GuardMarker = lock_api::GuardSend;

    fn lock(&self) {
        LOCKS_TAKEN.with(|n| n.set(n.get() + 1));
        while !self.try_lock() {
            std::thread::yield_now();
        }
    }

    fn try_lock(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    unsafe fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }

    fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}
