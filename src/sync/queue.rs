//! Fixed-depth event queue from interrupt context to a consumer task.
//!
//! The driver is the only producer (from the tick interrupt); the consumer
//! task blocks on [`EventQueue::receive`] and then calls `read`. Waiting
//! polls with a caller-supplied `DelayNs`, so the queue works with any HAL
//! or RTOS delay.

use core::sync::atomic::{AtomicU32, Ordering};

use embedded_hal::delay::DelayNs;
use heapless::Deque;

use crate::driver::error::{Error, Result};
use crate::internal::constants::QUEUE_POLL_INTERVAL_US;
use crate::sync::CriticalSectionCell;

// =============================================================================
// Events
// =============================================================================

/// Event posted to a channel's queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartEvent {
    /// Bytes are waiting in the receive ring (count at notification time)
    Received(usize),
    /// Consumer should stop waiting (sent by the application, never by the
    /// driver)
    Shutdown,
}

impl UartEvent {
    /// Decode the port-layer size convention: negative means shutdown
    pub fn from_size(size: i32) -> Self {
        usize::try_from(size).map_or(UartEvent::Shutdown, UartEvent::Received)
    }

    /// Encode to the port-layer size convention
    pub fn size(&self) -> i32 {
        match self {
            UartEvent::Received(n) => i32::try_from(*n).unwrap_or(i32::MAX),
            UartEvent::Shutdown => -1,
        }
    }
}

// =============================================================================
// Queue
// =============================================================================

/// Queue of up to `N` events.
pub struct EventQueue<const N: usize> {
    events: CriticalSectionCell<Deque<UartEvent, N>>,
    dropped: AtomicU32,
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventQueue<N> {
    /// Create an empty queue (const, suitable for static initialization)
    pub const fn new() -> Self {
        Self {
            events: CriticalSectionCell::new(Deque::new()),
            dropped: AtomicU32::new(0),
        }
    }

    /// Post an event from task context
    ///
    /// Returns [`Error::PlatformError`] when the queue is full.
    pub fn send(&self, event: UartEvent) -> Result<()> {
        self.events
            .with(|q| q.push_back(event))
            .map_err(|_| Error::PlatformError)
    }

    /// Post an event from interrupt context
    ///
    /// Never blocks. A full queue drops the event and returns `false`.
    pub fn send_from_isr(&self, event: UartEvent) -> bool {
        let sent = self.events.with(|q| q.push_back(event).is_ok());
        if !sent {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        sent
    }

    /// Take the oldest event, if any
    pub fn try_receive(&self) -> Option<UartEvent> {
        self.events.with(Deque::pop_front)
    }

    /// Wait until an event is available
    pub fn receive<D: DelayNs>(&self, delay: &mut D) -> UartEvent {
        loop {
            if let Some(event) = self.try_receive() {
                return event;
            }
            delay.delay_us(QUEUE_POLL_INTERVAL_US);
        }
    }

    /// Wait up to `timeout_ms` for an event
    ///
    /// Returns [`Error::Timeout`] if none arrives in time. A zero timeout
    /// checks once.
    pub fn receive_timeout<D: DelayNs>(&self, timeout_ms: u32, delay: &mut D) -> Result<UartEvent> {
        let limit_us = u64::from(timeout_ms) * 1000;
        let mut waited_us: u64 = 0;
        loop {
            if let Some(event) = self.try_receive() {
                return Ok(event);
            }
            if waited_us >= limit_us {
                return Err(Error::Timeout);
            }
            delay.delay_us(QUEUE_POLL_INTERVAL_US);
            waited_us += u64::from(QUEUE_POLL_INTERVAL_US);
        }
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.events.with_ref(Deque::len)
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of queued events
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Discard every queued event
    pub fn clear(&self) {
        self.events.with(Deque::clear);
    }

    /// Events dropped by [`send_from_isr`](Self::send_from_isr) on a full queue
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Tests
// =============================================================================
