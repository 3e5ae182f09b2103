//! Pipeline trace
//!
//! A fixed-depth circular record of what the receive pipeline did, for
//! post-mortem inspection over a debugger or a defmt dump. Recording only
//! happens with the `trace` feature; without it [`TraceLog`] is zero-sized
//! and every call compiles away.

#[cfg(feature = "trace")]
use heapless::HistoryBuffer;

#[cfg(feature = "trace")]
use crate::sync::CriticalSectionCell;

/// Something the pipeline did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TraceEvent {
    /// Channel opened
    Open,
    /// Channel closed
    Close,
    /// Hardware started a sub-buffer; the next one was programmed
    RxStarted {
        /// Index of the sub-buffer now queued behind the active one
        next: u16,
    },
    /// A sub-buffer filled
    EndRx,
    /// Line error cleared
    LineError {
        /// ERRORSRC bits
        source: u32,
    },
    /// Consumer notified
    Notify {
        /// Bytes available at notification time
        bytes: usize,
    },
    /// Notification dropped on a full queue
    NotifyDropped,
    /// Consumer fell behind; bytes were overwritten
    Overrun {
        /// Bytes lost
        lost: usize,
    },
    /// Bytes handed to a reader
    Read {
        /// Bytes copied out
        bytes: usize,
    },
    /// Bytes transmitted
    Write {
        /// Bytes sent
        bytes: usize,
    },
}

/// One trace entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TraceRecord {
    /// Channel the event belongs to
    pub channel: u8,
    /// What happened
    pub event: TraceEvent,
}

/// Circular trace of the last `N` records
pub struct TraceLog<const N: usize> {
    #[cfg(feature = "trace")]
    records: CriticalSectionCell<HistoryBuffer<TraceRecord, N>>,
}

impl<const N: usize> Default for TraceLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TraceLog<N> {
    /// Create an empty trace
    pub const fn new() -> Self {
        Self {
            #[cfg(feature = "trace")]
            records: CriticalSectionCell::new(HistoryBuffer::new()),
        }
    }

    /// Append a record, overwriting the oldest when full
    #[inline(always)]
    pub fn record(&self, channel: u8, event: TraceEvent) {
        #[cfg(feature = "trace")]
        self.records
            .with(|r| r.write(TraceRecord { channel, event }));
        #[cfg(not(feature = "trace"))]
        let _ = (channel, event);
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        #[cfg(feature = "trace")]
        let len = self.records.with_ref(HistoryBuffer::len);
        #[cfg(not(feature = "trace"))]
        let len = 0;
        len
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy records into `out`, oldest first; returns how many were copied
    pub fn snapshot(&self, out: &mut [TraceRecord]) -> usize {
        #[cfg(feature = "trace")]
        let copied = self.records.with_ref(|r| {
            let mut n = 0;
            for (slot, rec) in out.iter_mut().zip(r.oldest_ordered()) {
                *slot = *rec;
                n += 1;
            }
            n
        });
        #[cfg(not(feature = "trace"))]
        let copied = {
            let _ = out;
            0
        };
        copied
    }

    /// Drop every record
    pub fn clear(&self) {
        #[cfg(feature = "trace")]
        self.records.with(HistoryBuffer::clear);
    }
}

#[cfg(all(test, feature = "trace"))]
mod tests {
    use super::*;

    const EMPTY: TraceRecord = TraceRecord {
        channel: 0,
        event: TraceEvent::Open,
    };

    #[test]
    fn keeps_latest_records_in_order() {
        let log: TraceLog<3> = TraceLog::new();
        for bytes in 1..=5 {
            log.record(1, TraceEvent::Read { bytes });
        }
        assert_eq!(log.len(), 3);
        let mut out = [EMPTY; 4];
        assert_eq!(log.snapshot(&mut out), 3);
        assert_eq!(out[0].event, TraceEvent::Read { bytes: 3 });
        assert_eq!(out[2].event, TraceEvent::Read { bytes: 5 });
        assert_eq!(out[2].channel, 1);
    }

    #[test]
    fn clear_empties() {
        let log: TraceLog<2> = TraceLog::new();
        log.record(0, TraceEvent::EndRx);
        log.clear();
        assert!(log.is_empty());
    }
}
