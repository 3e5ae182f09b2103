//! Dual-mode system tick
//!
//! One hardware timer provides the process-wide millisecond clock and, while
//! a UART channel is open, the receive-idle timeout.
//!
//! | Mode     | Overflow width | Period at 31.25 kHz |
//! |----------|----------------|---------------------|
//! | Normal   | 24 bits        | ~537 s              |
//! | Active   | 12 bits        | 131.072 ms          |
//!
//! Elapsed time is `(overflows << width) + residual + count`. Switching mode
//! folds the current total into the new width (`overflows` and `residual`)
//! and restarts the hardware count at zero, so no tick is gained or lost and
//! [`DualModeTickTimer::elapsed_ms`] never goes backwards.

use crate::driver::error::Result;
use crate::hal::timer::TickTimerHw;
use crate::internal::constants::{ACTIVE_MODE_WIDTH_BITS, NORMAL_MODE_WIDTH_BITS};
use crate::sync::CriticalSectionCell;

/// Tick timer mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickMode {
    /// Long period; only the clock
    #[default]
    Normal,
    /// Short period; overflows double as the UART idle timeout
    Active,
}

impl TickMode {
    /// Overflow width in bits
    pub const fn width_bits(self) -> u32 {
        match self {
            TickMode::Normal => NORMAL_MODE_WIDTH_BITS,
            TickMode::Active => ACTIVE_MODE_WIDTH_BITS,
        }
    }

    /// Ticks per overflow
    pub const fn limit(self) -> u32 {
        1 << self.width_bits()
    }
}

/// Callback run from the tick interrupt after every overflow
pub trait OverflowHandler: Sync {
    /// Called in interrupt context; must not block
    fn on_overflow(&self);
}

#[derive(Debug, Clone, Copy)]
struct TickState {
    mode: TickMode,
    running: bool,
    /// Overflows counted at the current width
    overflows: u64,
    /// Ticks carried over from the last mode switch
    residual: u64,
}

impl TickState {
    const fn new() -> Self {
        Self {
            mode: TickMode::Normal,
            running: false,
            overflows: 0,
            residual: 0,
        }
    }

    fn total(&self, count: u32) -> u64 {
        (self.overflows << self.mode.width_bits()) + self.residual + u64::from(count)
    }
}

/// System tick with a switchable overflow period.
pub struct DualModeTickTimer<'a, T: TickTimerHw> {
    hw: T,
    state: CriticalSectionCell<TickState>,
    handler: CriticalSectionCell<Option<&'a dyn OverflowHandler>>,
}

impl<'a, T: TickTimerHw> DualModeTickTimer<'a, T> {
    /// Wrap the hardware timer (const, suitable for static initialization)
    pub const fn new(hw: T) -> Self {
        Self {
            hw,
            state: CriticalSectionCell::new(TickState::new()),
            handler: CriticalSectionCell::new(None),
        }
    }

    /// The hardware timer
    pub fn hw(&self) -> &T {
        &self.hw
    }

    /// Start the clock
    ///
    /// The first start counts from zero in normal mode. After [`stop`](Self::stop)
    /// the frozen time is kept and counting resumes in the current mode with
    /// the hardware count cleared. Does nothing if already running.
    pub fn start(&self) -> Result<()> {
        self.state.with(|st| {
            if st.running {
                return Ok(());
            }
            // `stop` folded everything into `residual`
            debug_assert_eq!(st.overflows, 0);
            self.hw.start(st.mode.limit())?;
            st.running = true;
            Ok(())
        })
    }

    /// Stop the clock; elapsed time freezes
    pub fn stop(&self) {
        self.state.with(|st| {
            if st.running {
                self.hw.pause();
                let mut count = self.hw.capture();
                if self.hw.overflow_pending() {
                    self.hw.clear_overflow();
                    st.overflows += 1;
                    count = self.hw.capture();
                }
                st.residual = st.total(count);
                st.overflows = 0;
                self.hw.stop();
                st.running = false;
            }
        });
    }

    /// Whether the clock is running
    pub fn is_running(&self) -> bool {
        self.state.with_ref(|st| st.running)
    }

    /// Current mode
    pub fn mode(&self) -> TickMode {
        self.state.with_ref(|st| st.mode)
    }

    /// Switch to the short period used as the UART idle timeout
    pub fn enter_active_mode(&self) {
        self.switch_mode(TickMode::Active);
    }

    /// Return to the long period
    pub fn exit_active_mode(&self) {
        self.switch_mode(TickMode::Normal);
    }

    fn switch_mode(&self, mode: TickMode) {
        self.state.with(|st| {
            if st.mode == mode {
                return;
            }
            if !st.running {
                let total = st.residual;
                st.mode = mode;
                st.overflows = 0;
                st.residual = total;
                return;
            }

            self.hw.pause();
            let mut count = self.hw.capture();
            if self.hw.overflow_pending() {
                // account for it here; the ISR will find nothing to do
                self.hw.clear_overflow();
                st.overflows += 1;
                count = self.hw.capture();
            }
            let total = st.total(count);

            let width = mode.width_bits();
            st.overflows = total >> width;
            st.residual = total & ((1u64 << width) - 1);
            st.mode = mode;

            self.hw.set_limit(mode.limit());
            self.hw.clear();
            self.hw.resume();
        });
    }

    /// Ticks since [`start`](Self::start)
    pub fn elapsed_ticks(&self) -> u64 {
        self.state.with_ref(|st| {
            if !st.running {
                return st.total(0);
            }
            let mut count = self.hw.capture();
            let mut pending = 0;
            if self.hw.overflow_pending() {
                // wrapped, interrupt not serviced yet
                count = self.hw.capture();
                pending = 1u64 << st.mode.width_bits();
            }
            st.total(count) + pending
        })
    }

    /// Milliseconds since [`start`](Self::start)
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ticks() * 1000 / u64::from(T::TICK_HZ)
    }

    /// Register the overflow callback, replacing (and returning) any previous
    /// one; `None` cancels
    pub fn set_overflow_handler(
        &self,
        handler: Option<&'a dyn OverflowHandler>,
    ) -> Option<&'a dyn OverflowHandler> {
        self.handler.replace(handler)
    }

    /// Whether a callback is registered
    pub fn has_overflow_handler(&self) -> bool {
        self.handler.with_ref(Option::is_some)
    }

    /// Tick interrupt entry point
    ///
    /// Counts the overflow, then runs the registered callback outside the
    /// critical section.
    pub fn on_interrupt(&self) {
        let overflowed = self.state.with(|st| {
            if !self.hw.overflow_pending() {
                return false;
            }
            self.hw.clear_overflow();
            st.overflows += 1;
            true
        });
        if overflowed && let Some(handler) = self.handler.get() {
            handler.on_overflow();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
