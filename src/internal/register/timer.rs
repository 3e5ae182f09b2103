//! TIMER register definitions
//!
//! Used twice: as the byte counter (counter mode, clocked through PPI) and
//! as the system tick (timer mode, 31.25 kHz).

use super::{reg_rw, reg_task, reg_wo};

// =============================================================================
// Base Addresses
// =============================================================================

/// TIMER0 base address (usually owned by the radio stack)
pub const TIMER0_BASE: usize = 0x4000_8000;
/// TIMER1 base address
pub const TIMER1_BASE: usize = 0x4000_9000;
/// TIMER2 base address
pub const TIMER2_BASE: usize = 0x4000_A000;
/// TIMER3 base address
pub const TIMER3_BASE: usize = 0x4001_A000;
/// TIMER4 base address
pub const TIMER4_BASE: usize = 0x4001_B000;

// =============================================================================
// Register Offsets
// =============================================================================

/// Start timer
pub const TASKS_START_OFFSET: usize = 0x000;
/// Stop timer (value is kept)
pub const TASKS_STOP_OFFSET: usize = 0x004;
/// Increment (counter mode)
pub const TASKS_COUNT_OFFSET: usize = 0x008;
/// Clear timer
pub const TASKS_CLEAR_OFFSET: usize = 0x00C;
/// Capture into CC[n]
pub const TASKS_CAPTURE0_OFFSET: usize = 0x040;
/// Compare event for CC[n]
pub const EVENTS_COMPARE0_OFFSET: usize = 0x140;
/// Shortcuts
pub const SHORTS_OFFSET: usize = 0x200;
/// Enable interrupts
pub const INTENSET_OFFSET: usize = 0x304;
/// Disable interrupts
pub const INTENCLR_OFFSET: usize = 0x308;
/// Timer or counter mode
pub const MODE_OFFSET: usize = 0x504;
/// Counter width
pub const BITMODE_OFFSET: usize = 0x508;
/// Prescaler
pub const PRESCALER_OFFSET: usize = 0x510;
/// Capture/compare register 0
pub const CC0_OFFSET: usize = 0x540;

// =============================================================================
// Field Values
// =============================================================================

/// MODE: timer
pub const MODE_TIMER: u32 = 0;
/// MODE: low power counter
pub const MODE_LOW_POWER_COUNTER: u32 = 2;

/// BITMODE: 32 bit
pub const BITMODE_32: u32 = 3;

/// SHORTS: COMPARE[0] -> CLEAR
pub const SHORTS_COMPARE0_CLEAR: u32 = 1 << 0;

/// INTEN: COMPARE[0]
pub const INT_COMPARE0: u32 = 1 << 16;

/// Capture channel used for the overflow limit
pub const CC_LIMIT: usize = 0;
/// Capture channel used for snapshots
pub const CC_SNAPSHOT: usize = 1;

// =============================================================================
// Register Block
// =============================================================================

/// TIMER register block at a given base address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRegs {
    base: usize,
}

impl TimerRegs {
    /// Register block at `base`
    pub const fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address
    #[inline(always)]
    pub const fn base(&self) -> usize {
        self.base
    }

    reg_task!(start, TASKS_START_OFFSET, "START");
    reg_task!(stop, TASKS_STOP_OFFSET, "STOP");
    reg_task!(clear, TASKS_CLEAR_OFFSET, "CLEAR");

    reg_rw!(shorts, set_shorts, SHORTS_OFFSET, "SHORTS register");
    reg_wo!(intenset, INTENSET_OFFSET, "INTENSET register");
    reg_wo!(intenclr, INTENCLR_OFFSET, "INTENCLR register");
    reg_rw!(mode, set_mode, MODE_OFFSET, "MODE register");
    reg_rw!(bitmode, set_bitmode, BITMODE_OFFSET, "BITMODE register");
    reg_rw!(prescaler, set_prescaler, PRESCALER_OFFSET, "PRESCALER register");

    /// Address of TASKS_COUNT (event link target)
    #[inline(always)]
    pub const fn count_task_address(&self) -> usize {
        self.base + TASKS_COUNT_OFFSET
    }

    /// Capture the counter into CC[`channel`] and read it back
    #[inline(always)]
    pub fn capture(&self, channel: usize) -> u32 {
        unsafe {
            super::write_reg(self.base + TASKS_CAPTURE0_OFFSET + 4 * channel, 1);
            super::read_reg(self.base + CC0_OFFSET + 4 * channel)
        }
    }

    /// Write CC[`channel`]
    #[inline(always)]
    pub fn set_cc(&self, channel: usize, value: u32) {
        unsafe { super::write_reg(self.base + CC0_OFFSET + 4 * channel, value) }
    }

    /// Whether COMPARE[`channel`] fired
    #[inline(always)]
    pub fn compare_event(&self, channel: usize) -> bool {
        unsafe { super::read_reg(self.base + EVENTS_COMPARE0_OFFSET + 4 * channel) != 0 }
    }

    /// Clear COMPARE[`channel`]
    #[inline(always)]
    pub fn clear_compare_event(&self, channel: usize) {
        unsafe { super::write_reg(self.base + EVENTS_COMPARE0_OFFSET + 4 * channel, 0) }
    }
}

/// Interrupt number for a peripheral at `base`
#[inline(always)]
pub const fn irq_number(base: usize) -> u8 {
    ((base >> 12) & 0xFF) as u8
}
