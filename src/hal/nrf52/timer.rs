//! Tick timer: a TIMER at 31.25 kHz that clears itself at the limit

use crate::driver::error::Result;
use crate::hal::timer::TickTimerHw;
use crate::internal::constants::{TICK_HZ, TICK_PRESCALER};
use crate::internal::register::nvic::Nvic;
use crate::internal::register::timer::{
    BITMODE_32, CC_LIMIT, CC_SNAPSHOT, INT_COMPARE0, MODE_TIMER, SHORTS_COMPARE0_CLEAR, TimerRegs,
    irq_number,
};

/// TIMER instance used as the system tick
#[derive(Debug)]
pub struct Nrf52TickTimer {
    regs: TimerRegs,
    irq_priority: u8,
}

impl Nrf52TickTimer {
    /// Tick timer on the TIMER at `base`, interrupting at `irq_priority`
    pub const fn new(base: usize, irq_priority: u8) -> Self {
        Self {
            regs: TimerRegs::new(base),
            irq_priority,
        }
    }

    /// Interrupt number
    pub const fn irq_number(&self) -> u8 {
        irq_number(self.regs.base())
    }
}

impl TickTimerHw for Nrf52TickTimer {
    const TICK_HZ: u32 = TICK_HZ;

    fn start(&self, limit: u32) -> Result<()> {
        self.regs.stop();
        self.regs.clear();
        self.regs.set_mode(MODE_TIMER);
        self.regs.set_bitmode(BITMODE_32);
        self.regs.set_prescaler(TICK_PRESCALER);
        self.regs.set_cc(CC_LIMIT, limit);
        self.regs.set_shorts(SHORTS_COMPARE0_CLEAR);
        self.regs.clear_compare_event(CC_LIMIT);
        self.regs.intenset(INT_COMPARE0);
        Nvic::enable(self.irq_number(), self.irq_priority);
        self.regs.start();
        Ok(())
    }

    fn stop(&self) {
        self.regs.intenclr(INT_COMPARE0);
        Nvic::disable(self.irq_number());
        self.regs.stop();
    }

    fn pause(&self) {
        self.regs.stop();
    }

    fn resume(&self) {
        self.regs.start();
    }

    fn clear(&self) {
        self.regs.clear();
    }

    fn set_limit(&self, limit: u32) {
        self.regs.set_cc(CC_LIMIT, limit);
    }

    fn capture(&self) -> u32 {
        self.regs.capture(CC_SNAPSHOT)
    }

    fn overflow_pending(&self) -> bool {
        self.regs.compare_event(CC_LIMIT)
    }

    fn clear_overflow(&self) {
        self.regs.clear_compare_event(CC_LIMIT);
    }
}
