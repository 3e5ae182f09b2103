//! Byte counter: a TIMER in counter mode clocked by `RXDRDY` over PPI

use crate::driver::error::{Error, Result};
use crate::hal::counter::ByteCounter;
use crate::internal::register::ppi::{PPI_CHANNELS, PpiRegs};
use crate::internal::register::timer::{BITMODE_32, CC_LIMIT, MODE_LOW_POWER_COUNTER, TimerRegs};

/// TIMER instance plus the PPI channel that feeds it
#[derive(Debug)]
pub struct Nrf52ByteCounter {
    timer: TimerRegs,
    ppi_channel: u8,
}

impl Nrf52ByteCounter {
    /// Counter on the TIMER at `timer_base`, linked through `ppi_channel`
    pub const fn new(timer_base: usize, ppi_channel: u8) -> Self {
        Self {
            timer: TimerRegs::new(timer_base),
            ppi_channel,
        }
    }
}

impl ByteCounter for Nrf52ByteCounter {
    const WIDTH_BITS: u32 = 32;

    fn start(&self, event_address: usize) -> Result<()> {
        if self.ppi_channel >= PPI_CHANNELS || PpiRegs::is_enabled(self.ppi_channel) {
            return Err(Error::PlatformError);
        }
        self.timer.stop();
        self.timer.set_mode(MODE_LOW_POWER_COUNTER);
        self.timer.set_bitmode(BITMODE_32);
        self.timer.clear();
        PpiRegs::connect(
            self.ppi_channel,
            event_address,
            self.timer.count_task_address(),
        );
        self.timer.start();
        Ok(())
    }

    fn capture(&self) -> u32 {
        self.timer.capture(CC_LIMIT)
    }

    fn stop(&self) {
        PpiRegs::disconnect(self.ppi_channel);
        self.timer.stop();
        self.timer.clear();
    }
}
