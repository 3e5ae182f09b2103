//! PPI (programmable peripheral interconnect) register definitions

use super::{read_reg, write_reg};

/// PPI base address
pub const PPI_BASE: usize = 0x4001_F000;

/// Channel enable
pub const CHEN_OFFSET: usize = 0x500;
/// Channel enable set
pub const CHENSET_OFFSET: usize = 0x504;
/// Channel enable clear
pub const CHENCLR_OFFSET: usize = 0x508;
/// CH[0].EEP (event end point); CH[n] is 8 bytes further per channel
pub const CH0_EEP_OFFSET: usize = 0x510;
/// CH[0].TEP (task end point)
pub const CH0_TEP_OFFSET: usize = 0x514;

/// Number of programmable channels
pub const PPI_CHANNELS: u8 = 20;

/// PPI register access
pub struct PpiRegs;

impl PpiRegs {
    /// Whether `channel` is enabled
    #[inline(always)]
    pub fn is_enabled(channel: u8) -> bool {
        unsafe { read_reg(PPI_BASE + CHEN_OFFSET) & (1 << channel) != 0 }
    }

    /// Wire `event` to `task` on `channel` and enable it
    #[inline(always)]
    pub fn connect(channel: u8, event: usize, task: usize) {
        let offset = 8 * channel as usize;
        unsafe {
            write_reg(PPI_BASE + CH0_EEP_OFFSET + offset, event as u32);
            write_reg(PPI_BASE + CH0_TEP_OFFSET + offset, task as u32);
            write_reg(PPI_BASE + CHENSET_OFFSET, 1 << channel);
        }
    }

    /// Disable `channel` and clear its end points
    #[inline(always)]
    pub fn disconnect(channel: u8) {
        let offset = 8 * channel as usize;
        unsafe {
            write_reg(PPI_BASE + CHENCLR_OFFSET, 1 << channel);
            write_reg(PPI_BASE + CH0_EEP_OFFSET + offset, 0);
            write_reg(PPI_BASE + CH0_TEP_OFFSET + offset, 0);
        }
    }
}
