//! NVIC register definitions (Cortex-M4)

use super::write_reg;

/// Interrupt set-enable registers
pub const NVIC_ISER: usize = 0xE000_E100;
/// Interrupt clear-enable registers
pub const NVIC_ICER: usize = 0xE000_E180;
/// Interrupt clear-pending registers
pub const NVIC_ICPR: usize = 0xE000_E280;
/// Interrupt priority registers (one byte per interrupt)
pub const NVIC_IPR: usize = 0xE000_E400;

/// Implemented priority bits on the nRF52840
pub const NVIC_PRIO_BITS: u8 = 3;

/// NVIC access
pub struct Nvic;

impl Nvic {
    /// Set priority, clear pending and enable `irq`
    pub fn enable(irq: u8, priority: u8) {
        let word = 4 * (irq as usize / 32);
        let bit = 1u32 << (irq % 32);
        let prio = priority << (8 - NVIC_PRIO_BITS);
        unsafe {
            // IPR is byte addressable
            core::ptr::write_volatile((NVIC_IPR + irq as usize) as *mut u8, prio);
            write_reg(NVIC_ICPR + word, bit);
            write_reg(NVIC_ISER + word, bit);
        }
    }

    /// Disable `irq` and drop anything pending
    pub fn disable(irq: u8) {
        let word = 4 * (irq as usize / 32);
        let bit = 1u32 << (irq % 32);
        unsafe {
            write_reg(NVIC_ICER + word, bit);
            write_reg(NVIC_ICPR + word, bit);
        }
    }
}
