//! GPIO register definitions (P0 and P1)
//!
//! | Port | Base        | Pins     |
//! |------|-------------|----------|
//! | P0   | 0x5000_0000 | 0..=31   |
//! | P1   | 0x5000_0300 | 32..=47  |

use super::write_reg;

// =============================================================================
// Base Addresses
// =============================================================================

/// P0 base address
pub const P0_BASE: usize = 0x5000_0000;
/// P1 base address
pub const P1_BASE: usize = 0x5000_0300;

/// Set output bits
pub const OUTSET_OFFSET: usize = 0x508;
/// Clear output bits
pub const OUTCLR_OFFSET: usize = 0x50C;
/// PIN_CNF[0]; PIN_CNF[n] is 4 bytes further per pin
pub const PIN_CNF0_OFFSET: usize = 0x700;

// =============================================================================
// PIN_CNF Fields
// =============================================================================

/// DIR: output
pub const PIN_CNF_DIR_OUTPUT: u32 = 1 << 0;
/// INPUT: disconnect input buffer
pub const PIN_CNF_INPUT_DISCONNECT: u32 = 1 << 1;
/// PULL field shift
pub const PIN_CNF_PULL_SHIFT: u32 = 2;
/// PULL: disabled
pub const PULL_DISABLED: u32 = 0;
/// PULL: pull-down
pub const PULL_DOWN: u32 = 1;
/// PULL: pull-up
pub const PULL_UP: u32 = 3;

/// Reset value of PIN_CNF (input, buffer disconnected, no pull)
pub const PIN_CNF_DEFAULT: u32 = PIN_CNF_INPUT_DISCONNECT;

/// Output, input buffer disconnected, standard drive
pub const PIN_CNF_OUTPUT: u32 = PIN_CNF_DIR_OUTPUT | PIN_CNF_INPUT_DISCONNECT;

/// Port base for an absolute pin number
#[inline(always)]
pub const fn port_base(pin: u8) -> usize {
    if pin < 32 { P0_BASE } else { P1_BASE }
}

/// Write PIN_CNF for `pin`
#[inline(always)]
pub fn set_pin_cnf(pin: u8, value: u32) {
    let addr = port_base(pin) + PIN_CNF0_OFFSET + 4 * (pin as usize % 32);
    unsafe { write_reg(addr, value) }
}

/// Drive `pin` high or low
#[inline(always)]
pub fn set_output(pin: u8, high: bool) {
    let offset = if high { OUTSET_OFFSET } else { OUTCLR_OFFSET };
    unsafe { write_reg(port_base(pin) + offset, 1 << (pin % 32)) }
}

/// PIN_CNF value for an input with the given pull
#[inline(always)]
pub const fn pin_cnf_input(pull: u32) -> u32 {
    pull << PIN_CNF_PULL_SHIFT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_selection() {
        assert_eq!(port_base(0), P0_BASE);
        assert_eq!(port_base(31), P0_BASE);
        assert_eq!(port_base(32), P1_BASE);
        assert_eq!(port_base(47), P1_BASE);
    }

    #[test]
    fn pin_cnf_values() {
        assert_eq!(PIN_CNF_DEFAULT, 0x2);
        assert_eq!(PIN_CNF_OUTPUT, 0x3);
        assert_eq!(pin_cnf_input(PULL_DISABLED), 0);
        assert_eq!(pin_cnf_input(PULL_UP), 0xC);
    }
}
