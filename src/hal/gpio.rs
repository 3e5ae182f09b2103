//! GPIO pin configuration
//!
//! The UART driver does not own pin setup. It asks a [`PinConfig`]
//! collaborator to prepare the pins at init and to hand them back at deinit.
//!
//! | Signal | Init                        | Deinit   |
//! |--------|-----------------------------|----------|
//! | TX     | output, driven high (idle)  | default  |
//! | RTS    | output, driven high         | default  |
//! | RX     | input, no pull              | default  |
//! | CTS    | input, no pull              | default  |

use crate::driver::config::Pin;

/// Input pull resistor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// No pull
    #[default]
    None,
    /// Pull-up
    Up,
    /// Pull-down
    Down,
}

/// GPIO collaborator
pub trait PinConfig {
    /// Make `pin` an output at the given level
    fn configure_output(&self, pin: Pin, high: bool);

    /// Make `pin` an input with `pull`
    fn configure_input(&self, pin: Pin, pull: Pull);

    /// Return `pin` to its reset configuration
    fn restore_default(&self, pin: Pin);
}
