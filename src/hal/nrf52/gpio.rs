//! GPIO P0 / P1

use crate::driver::config::Pin;
use crate::hal::gpio::{PinConfig, Pull};
use crate::internal::register::gpio::{
    PIN_CNF_DEFAULT, PIN_CNF_OUTPUT, PULL_DISABLED, PULL_DOWN, PULL_UP, pin_cnf_input,
    set_output, set_pin_cnf,
};

/// Direct PIN_CNF configuration
#[derive(Debug, Default)]
pub struct Nrf52Gpio;

impl PinConfig for Nrf52Gpio {
    fn configure_output(&self, pin: Pin, high: bool) {
        // level first so the line never glitches low
        set_output(pin.number(), high);
        set_pin_cnf(pin.number(), PIN_CNF_OUTPUT);
    }

    fn configure_input(&self, pin: Pin, pull: Pull) {
        let pull = match pull {
            Pull::None => PULL_DISABLED,
            Pull::Up => PULL_UP,
            Pull::Down => PULL_DOWN,
        };
        set_pin_cnf(pin.number(), pin_cnf_input(pull));
    }

    fn restore_default(&self, pin: Pin) {
        set_pin_cnf(pin.number(), PIN_CNF_DEFAULT);
    }
}
