//! UARTE0 / UARTE1

use super::bits;
use crate::driver::config::{BaudRate, Pin};
use crate::hal::uarte::{InterruptSource, UartPins, Uarte, UarteTask};
use crate::internal::register::nvic::Nvic;
use crate::internal::register::timer::irq_number;
use crate::internal::register::uarte::{
    CONFIG_HWFC, ENABLE_DISABLED, ENABLE_ENABLED, INT_RXDRDY_BIT, PSEL_DISCONNECTED, UARTE0_BASE,
    UARTE1_BASE, UarteRegs, psel, psel_pin,
};

/// UARTE instance
#[derive(Debug)]
pub struct Nrf52Uarte {
    regs: UarteRegs,
}

impl Nrf52Uarte {
    /// UARTE0
    pub const fn uarte0() -> Self {
        Self {
            regs: UarteRegs::new(UARTE0_BASE),
        }
    }

    /// UARTE1
    pub const fn uarte1() -> Self {
        Self {
            regs: UarteRegs::new(UARTE1_BASE),
        }
    }

    /// Register block
    pub const fn regs(&self) -> &UarteRegs {
        &self.regs
    }
}

fn encode(pin: Option<Pin>) -> u32 {
    pin.map_or(PSEL_DISCONNECTED, |p| psel(p.number()))
}

fn decode(value: u32) -> Option<Pin> {
    psel_pin(value).and_then(|n| Pin::new(n).ok())
}

impl Uarte for Nrf52Uarte {
    fn configure(&self, baud_rate: BaudRate, hardware_flow_control: bool) {
        self.regs.set_baudrate(baud_rate.register_value());
        self.regs
            .set_config(if hardware_flow_control { CONFIG_HWFC } else { 0 });
    }

    fn set_pins(&self, pins: UartPins) {
        self.regs.set_psel_txd(encode(pins.tx));
        self.regs.set_psel_rxd(encode(pins.rx));
        self.regs.set_psel_cts(encode(pins.cts));
        self.regs.set_psel_rts(encode(pins.rts));
    }

    fn pins(&self) -> UartPins {
        UartPins {
            tx: decode(self.regs.psel_txd()),
            rx: decode(self.regs.psel_rxd()),
            cts: decode(self.regs.psel_cts()),
            rts: decode(self.regs.psel_rts()),
        }
    }

    fn enable(&self) {
        self.regs.set_enable(ENABLE_ENABLED);
    }

    fn disable(&self) {
        self.regs.set_enable(ENABLE_DISABLED);
    }

    fn trigger(&self, task: UarteTask) {
        match task {
            UarteTask::StartRx => self.regs.start_rx(),
            UarteTask::StopRx => self.regs.stop_rx(),
            UarteTask::StartTx => self.regs.start_tx(),
            UarteTask::StopTx => self.regs.stop_tx(),
            UarteTask::FlushRx => self.regs.flush_rx(),
        }
    }

    fn pending_events(&self, mask: u32) -> u32 {
        bits(mask)
            .filter(|&bit| self.regs.event(bit))
            .fold(0, |acc, bit| acc | (1 << bit))
    }

    fn clear_events(&self, mask: u32) {
        for bit in bits(mask) {
            self.regs.clear_event(bit);
        }
    }

    fn enable_interrupts(&self, mask: u32) {
        self.regs.intenset(mask);
    }

    fn disable_interrupts(&self, mask: u32) {
        self.regs.intenclr(mask);
    }

    fn enable_shorts(&self, mask: u32) {
        self.regs.set_shorts(self.regs.shorts() | mask);
    }

    fn disable_shorts(&self, mask: u32) {
        self.regs.set_shorts(self.regs.shorts() & !mask);
    }

    fn set_rx_buffer(&self, ptr: *mut u8, len: usize) {
        self.regs.set_rxd_ptr(ptr as u32);
        self.regs.set_rxd_maxcnt(len as u32);
    }

    fn set_tx_buffer(&self, ptr: *const u8, len: usize) {
        self.regs.set_txd_ptr(ptr as u32);
        self.regs.set_txd_maxcnt(len as u32);
    }

    fn take_error_source(&self) -> u32 {
        let source = self.regs.errorsrc();
        // write-1-to-clear
        self.regs.set_errorsrc(source);
        source
    }

    fn rx_ready_event_address(&self) -> usize {
        self.regs.event_address(INT_RXDRDY_BIT)
    }
}

impl InterruptSource for Nrf52Uarte {
    fn irq_number(&self) -> u8 {
        irq_number(self.regs.base())
    }

    fn enable_irq(&self, priority: u8) {
        Nvic::enable(self.irq_number(), priority);
    }

    fn disable_irq(&self) {
        Nvic::disable(self.irq_number());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instances() {
        assert_eq!(Nrf52Uarte::uarte0().irq_number(), 2);
        assert_eq!(Nrf52Uarte::uarte1().irq_number(), 40);
        assert_eq!(
            Nrf52Uarte::uarte0().rx_ready_event_address(),
            UARTE0_BASE + 0x108
        );
    }

    #[test]
    fn pin_encoding() {
        let pin = Pin::new(40).unwrap();
        assert_eq!(decode(encode(Some(pin))), Some(pin));
        assert_eq!(encode(None), PSEL_DISCONNECTED);
        assert_eq!(decode(PSEL_DISCONNECTED), None);
        // reset value of PSEL registers
        assert_eq!(decode(0xFFFF_FFFF), None);
        // field can encode 48..=63, which the nRF52840 does not have
        assert_eq!(decode(60), None);
    }
}
