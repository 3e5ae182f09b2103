//! nRF52840 implementations of the hardware traits
//!
//! | Trait                                        | Type                | Peripheral      |
//! |----------------------------------------------|---------------------|-----------------|
//! | [`Uarte`](super::Uarte), [`InterruptSource`](super::InterruptSource) | [`Nrf52Uarte`] | UARTE0 / UARTE1 |
//! | [`ByteCounter`](super::ByteCounter)          | [`Nrf52ByteCounter`]| TIMERn + PPI    |
//! | [`TickTimerHw`](super::TickTimerHw)          | [`Nrf52TickTimer`]  | TIMERn          |
//! | [`PinConfig`](super::PinConfig)              | [`Nrf52Gpio`]       | P0 / P1         |
//!
//! The caller decides which TIMER and PPI channel each role gets; two roles
//! must never share an instance.

mod counter;
mod gpio;
mod timer;
mod uarte;

pub use counter::Nrf52ByteCounter;
pub use gpio::Nrf52Gpio;
pub use timer::Nrf52TickTimer;
pub use uarte::Nrf52Uarte;

/// Bit positions set in `mask`
#[inline]
pub(crate) fn bits(mask: u32) -> impl Iterator<Item = u32> {
    (0..32).filter(move |b| mask & (1 << b) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_of_mask() {
        let mut it = bits(0b1001_0001);
        assert_eq!(it.next(), Some(0));
        assert_eq!(it.next(), Some(4));
        assert_eq!(it.next(), Some(7));
        assert_eq!(it.next(), None);
        assert_eq!(bits(0).count(), 0);
        assert_eq!(bits(u32::MAX).count(), 32);
    }
}
