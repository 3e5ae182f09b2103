//! Configuration types for the UARTE driver

use crate::driver::error::{Error, Result};
use crate::internal::constants::{
    DEFAULT_IRQ_PRIORITY, DEFAULT_RTS_THRESHOLD, DEFAULT_SUB_BUFFER_COUNT,
    DEFAULT_SUB_BUFFER_SIZE, MAX_DMA_TRANSFER, MAX_PIN, MIN_SUB_BUFFER_COUNT,
};

// =============================================================================
// Baud Rate
// =============================================================================

/// Supported UART baud rates
///
/// Only these standard rates are accepted; anything else is rejected with
/// [`Error::InvalidParameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaudRate {
    /// 1200 baud
    Baud1200,
    /// 2400 baud
    Baud2400,
    /// 9600 baud
    Baud9600,
    /// 14400 baud
    Baud14400,
    /// 19200 baud
    Baud19200,
    /// 28800 baud
    Baud28800,
    /// 31250 baud
    Baud31250,
    /// 38400 baud
    Baud38400,
    /// 56000 baud
    Baud56000,
    /// 57600 baud
    Baud57600,
    /// 76800 baud
    Baud76800,
    /// 115200 baud (default)
    #[default]
    Baud115200,
    /// 230400 baud
    Baud230400,
    /// 250000 baud
    Baud250000,
    /// 460800 baud
    Baud460800,
    /// 921600 baud
    Baud921600,
    /// 1 Mbaud
    Baud1M,
}

impl BaudRate {
    /// Every supported rate, slowest first
    pub const ALL: [BaudRate; 17] = [
        BaudRate::Baud1200,
        BaudRate::Baud2400,
        BaudRate::Baud9600,
        BaudRate::Baud14400,
        BaudRate::Baud19200,
        BaudRate::Baud28800,
        BaudRate::Baud31250,
        BaudRate::Baud38400,
        BaudRate::Baud56000,
        BaudRate::Baud57600,
        BaudRate::Baud76800,
        BaudRate::Baud115200,
        BaudRate::Baud230400,
        BaudRate::Baud250000,
        BaudRate::Baud460800,
        BaudRate::Baud921600,
        BaudRate::Baud1M,
    ];

    /// Look up a rate in bits per second
    pub const fn from_bps(bps: u32) -> Result<Self> {
        Ok(match bps {
            1200 => BaudRate::Baud1200,
            2400 => BaudRate::Baud2400,
            9600 => BaudRate::Baud9600,
            14400 => BaudRate::Baud14400,
            19200 => BaudRate::Baud19200,
            28800 => BaudRate::Baud28800,
            31250 => BaudRate::Baud31250,
            38400 => BaudRate::Baud38400,
            56000 => BaudRate::Baud56000,
            57600 => BaudRate::Baud57600,
            76800 => BaudRate::Baud76800,
            115_200 => BaudRate::Baud115200,
            230_400 => BaudRate::Baud230400,
            250_000 => BaudRate::Baud250000,
            460_800 => BaudRate::Baud460800,
            921_600 => BaudRate::Baud921600,
            1_000_000 => BaudRate::Baud1M,
            _ => return Err(Error::InvalidParameter),
        })
    }

    /// Nominal rate in bits per second
    pub const fn bps(self) -> u32 {
        match self {
            BaudRate::Baud1200 => 1200,
            BaudRate::Baud2400 => 2400,
            BaudRate::Baud9600 => 9600,
            BaudRate::Baud14400 => 14400,
            BaudRate::Baud19200 => 19200,
            BaudRate::Baud28800 => 28800,
            BaudRate::Baud31250 => 31250,
            BaudRate::Baud38400 => 38400,
            BaudRate::Baud56000 => 56000,
            BaudRate::Baud57600 => 57600,
            BaudRate::Baud76800 => 76800,
            BaudRate::Baud115200 => 115_200,
            BaudRate::Baud230400 => 230_400,
            BaudRate::Baud250000 => 250_000,
            BaudRate::Baud460800 => 460_800,
            BaudRate::Baud921600 => 921_600,
            BaudRate::Baud1M => 1_000_000,
        }
    }

    /// Value for the UARTE `BAUDRATE` register
    pub const fn register_value(self) -> u32 {
        match self {
            BaudRate::Baud1200 => 0x0004_F000,
            BaudRate::Baud2400 => 0x0009_D000,
            BaudRate::Baud9600 => 0x0027_5000,
            BaudRate::Baud14400 => 0x003A_F000,
            BaudRate::Baud19200 => 0x004E_A000,
            BaudRate::Baud28800 => 0x0075_C000,
            BaudRate::Baud31250 => 0x0080_0000,
            BaudRate::Baud38400 => 0x009D_0000,
            BaudRate::Baud56000 => 0x00E5_0000,
            BaudRate::Baud57600 => 0x00EB_0000,
            BaudRate::Baud76800 => 0x013A_9000,
            BaudRate::Baud115200 => 0x01D6_0000,
            BaudRate::Baud230400 => 0x03B0_0000,
            BaudRate::Baud250000 => 0x0400_0000,
            BaudRate::Baud460800 => 0x0740_0000,
            BaudRate::Baud921600 => 0x0F00_0000,
            BaudRate::Baud1M => 0x1000_0000,
        }
    }
}

// =============================================================================
// Pins
// =============================================================================

/// GPIO pin number (`port * 32 + index`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(u8);

impl Pin {
    /// Create a pin from its absolute number (0..=47 on the nRF52840)
    pub const fn new(number: u8) -> Result<Self> {
        if number > MAX_PIN {
            return Err(Error::InvalidParameter);
        }
        Ok(Self(number))
    }

    /// Create a pin from port and index (e.g. P1.02 is `from_port(1, 2)`)
    pub const fn from_port(port: u8, index: u8) -> Result<Self> {
        if port > 1 || index > 31 {
            return Err(Error::InvalidParameter);
        }
        Self::new(port * 32 + index)
    }

    /// Absolute pin number
    #[inline(always)]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// GPIO port (0 or 1)
    #[inline(always)]
    pub const fn port(self) -> u8 {
        self.0 / 32
    }

    /// Index within the port
    #[inline(always)]
    pub const fn index(self) -> u8 {
        self.0 % 32
    }

    /// Interpret a port-layer pin argument, where a negative value means
    /// "not connected"
    pub fn from_arg(arg: i32) -> Result<Option<Self>> {
        if arg < 0 {
            return Ok(None);
        }
        let number = u8::try_from(arg).map_err(|_| Error::InvalidParameter)?;
        Self::new(number).map(Some)
    }
}

// =============================================================================
// Receive Buffer Geometry
// =============================================================================

/// Receive ring geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxBufferConfig {
    /// Bytes per sub-buffer (one EasyDMA transfer)
    pub sub_buffer_size: usize,
    /// Number of sub-buffers in the ring (at least 2)
    pub sub_buffer_count: usize,
}

impl Default for RxBufferConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SUB_BUFFER_SIZE, DEFAULT_SUB_BUFFER_COUNT)
    }
}

impl RxBufferConfig {
    /// Create a geometry of `count` sub-buffers of `size` bytes
    pub const fn new(sub_buffer_size: usize, sub_buffer_count: usize) -> Self {
        Self {
            sub_buffer_size,
            sub_buffer_count,
        }
    }

    /// Derive the geometry from a total ring size and sub-buffer size
    pub const fn from_total(total: usize, sub_buffer_size: usize) -> Result<Self> {
        if sub_buffer_size == 0 {
            return Err(Error::InvalidParameter);
        }
        let config = Self::new(sub_buffer_size, total / sub_buffer_size);
        match config.validate() {
            Ok(()) => Ok(config),
            Err(e) => Err(e),
        }
    }

    /// Total ring capacity in bytes
    pub const fn capacity(&self) -> usize {
        self.sub_buffer_size * self.sub_buffer_count
    }

    /// Check the geometry against the EasyDMA limits
    pub const fn validate(&self) -> Result<()> {
        if self.sub_buffer_size == 0 || self.sub_buffer_size > MAX_DMA_TRANSFER {
            return Err(Error::InvalidParameter);
        }
        if self.sub_buffer_count < MIN_SUB_BUFFER_COUNT {
            return Err(Error::InvalidParameter);
        }
        if self.sub_buffer_size.checked_mul(self.sub_buffer_count).is_none() {
            return Err(Error::InvalidParameter);
        }
        Ok(())
    }
}

// =============================================================================
// Channel Configuration
// =============================================================================

/// Configuration for one UART channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Transmit pin
    pub tx: Pin,
    /// Receive pin
    pub rx: Pin,
    /// Clear-to-send input, enables hardware flow control when set
    pub cts: Option<Pin>,
    /// Request-to-send output, enables hardware flow control when set
    pub rts: Option<Pin>,
    /// Line rate
    pub baud_rate: BaudRate,
    /// RTS threshold in bytes (kept for the AT layer)
    pub rts_threshold: usize,
    /// Receive ring geometry
    pub rx_buffer: RxBufferConfig,
    /// NVIC priority of the UARTE interrupt
    pub irq_priority: u8,
}

impl UartConfig {
    /// Create a configuration with default rate and ring on the given pins
    pub const fn new(tx: Pin, rx: Pin) -> Self {
        Self {
            tx,
            rx,
            cts: None,
            rts: None,
            baud_rate: BaudRate::Baud115200,
            rts_threshold: DEFAULT_RTS_THRESHOLD,
            rx_buffer: RxBufferConfig::new(DEFAULT_SUB_BUFFER_SIZE, DEFAULT_SUB_BUFFER_COUNT),
            irq_priority: DEFAULT_IRQ_PRIORITY,
        }
    }

    /// Build a configuration from port-layer arguments
    ///
    /// Pins are signed with negative meaning "not connected"; TX and RX are
    /// mandatory.
    pub fn from_args(
        tx: i32,
        rx: i32,
        cts: i32,
        rts: i32,
        baud_rate: u32,
        rts_threshold: usize,
    ) -> Result<Self> {
        let tx = Pin::from_arg(tx)?.ok_or(Error::InvalidParameter)?;
        let rx = Pin::from_arg(rx)?.ok_or(Error::InvalidParameter)?;
        let mut config = Self::new(tx, rx)
            .with_baud_rate(BaudRate::from_bps(baud_rate)?)
            .with_rts_threshold(rts_threshold);
        config.cts = Pin::from_arg(cts)?;
        config.rts = Pin::from_arg(rts)?;
        Ok(config)
    }

    /// Set the CTS pin
    #[must_use]
    pub const fn with_cts(mut self, pin: Pin) -> Self {
        self.cts = Some(pin);
        self
    }

    /// Set the RTS pin
    #[must_use]
    pub const fn with_rts(mut self, pin: Pin) -> Self {
        self.rts = Some(pin);
        self
    }

    /// Set the baud rate
    #[must_use]
    pub const fn with_baud_rate(mut self, baud_rate: BaudRate) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the RTS threshold
    #[must_use]
    pub const fn with_rts_threshold(mut self, threshold: usize) -> Self {
        self.rts_threshold = threshold;
        self
    }

    /// Set the receive ring geometry
    #[must_use]
    pub const fn with_rx_buffer(mut self, sub_buffer_size: usize, sub_buffer_count: usize) -> Self {
        self.rx_buffer = RxBufferConfig::new(sub_buffer_size, sub_buffer_count);
        self
    }

    /// Set the interrupt priority (0..=7)
    #[must_use]
    pub const fn with_irq_priority(mut self, priority: u8) -> Self {
        self.irq_priority = priority;
        self
    }

    /// Whether hardware flow control will be enabled
    pub const fn hardware_flow_control(&self) -> bool {
        self.cts.is_some() || self.rts.is_some()
    }

    /// Check pins and ring geometry
    pub fn validate(&self) -> Result<()> {
        if self.tx == self.rx {
            return Err(Error::InvalidParameter);
        }
        for pin in [self.cts, self.rts].into_iter().flatten() {
            if pin == self.tx || pin == self.rx {
                return Err(Error::InvalidParameter);
            }
        }
        if matches!((self.cts, self.rts), (Some(c), Some(r)) if c == r) {
            return Err(Error::InvalidParameter);
        }
        if self.irq_priority > 7 {
            return Err(Error::InvalidParameter);
        }
        self.rx_buffer.validate()
    }
}

// =============================================================================
// Channel State
// =============================================================================

/// Channel lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Not initialised, or deinitialised
    #[default]
    Closed,
    /// Receiving continuously into the ring
    Open,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(n: u8) -> Pin {
        Pin::new(n).unwrap()
    }

    // =========================================================================
    // Baud Rate Tests
    // =========================================================================

    #[test]
    fn baud_rate_lookup_covers_every_variant() {
        for rate in BaudRate::ALL {
            assert_eq!(BaudRate::from_bps(rate.bps()), Ok(rate));
        }
    }

    #[test]
    fn baud_rate_rejects_unknown() {
        assert_eq!(BaudRate::from_bps(0), Err(Error::InvalidParameter));
        assert_eq!(BaudRate::from_bps(4800), Err(Error::InvalidParameter));
        assert_eq!(BaudRate::from_bps(115_201), Err(Error::InvalidParameter));
        assert_eq!(BaudRate::from_bps(3_000_000), Err(Error::InvalidParameter));
    }

    #[test]
    fn baud_rate_register_values_increase() {
        for pair in BaudRate::ALL.windows(2) {
            assert!(pair[0].register_value() < pair[1].register_value());
        }
        assert_eq!(BaudRate::Baud115200.register_value(), 0x01D6_0000);
        assert_eq!(BaudRate::default(), BaudRate::Baud115200);
        assert_eq!(
            BaudRate::default().bps(),
            crate::internal::constants::DEFAULT_BAUD_RATE
        );
    }

    // =========================================================================
    // Pin Tests
    // =========================================================================

    #[test]
    fn pin_range() {
        assert!(Pin::new(0).is_ok());
        assert!(Pin::new(47).is_ok());
        assert_eq!(Pin::new(48), Err(Error::InvalidParameter));
    }

    #[test]
    fn pin_port_and_index() {
        let p = Pin::from_port(1, 2).unwrap();
        assert_eq!(p.number(), 34);
        assert_eq!(p.port(), 1);
        assert_eq!(p.index(), 2);
        assert_eq!(Pin::from_port(2, 0), Err(Error::InvalidParameter));
        assert_eq!(Pin::from_port(1, 16), Err(Error::InvalidParameter));
    }

    #[test]
    fn pin_from_arg() {
        assert_eq!(Pin::from_arg(-1), Ok(None));
        assert_eq!(Pin::from_arg(5), Ok(Some(pin(5))));
        assert_eq!(Pin::from_arg(300), Err(Error::InvalidParameter));
    }

    // =========================================================================
    // Ring Geometry Tests
    // =========================================================================

    #[test]
    fn rx_buffer_default_is_1k() {
        let rx = RxBufferConfig::default();
        assert_eq!(rx.sub_buffer_size, 256);
        assert_eq!(rx.sub_buffer_count, 4);
        assert_eq!(rx.capacity(), 1024);
        assert!(rx.validate().is_ok());
    }

    #[test]
    fn rx_buffer_needs_two_sub_buffers() {
        assert_eq!(
            RxBufferConfig::new(128, 1).validate(),
            Err(Error::InvalidParameter)
        );
        assert!(RxBufferConfig::new(128, 2).validate().is_ok());
    }

    #[test]
    fn rx_buffer_size_limits() {
        assert_eq!(
            RxBufferConfig::new(0, 4).validate(),
            Err(Error::InvalidParameter)
        );
        assert_eq!(
            RxBufferConfig::new(MAX_DMA_TRANSFER + 1, 2).validate(),
            Err(Error::InvalidParameter)
        );
        assert!(RxBufferConfig::new(MAX_DMA_TRANSFER, 2).validate().is_ok());
    }

    #[test]
    fn rx_buffer_from_total() {
        let rx = RxBufferConfig::from_total(512, 128).unwrap();
        assert_eq!(rx.sub_buffer_count, 4);
        assert_eq!(
            RxBufferConfig::from_total(128, 128),
            Err(Error::InvalidParameter)
        );
        assert_eq!(RxBufferConfig::from_total(512, 0), Err(Error::InvalidParameter));
    }

    // =========================================================================
    // Channel Configuration Tests
    // =========================================================================

    #[test]
    fn config_defaults() {
        let config = UartConfig::new(pin(6), pin(8));
        assert_eq!(config.baud_rate, BaudRate::Baud115200);
        assert_eq!(config.rts_threshold, 100);
        assert_eq!(config.rx_buffer.capacity(), 1024);
        assert!(!config.hardware_flow_control());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder() {
        let config = UartConfig::new(pin(6), pin(8))
            .with_cts(pin(7))
            .with_rts(pin(5))
            .with_baud_rate(BaudRate::Baud921600)
            .with_rts_threshold(64)
            .with_rx_buffer(128, 4)
            .with_irq_priority(6);

        assert_eq!(config.cts, Some(pin(7)));
        assert_eq!(config.rts, Some(pin(5)));
        assert_eq!(config.baud_rate, BaudRate::Baud921600);
        assert_eq!(config.rts_threshold, 64);
        assert_eq!(config.rx_buffer.capacity(), 512);
        assert_eq!(config.irq_priority, 6);
        assert!(config.hardware_flow_control());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_shared_pins() {
        assert!(UartConfig::new(pin(6), pin(6)).validate().is_err());
        assert!(
            UartConfig::new(pin(6), pin(8))
                .with_cts(pin(8))
                .validate()
                .is_err()
        );
        assert!(
            UartConfig::new(pin(6), pin(8))
                .with_cts(pin(3))
                .with_rts(pin(3))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn config_rejects_bad_priority() {
        assert!(
            UartConfig::new(pin(6), pin(8))
                .with_irq_priority(8)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn config_from_args() {
        let config = UartConfig::from_args(6, 8, -1, 5, 115_200, 100).unwrap();
        assert_eq!(config.tx, pin(6));
        assert_eq!(config.rx, pin(8));
        assert_eq!(config.cts, None);
        assert_eq!(config.rts, Some(pin(5)));
        assert!(config.hardware_flow_control());

        assert_eq!(
            UartConfig::from_args(-1, 8, -1, -1, 115_200, 100),
            Err(Error::InvalidParameter)
        );
        assert_eq!(
            UartConfig::from_args(6, 8, -1, -1, 12345, 100),
            Err(Error::InvalidParameter)
        );
        assert_eq!(
            UartConfig::from_args(6, 99, -1, -1, 115_200, 100),
            Err(Error::InvalidParameter)
        );
    }

    #[test]
    fn state_default_is_closed() {
        assert_eq!(State::default(), State::Closed);
    }
}
