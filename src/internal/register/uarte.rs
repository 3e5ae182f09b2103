//! UARTE (UART with EasyDMA) register definitions

use super::{event_offset, reg_rw, reg_task, reg_wo};

// =============================================================================
// Base Addresses
// =============================================================================

/// UARTE0 base address
pub const UARTE0_BASE: usize = 0x4000_2000;

/// UARTE1 base address
pub const UARTE1_BASE: usize = 0x4002_8000;

// =============================================================================
// Register Offsets
// =============================================================================

/// Start receiver
pub const TASKS_STARTRX_OFFSET: usize = 0x000;
/// Stop receiver
pub const TASKS_STOPRX_OFFSET: usize = 0x004;
/// Start transmitter
pub const TASKS_STARTTX_OFFSET: usize = 0x008;
/// Stop transmitter
pub const TASKS_STOPTX_OFFSET: usize = 0x00C;
/// Flush RX FIFO into the RX buffer
pub const TASKS_FLUSHRX_OFFSET: usize = 0x02C;

/// Byte received (one per byte, feeds the byte counter)
pub const EVENTS_RXDRDY_OFFSET: usize = 0x108;
/// Receive buffer filled
pub const EVENTS_ENDRX_OFFSET: usize = 0x110;
/// Transmit buffer sent
pub const EVENTS_ENDTX_OFFSET: usize = 0x120;
/// Line error
pub const EVENTS_ERROR_OFFSET: usize = 0x124;
/// Receiver timeout (receiver stopped)
pub const EVENTS_RXTO_OFFSET: usize = 0x144;
/// RXD.PTR latched, receiver running
pub const EVENTS_RXSTARTED_OFFSET: usize = 0x14C;
/// Transmitter stopped
pub const EVENTS_TXSTOPPED_OFFSET: usize = 0x158;

/// Shortcuts
pub const SHORTS_OFFSET: usize = 0x200;
/// Enable interrupts
pub const INTENSET_OFFSET: usize = 0x304;
/// Disable interrupts
pub const INTENCLR_OFFSET: usize = 0x308;
/// Error source (write 1 to clear)
pub const ERRORSRC_OFFSET: usize = 0x480;
/// Enable UARTE
pub const ENABLE_OFFSET: usize = 0x500;
/// RTS pin select
pub const PSEL_RTS_OFFSET: usize = 0x508;
/// TXD pin select
pub const PSEL_TXD_OFFSET: usize = 0x50C;
/// CTS pin select
pub const PSEL_CTS_OFFSET: usize = 0x510;
/// RXD pin select
pub const PSEL_RXD_OFFSET: usize = 0x514;
/// Baud rate
pub const BAUDRATE_OFFSET: usize = 0x524;
/// RX data pointer
pub const RXD_PTR_OFFSET: usize = 0x534;
/// Maximum number of bytes in the RX buffer
pub const RXD_MAXCNT_OFFSET: usize = 0x538;
/// TX data pointer
pub const TXD_PTR_OFFSET: usize = 0x544;
/// Maximum number of bytes in the TX buffer
pub const TXD_MAXCNT_OFFSET: usize = 0x548;
/// Parity and hardware flow control
pub const CONFIG_OFFSET: usize = 0x56C;

// =============================================================================
// Interrupt / Event Bits
// =============================================================================

/// CTS activated
pub const INT_CTS_BIT: u32 = 0;
/// CTS deactivated
pub const INT_NCTS_BIT: u32 = 1;
/// Byte received
pub const INT_RXDRDY_BIT: u32 = 2;
/// Receive buffer filled
pub const INT_ENDRX_BIT: u32 = 4;
/// Byte sent
pub const INT_TXDRDY_BIT: u32 = 7;
/// Transmit buffer sent
pub const INT_ENDTX_BIT: u32 = 8;
/// Line error
pub const INT_ERROR_BIT: u32 = 9;
/// Receiver timeout
pub const INT_RXTO_BIT: u32 = 17;
/// Receiver started
pub const INT_RXSTARTED_BIT: u32 = 19;
/// Transmitter started
pub const INT_TXSTARTED_BIT: u32 = 20;
/// Transmitter stopped
pub const INT_TXSTOPPED_BIT: u32 = 22;

/// CTS activated mask
pub const INT_CTS: u32 = 1 << INT_CTS_BIT;
/// CTS deactivated mask
pub const INT_NCTS: u32 = 1 << INT_NCTS_BIT;
/// Byte received mask
pub const INT_RXDRDY: u32 = 1 << INT_RXDRDY_BIT;
/// Receive buffer filled mask
pub const INT_ENDRX: u32 = 1 << INT_ENDRX_BIT;
/// Byte sent mask
pub const INT_TXDRDY: u32 = 1 << INT_TXDRDY_BIT;
/// Transmit buffer sent mask
pub const INT_ENDTX: u32 = 1 << INT_ENDTX_BIT;
/// Line error mask
pub const INT_ERROR: u32 = 1 << INT_ERROR_BIT;
/// Receiver timeout mask
pub const INT_RXTO: u32 = 1 << INT_RXTO_BIT;
/// Receiver started mask
pub const INT_RXSTARTED: u32 = 1 << INT_RXSTARTED_BIT;
/// Transmitter started mask
pub const INT_TXSTARTED: u32 = 1 << INT_TXSTARTED_BIT;
/// Transmitter stopped mask
pub const INT_TXSTOPPED: u32 = 1 << INT_TXSTOPPED_BIT;

/// Every event the driver knows about
pub const INT_ALL: u32 = INT_CTS
    | INT_NCTS
    | INT_RXDRDY
    | INT_ENDRX
    | INT_TXDRDY
    | INT_ENDTX
    | INT_ERROR
    | INT_RXTO
    | INT_RXSTARTED
    | INT_TXSTARTED
    | INT_TXSTOPPED;

// =============================================================================
// Field Values
// =============================================================================

/// SHORTS: ENDRX -> STARTRX
pub const SHORTS_ENDRX_STARTRX: u32 = 1 << 5;
/// SHORTS: ENDRX -> STOPRX
pub const SHORTS_ENDRX_STOPRX: u32 = 1 << 6;

/// ENABLE value that turns the UARTE on
pub const ENABLE_ENABLED: u32 = 8;
/// ENABLE value that turns the UARTE off
pub const ENABLE_DISABLED: u32 = 0;

/// PSEL.CONNECT bit; set means the signal is disconnected
pub const PSEL_DISCONNECTED: u32 = 1 << 31;
/// PSEL pin field (port in bit 5, pin in bits 0..4)
pub const PSEL_PIN_MASK: u32 = 0x3F;

/// CONFIG.HWFC
pub const CONFIG_HWFC: u32 = 1 << 0;

/// ERRORSRC: overrun
pub const ERRORSRC_OVERRUN: u32 = 1 << 0;
/// ERRORSRC: parity
pub const ERRORSRC_PARITY: u32 = 1 << 1;
/// ERRORSRC: framing
pub const ERRORSRC_FRAMING: u32 = 1 << 2;
/// ERRORSRC: break
pub const ERRORSRC_BREAK: u32 = 1 << 3;

// =============================================================================
// Register Block
// =============================================================================

/// UARTE register block at a given base address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UarteRegs {
    base: usize,
}

impl UarteRegs {
    /// Register block at `base`
    pub const fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address
    #[inline(always)]
    pub const fn base(&self) -> usize {
        self.base
    }

    reg_task!(start_rx, TASKS_STARTRX_OFFSET, "STARTRX");
    reg_task!(stop_rx, TASKS_STOPRX_OFFSET, "STOPRX");
    reg_task!(start_tx, TASKS_STARTTX_OFFSET, "STARTTX");
    reg_task!(stop_tx, TASKS_STOPTX_OFFSET, "STOPTX");
    reg_task!(flush_rx, TASKS_FLUSHRX_OFFSET, "FLUSHRX");

    reg_rw!(shorts, set_shorts, SHORTS_OFFSET, "SHORTS register");
    reg_wo!(intenset, INTENSET_OFFSET, "INTENSET register");
    reg_wo!(intenclr, INTENCLR_OFFSET, "INTENCLR register");
    reg_rw!(errorsrc, set_errorsrc, ERRORSRC_OFFSET, "ERRORSRC register");
    reg_rw!(enable, set_enable, ENABLE_OFFSET, "ENABLE register");
    reg_rw!(psel_rts, set_psel_rts, PSEL_RTS_OFFSET, "PSEL.RTS register");
    reg_rw!(psel_txd, set_psel_txd, PSEL_TXD_OFFSET, "PSEL.TXD register");
    reg_rw!(psel_cts, set_psel_cts, PSEL_CTS_OFFSET, "PSEL.CTS register");
    reg_rw!(psel_rxd, set_psel_rxd, PSEL_RXD_OFFSET, "PSEL.RXD register");
    reg_rw!(baudrate, set_baudrate, BAUDRATE_OFFSET, "BAUDRATE register");
    reg_rw!(rxd_ptr, set_rxd_ptr, RXD_PTR_OFFSET, "RXD.PTR register");
    reg_rw!(rxd_maxcnt, set_rxd_maxcnt, RXD_MAXCNT_OFFSET, "RXD.MAXCNT register");
    reg_rw!(txd_ptr, set_txd_ptr, TXD_PTR_OFFSET, "TXD.PTR register");
    reg_rw!(txd_maxcnt, set_txd_maxcnt, TXD_MAXCNT_OFFSET, "TXD.MAXCNT register");
    reg_rw!(config, set_config, CONFIG_OFFSET, "CONFIG register");

    /// Whether the event for INTEN bit `bit` is set
    #[inline(always)]
    pub fn event(&self, bit: u32) -> bool {
        unsafe { super::read_reg(self.base + event_offset(bit)) != 0 }
    }

    /// Clear the event for INTEN bit `bit`
    #[inline(always)]
    pub fn clear_event(&self, bit: u32) {
        unsafe { super::write_reg(self.base + event_offset(bit), 0) }
    }

    /// Address of the event for INTEN bit `bit` (for event links)
    #[inline(always)]
    pub const fn event_address(&self, bit: u32) -> usize {
        self.base + event_offset(bit)
    }
}

/// Encode a pin number for a PSEL register
#[inline(always)]
pub const fn psel(pin: u8) -> u32 {
    pin as u32 & PSEL_PIN_MASK
}

/// Decode a PSEL register; `None` when disconnected
#[inline(always)]
pub const fn psel_pin(value: u32) -> Option<u8> {
    if value & PSEL_DISCONNECTED != 0 {
        None
    } else {
        Some((value & PSEL_PIN_MASK) as u8)
    }
}
