//! Centralized Constants
//!
//! Single source of truth for the magic numbers used by the receive
//! pipeline, the tick timer and the nRF52840 backends.
//!
//! # Organization
//!
//! - **Receive ring**: default sub-buffer geometry and EasyDMA limits
//! - **Event queue**: notification queue depth
//! - **Tick timer**: tick frequency and overflow widths per mode
//! - **UART defaults**: baud rate, RTS threshold, interrupt priority
//! - **Memory map**: ranges EasyDMA can reach
//!
//! Register offsets and bit definitions stay in `internal::register`.

// =============================================================================
// Receive Ring
// =============================================================================

/// Default size of one receive sub-buffer in bytes
pub const DEFAULT_SUB_BUFFER_SIZE: usize = 256;

/// Default total receive ring size in bytes
pub const DEFAULT_RX_BUFFER_SIZE: usize = 1024;

/// Default number of sub-buffers (ring size / sub-buffer size)
pub const DEFAULT_SUB_BUFFER_COUNT: usize = DEFAULT_RX_BUFFER_SIZE / DEFAULT_SUB_BUFFER_SIZE;

/// Minimum number of sub-buffers; the hardware needs a next target while
/// the current one is being filled
pub const MIN_SUB_BUFFER_COUNT: usize = 2;

/// Largest single EasyDMA transfer (RXD.MAXCNT / TXD.MAXCNT are 16 bits)
pub const MAX_DMA_TRANSFER: usize = 0xFFFF;

/// Alignment of the receive arena
pub const RX_ARENA_ALIGN: usize = 4;

// =============================================================================
// Event Queue
// =============================================================================

/// Default depth of the per-channel notification queue
pub const DEFAULT_EVENT_QUEUE_DEPTH: usize = 20;

/// Poll interval used by blocking queue receives, in microseconds
pub const QUEUE_POLL_INTERVAL_US: u32 = 100;

// =============================================================================
// Tick Timer
// =============================================================================

/// Tick timer frequency (16 MHz / 2^9)
pub const TICK_HZ: u32 = 31_250;

/// Tick timer prescaler giving [`TICK_HZ`] from the 16 MHz peripheral clock
pub const TICK_PRESCALER: u32 = 9;

/// Counter width while no UART channel is open (overflow every ~537 s)
pub const NORMAL_MODE_WIDTH_BITS: u32 = 24;

/// Counter width while a UART channel is open (overflow every 131.072 ms)
pub const ACTIVE_MODE_WIDTH_BITS: u32 = 12;

// =============================================================================
// UART Defaults
// =============================================================================

/// Default baud rate for the modem link
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default RTS threshold in bytes (stored, not used for tuning)
pub const DEFAULT_RTS_THRESHOLD: usize = 100;

/// Default NVIC priority for the UARTE interrupts
pub const DEFAULT_IRQ_PRIORITY: u8 = 2;

/// Highest pin number on the nRF52840 (P1.15)
pub const MAX_PIN: u8 = 47;

/// Number of UARTE instances on the nRF52840
pub const UARTE_COUNT: usize = 2;

// =============================================================================
// Memory Map
// =============================================================================

/// Start of data RAM, the only region EasyDMA can access
pub const DATA_RAM_START: usize = 0x2000_0000;

/// End (exclusive) of data RAM on the nRF52840 (256 KiB)
pub const DATA_RAM_END: usize = 0x2004_0000;

// =============================================================================
// Trace
// =============================================================================

/// Number of records kept by the pipeline trace
pub const TRACE_DEPTH: usize = 64;
