//! Memory-mapped register definitions for the nRF52840 peripherals used by
//! the UART pipeline (UARTE, TIMER, PPI, GPIO, NVIC).
//!
//! All register access is volatile. Peripherals with several instances are
//! addressed through a base address held by the register block type; the
//! accessor macros below generate methods on those types.

pub mod gpio;
pub mod nvic;
pub mod ppi;
pub mod timer;
pub mod uarte;

/// Read a 32-bit register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

/// Write a 32-bit value to a register at the given address
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u32) {
    unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
}

/// Modify a register using a read-modify-write operation
///
/// # Safety
/// The caller must ensure the address is valid and properly aligned.
#[inline(always)]
pub unsafe fn modify_reg<F>(addr: usize, f: F)
where
    F: FnOnce(u32) -> u32,
{
    // SAFETY: caller guarantees address validity
    let value = unsafe { read_reg(addr) };
    unsafe { write_reg(addr, f(value)) }
}

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate read/write accessor methods for a register of an instanced block.
///
/// # Example
/// ```ignore
/// impl UarteRegs {
///     reg_rw!(baudrate, set_baudrate, BAUDRATE_OFFSET, "BAUDRATE register");
/// }
/// ```
macro_rules! reg_rw {
    ($read_fn:ident, $write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn(&self) -> u32 {
            unsafe { $crate::internal::register::read_reg(self.base + $offset) }
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(&self, value: u32) {
            unsafe { $crate::internal::register::write_reg(self.base + $offset, value) }
        }
    };
}

/// Generate a write-only accessor (task triggers, set/clear aliases).
macro_rules! reg_wo {
    ($write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(&self, value: u32) {
            unsafe { $crate::internal::register::write_reg(self.base + $offset, value) }
        }
    };
}

/// Generate a trigger method for a task register (write 1 to start).
macro_rules! reg_task {
    ($fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Trigger ", $doc)]
        #[inline(always)]
        pub fn $fn(&self) {
            unsafe { $crate::internal::register::write_reg(self.base + $offset, 1) }
        }
    };
}

// Export macros for use in submodules
pub(crate) use reg_rw;
pub(crate) use reg_task;
pub(crate) use reg_wo;

/// Address of the event register for event bit `bit`
///
/// Nordic peripherals place `EVENTS_*` at `0x100 + 4 * n`, where `n` is
/// also the event's `INTEN` bit.
#[inline(always)]
pub const fn event_offset(bit: u32) -> usize {
    0x100 + 4 * bit as usize
}
