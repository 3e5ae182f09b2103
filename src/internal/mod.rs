//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`constants`]: Internal constants and magic numbers
//! - [`register`]: Raw memory-mapped register definitions (nRF52840)
//! - [`ring`]: Receive sub-buffer ring over one DMA arena
//!
//! # Stability
//!
//! **WARNING:** This module is `pub(crate)` only. Do not depend on any types
//! or functions in this module from external code. They are subject to change
//! without notice.

pub(crate) mod constants;
#[cfg_attr(not(feature = "nrf52840"), allow(dead_code))]
pub(crate) mod register;
pub(crate) mod ring;
