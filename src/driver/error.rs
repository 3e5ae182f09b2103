//! Error types for the UARTE receive pipeline
//!
//! Every fallible operation returns [`Error`]. The port layer above this
//! driver speaks signed integers, so each kind also maps to a negative
//! error code (see [`Error::code`] and [`into_code`]).

// =============================================================================
// Error Kinds
// =============================================================================

/// Driver error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bad pin, bad size, empty buffer or unsupported baud rate
    InvalidParameter,
    /// Ring or temporary transmit copy could not be allocated
    OutOfMemory,
    /// Operation on a channel that is not open
    NotInitialised,
    /// Hardware resource exhausted or a hardware command did not acknowledge
    PlatformError,
    /// Wait expired; only produced by callers built on top of this layer
    /// (for example [`EventQueue::receive_timeout`](crate::sync::EventQueue::receive_timeout))
    Timeout,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Error::InvalidParameter => "invalid parameter",
            Error::OutOfMemory => "out of memory",
            Error::NotInitialised => "not initialised",
            Error::PlatformError => "platform error",
            Error::Timeout => "timeout",
        }
    }

    /// Negative port error code for this kind
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Error::NotInitialised => -2,
            Error::InvalidParameter => -4,
            Error::OutOfMemory => -5,
            Error::Timeout => -6,
            Error::PlatformError => -7,
        }
    }

    /// Look up the error kind for a port error code
    ///
    /// Returns `None` for success (`>= 0`) and for codes this driver never
    /// produces (such as the generic `-1`).
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            -2 => Some(Error::NotInitialised),
            -4 => Some(Error::InvalidParameter),
            -5 => Some(Error::OutOfMemory),
            -6 => Some(Error::Timeout),
            -7 => Some(Error::PlatformError),
            _ => None,
        }
    }
}

/// Result type alias using the driver error
pub type Result<T> = core::result::Result<T, Error>;

/// Collapse a size result into the signed convention used by the port layer
///
/// Successful sizes are returned as-is (saturating at `i32::MAX`), errors
/// become their negative code.
pub fn into_code(result: Result<usize>) -> i32 {
    match result {
        Ok(n) => i32::try_from(n).unwrap_or(i32::MAX),
        Err(e) => e.code(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]
mod tests {
    extern crate std;
    use super::*;
    use std::format;

    const ALL: [Error; 5] = [
        Error::InvalidParameter,
        Error::OutOfMemory,
        Error::NotInitialised,
        Error::PlatformError,
        Error::Timeout,
    ];

    #[test]
    fn display_matches_as_str() {
        for e in ALL {
            assert_eq!(format!("{e}"), e.as_str());
        }
    }

    #[test]
    fn codes_are_negative_and_distinct() {
        for (i, a) in ALL.iter().enumerate() {
            assert!(a.code() < 0);
            for b in &ALL[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }

    #[test]
    fn code_lookup_round_trips() {
        for e in ALL {
            assert_eq!(Error::from_code(e.code()), Some(e));
        }
        assert_eq!(Error::from_code(0), None);
        assert_eq!(Error::from_code(-1), None);
        assert_eq!(Error::from_code(17), None);
    }

    #[test]
    fn port_codes() {
        assert_eq!(Error::InvalidParameter.code(), -4);
        assert_eq!(Error::OutOfMemory.code(), -5);
        assert_eq!(Error::NotInitialised.code(), -2);
        assert_eq!(Error::PlatformError.code(), -7);
        assert_eq!(Error::Timeout.code(), -6);
    }

    #[test]
    fn into_code_signs() {
        assert_eq!(into_code(Ok(0)), 0);
        assert_eq!(into_code(Ok(100)), 100);
        assert_eq!(into_code(Ok(usize::MAX)), i32::MAX);
        assert_eq!(into_code(Err(Error::NotInitialised)), -2);
    }
}
