//! Link configuration
//!
//! Only timing is tunable; the wire format constants in [`crate::frame`] are
//! fixed because both ends must agree on them without negotiation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default inter-byte window for completing a frame once its start byte
/// has been seen
pub const FRAME_TIMEOUT_MS: u32 = 100;

/// Link tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinkConfig {
    /// A frame must complete within this many milliseconds of its start
    /// byte, otherwise the partial frame is discarded
    pub timeout_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            timeout_ms: FRAME_TIMEOUT_MS,
        }
    }
}

impl LinkConfig {
    /// Config with a custom frame timeout
    pub const fn with_timeout_ms(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }
}
