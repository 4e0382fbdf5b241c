//! Millisecond clock abstraction

/// Monotonic millisecond clock
///
/// The value wraps at `u32::MAX` (about 49.7 days of uptime). Consumers must
/// compare readings with `wrapping_sub`, never with `<`.
pub trait Clock {
    /// Current time in milliseconds since an arbitrary epoch
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        C::now_ms(self)
    }
}

/// Clock backed by the embassy time driver
#[cfg(feature = "embassy-time")]
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the wrapping behaviour the trait documents
        embassy_time::Instant::now().as_millis() as u32
    }
}
