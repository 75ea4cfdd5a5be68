//! Monotonic time source

/// Millisecond clock
///
/// The value wraps after roughly 49 days; consumers compare instants with
/// wrapping subtraction.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin (usually boot)
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
