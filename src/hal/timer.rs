//! Timer service, deadlines and the cooperative yield port.
//!
//! Negotiation waits are expressed as a [`Deadline`] over a monotonic
//! [`TickSource`]. Tick counters wrap at `u32::MAX`; elapsed time is computed
//! with wrapping subtraction so a wrap between start and check is harmless.

use core::sync::atomic::{AtomicU32, Ordering};

// =============================================================================
// Tick Source
// =============================================================================

/// Monotonic tick counter with millisecond conversion.
pub trait TickSource {
    /// Current tick count
    fn ticks(&self) -> u32;

    /// Milliseconds elapsed since `start` (a value previously returned by
    /// [`ticks`](Self::ticks))
    fn elapsed_ms(&self, start: u32) -> u32;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn ticks(&self) -> u32 {
        (**self).ticks()
    }

    fn elapsed_ms(&self, start: u32) -> u32 {
        (**self).elapsed_ms(start)
    }
}

/// Convert a tick delta at `hz` ticks per second to milliseconds
#[inline]
pub const fn ticks_to_ms(ticks: u32, hz: u32) -> u32 {
    ((ticks as u64 * 1000) / hz as u64) as u32
}

/// Interrupt-driven tick counter.
///
/// Call [`on_tick`](Self::on_tick) from a periodic interrupt (SysTick) firing
/// `HZ` times per second.
///
/// ```ignore
/// static TICKS: TickCounter<1000> = TickCounter::new();
///
/// #[exception]
/// fn SysTick() {
///     TICKS.on_tick();
/// }
/// ```
#[derive(Debug)]
pub struct TickCounter<const HZ: u32> {
    ticks: AtomicU32,
}

impl<const HZ: u32> TickCounter<HZ> {
    /// Create a counter at zero (const, suitable for static initialization)
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
        }
    }

    /// Advance the counter by one tick
    #[inline]
    pub fn on_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }
}

impl<const HZ: u32> Default for TickCounter<HZ> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const HZ: u32> TickSource for TickCounter<HZ> {
    #[inline]
    fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    #[inline]
    fn elapsed_ms(&self, start: u32) -> u32 {
        ticks_to_ms(self.ticks().wrapping_sub(start), HZ)
    }
}

// =============================================================================
// Deadline
// =============================================================================

/// A bounded wait measured from a recorded start tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    start: u32,
    timeout_ms: u32,
}

impl Deadline {
    /// Start a deadline `timeout_ms` from now
    pub fn start<T: TickSource + ?Sized>(timer: &T, timeout_ms: u32) -> Self {
        Self {
            start: timer.ticks(),
            timeout_ms,
        }
    }

    /// Tick value the deadline was started at
    pub const fn started_at(&self) -> u32 {
        self.start
    }

    /// Configured timeout in milliseconds
    pub const fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// True once strictly more than `timeout_ms` has elapsed
    pub fn has_expired<T: TickSource + ?Sized>(&self, timer: &T) -> bool {
        timer.elapsed_ms(self.start) > self.timeout_ms
    }
}

// =============================================================================
// Yield Port
// =============================================================================

/// Cooperative reschedule point used between negotiation polls.
pub trait Yield {
    /// Give other cooperative tasks a chance to run
    fn yield_now(&mut self);
}

impl<Y: Yield + ?Sized> Yield for &mut Y {
    fn yield_now(&mut self) {
        (**self).yield_now();
    }
}

/// Yield implementation for bare-metal loops without a scheduler
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinYield;

impl Yield for SpinYield {
    #[inline]
    fn yield_now(&mut self) {
        core::hint::spin_loop();
    }
}

/// Adapts a closure (e.g. an RTOS `yield` call) to [`Yield`]
#[derive(Debug, Clone, Copy)]
pub struct FnYield<F: FnMut()>(pub F);

impl<F: FnMut()> Yield for FnYield<F> {
    #[inline]
    fn yield_now(&mut self) {
        (self.0)();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SimClock;

    #[test]
    fn ticks_to_ms_conversion() {
        assert_eq!(ticks_to_ms(1000, 1000), 1000);
        assert_eq!(ticks_to_ms(100, 100), 1000);
        assert_eq!(ticks_to_ms(u32::MAX, 1000), u32::MAX);
        assert_eq!(ticks_to_ms(u32::MAX, 100_000) as u64, u32::MAX as u64 / 100);
    }

    #[test]
    fn tick_counter_counts_and_wraps() {
        let counter: TickCounter<1000> = TickCounter::new();
        counter.ticks.store(u32::MAX - 1, Ordering::Relaxed);
        let start = counter.ticks();
        for _ in 0..5 {
            counter.on_tick();
        }
        assert_eq!(counter.ticks(), 3);
        assert_eq!(counter.elapsed_ms(start), 5);
    }

    #[test]
    fn deadline_expires_strictly_after_timeout() {
        let clock = SimClock::new();
        let deadline = Deadline::start(&clock, 5000);
        assert_eq!(deadline.timeout_ms(), 5000);

        clock.advance_ms(5000);
        assert!(!deadline.has_expired(&clock));
        clock.advance_ms(1);
        assert!(deadline.has_expired(&clock));
    }

    #[test]
    fn deadline_survives_tick_wrap() {
        let clock = SimClock::starting_at(u32::MAX - 10);
        let deadline = Deadline::start(&clock, 100);
        assert_eq!(deadline.started_at(), u32::MAX - 10);
        clock.advance_ms(50);
        assert!(!deadline.has_expired(&clock));
        clock.advance_ms(51);
        assert!(deadline.has_expired(&clock));
    }

    #[test]
    fn fn_yield_invokes_closure() {
        let mut calls = 0;
        {
            let mut y = FnYield(|| calls += 1);
            y.yield_now();
            (&mut y).yield_now();
        }
        assert_eq!(calls, 2);
    }
}
