//! Interrupt-safe interior mutability.

use core::cell::RefCell;
use critical_section::Mutex;

/// Value shared between thread mode and interrupt handlers.
///
/// Pairs `critical_section::Mutex` with `RefCell`: the critical section
/// keeps handlers out, the `RefCell` catches re-entry from inside a closure.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Create a new cell (const, suitable for static initialization)
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` with exclusive access, interrupts masked for its duration.
    ///
    /// # Panics
    ///
    /// If called again from inside `f` on the same cell.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Like [`with`](Self::with), but returns `None` instead of panicking
    /// when the cell is already borrowed
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            self.inner
                .borrow(cs)
                .try_borrow_mut()
                .ok()
                .map(|mut value| f(&mut value))
        })
    }

    /// Swap in `value` and return the old one
    pub fn replace(&self, value: T) -> T {
        critical_section::with(|cs| self.inner.borrow(cs).replace(value))
    }
}

// SAFETY: every access to the inner value happens inside a critical section,
// so at most one context touches it at a time. `T: Send` because the value
// may be reached from a different context than the one that stored it.
unsafe impl<T: Send> Sync for CriticalSectionCell<T> {}
