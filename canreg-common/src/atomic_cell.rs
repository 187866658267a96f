//! A small cell type providing atomic load/store via critical sections
//!
//! Value slots in the dictionary are shared between the protocol servicing
//! path and other execution contexts (e.g. a control loop writing
//! measurements), so every mutable slot is one of these. Scoping the
//! critical section to a single slot keeps the worst-case masked time to a
//! single value copy.

use core::cell::Cell;
use critical_section::Mutex;

/// A cell which can be shared between threads and interrupt contexts
///
/// Loads and stores are serialized with a `critical_section`, so it works on
/// targets without CAS instructions.
#[derive(Debug)]
pub struct AtomicCell<T: Copy> {
    inner: Mutex<Cell<T>>,
}

impl<T: Send + Copy> AtomicCell<T> {
    /// Create a new cell holding `value`
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(Cell::new(value)),
        }
    }

    /// Read the current value
    pub fn load(&self) -> T {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }

    /// Replace the current value
    pub fn store(&self, value: T) {
        critical_section::with(|cs| self.inner.borrow(cs).set(value));
    }

    /// Atomically update the value with `f`, returning the previous value
    ///
    /// If `f` returns None the value is left unchanged and the current value
    /// is returned as the error.
    pub fn fetch_update(&self, mut f: impl FnMut(T) -> Option<T>) -> Result<T, T> {
        critical_section::with(|cs| {
            let old_value = self.inner.borrow(cs).get();
            if let Some(new_value) = f(old_value) {
                self.inner.borrow(cs).set(new_value);
                Ok(old_value)
            } else {
                Err(old_value)
            }
        })
    }
}

impl<T: Default + Copy + Send> Default for AtomicCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_store() {
        let cell = AtomicCell::new(42u32);
        assert_eq!(42, cell.load());
        cell.store(7);
        assert_eq!(7, cell.load());
    }

    #[test]
    fn test_fetch_update() {
        let cell = AtomicCell::new(10u32);
        assert_eq!(Ok(10), cell.fetch_update(|v| Some(v + 1)));
        assert_eq!(11, cell.load());
        assert_eq!(Err(11), cell.fetch_update(|_| None));
        assert_eq!(11, cell.load());
    }
}
