//! Cache Value Module
//!
//! Defines the size-reporting contract every cached value must satisfy.

use std::sync::Arc;

// == Cache Value ==
/// A payload that can report how many bytes it occupies.
///
/// The reported size is only used for budget accounting; the cache never
/// looks inside the value otherwise.
///
/// # Contract
/// `size()` must be deterministic for as long as the value is resident.
/// A value whose size changes after it was added leaves the cache's byte
/// counter out of step with its contents, and budget enforcement is then
/// unreliable.
pub trait CacheValue {
    /// Number of bytes this value accounts for.
    fn size(&self) -> usize;
}

impl CacheValue for String {
    fn size(&self) -> usize {
        self.len()
    }
}

impl CacheValue for str {
    fn size(&self) -> usize {
        self.len()
    }
}

impl CacheValue for Vec<u8> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T: CacheValue + ?Sized> CacheValue for Arc<T> {
    fn size(&self) -> usize {
        (**self).size()
    }
}
