//! Factory brands
//!
//! A [`Brand<'id>`] is a zero-sized marker tied to one factory instance. The
//! factory-factories hand each new factory to a closure that must accept *any*
//! `'id` (`for<'id> FnOnce(Factory<'id, ..>)`), so inside that closure `'id` is a
//! fresh lifetime no other factory shares. The marker is invariant in `'id`,
//! which stops the compiler from shrinking or growing it to make two brands
//! agree: heaps from different factory instances simply have different types.
//!
//! Brands cannot be constructed outside this crate, and the closure's return type
//! cannot mention `'id`, so branded heaps never outlive their factory's scope.

use std::fmt;
use std::marker::PhantomData;

/// Invariant, zero-sized, unforgeable factory marker
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Brand<'id> {
    _invariant: PhantomData<fn(&'id ()) -> &'id ()>,
}

impl<'id> Brand<'id> {
    fn new() -> Self {
        Self {
            _invariant: PhantomData,
        }
    }
}

impl fmt::Debug for Brand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Brand")
    }
}

/// Runs `body` with a brand whose lifetime is unique to this call
pub(crate) fn with_brand<T>(body: impl for<'id> FnOnce(Brand<'id>) -> T) -> T {
    body(Brand::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_is_zero_sized() {
        with_brand(|brand| {
            assert_eq!(std::mem::size_of_val(&brand), 0);
        });
    }

    #[test]
    fn test_brand_result_escapes() {
        let value = with_brand(|brand| format!("{brand:?}"));
        assert_eq!(value, "Brand");
    }
}
