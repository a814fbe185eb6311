//! Key ordering capability.
//!
//! A [`Tree`](crate::Tree) never calls `Ord::cmp` on its keys directly. It
//! asks its [`Comparator`] instead, so the same algebra serves natural
//! ordering, reversed ordering, or any total order supplied by the caller.
//!
//! # Examples
//!
//! ```rust
//! use persistent_rbtree::{FnComparator, Tree};
//!
//! let descending = Tree::with_comparator(FnComparator::new(|a: &i32, b: &i32| b.cmp(a)))
//!     .insert(1, "one")
//!     .insert(3, "three")
//!     .insert(2, "two");
//!
//! let keys: Vec<&i32> = descending.keys().collect();
//! assert_eq!(keys, vec![&3, &2, &1]);
//! ```

use std::cmp::Ordering;
use std::fmt;

/// A total order over values of type `T`.
///
/// Implementations must be consistent: antisymmetric, transitive, and
/// stable for the lifetime of every tree that uses them. A comparator that
/// violates this breaks the ordering invariant of the tree, which
/// [`Tree::validate`](crate::Tree::validate) reports as
/// [`InvariantViolation::OutOfOrder`](crate::InvariantViolation::OutOfOrder).
pub trait Comparator<T: ?Sized> {
    /// Compares `left` with `right`.
    fn compare(&self, left: &T, right: &T) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation.
///
/// This is the default comparator of [`Tree`](crate::Tree). It is a
/// zero-sized type, so it adds nothing to the size of a tree handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        left.cmp(right)
    }
}

/// Adapts a closure `Fn(&T, &T) -> Ordering` into a [`Comparator`].
#[derive(Clone, Copy, Default)]
pub struct FnComparator<F> {
    function: F,
}

impl<F> FnComparator<F> {
    /// Wraps `function` as a comparator.
    #[inline]
    #[must_use]
    pub const fn new(function: F) -> Self {
        Self { function }
    }
}

impl<T: ?Sized, F> Comparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        (self.function)(left, right)
    }
}

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("FnComparator")
    }
}

impl<T: ?Sized, C: Comparator<T> + ?Sized> Comparator<T> for &C {
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        (**self).compare(left, right)
    }
}
