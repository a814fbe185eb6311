//! Immutable key-value pairs stored in tree nodes.

/// A key and its value.
///
/// Entries are shared between node copies: recoloring or re-parenting a
/// node reuses the same entry, so neither `K` nor `V` is ever cloned by the
/// tree algebra.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    /// Creates an entry.
    #[inline]
    #[must_use]
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// The key.
    #[inline]
    #[must_use]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    /// The value.
    #[inline]
    #[must_use]
    pub(crate) const fn value(&self) -> &V {
        &self.value
    }

    /// Borrows both halves at once.
    #[inline]
    #[must_use]
    pub(crate) const fn pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }
}
