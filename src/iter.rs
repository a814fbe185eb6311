//! Borrowing in-order traversal.

use std::iter::FusedIterator;

use crate::node::NodeRef;

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over the entries of a [`Tree`](crate::Tree) in comparator
/// order.
///
/// The traversal keeps an explicit stack of at most one node per level, so
/// its memory use is logarithmic in the size of the tree and it never
/// recurses.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a NodeRef<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: Option<&'a NodeRef<K, V>>, size: usize) -> Self {
        let mut iterator = Self {
            stack: Vec::new(),
            remaining: size,
        };
        iterator.descend_left(root);
        iterator
    }

    fn descend_left(&mut self, mut link: Option<&'a NodeRef<K, V>>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_ref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.descend_left(node.right.as_ref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.entry.pair())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::fixtures::{black, red};
    use rstest::rstest;

    #[rstest]
    fn test_empty_iteration() {
        let mut iterator = Iter::<i32, i32>::new(None, 0);
        assert_eq!(iterator.len(), 0);
        assert_eq!(iterator.next(), None);
        assert_eq!(iterator.next(), None);
    }

    #[rstest]
    fn test_in_order_with_exact_len() {
        let root = black(
            4,
            red(2, black(1, None, None), black(3, None, None)),
            black(6, red(5, None, None), red(7, None, None)),
        );
        let mut iterator = Iter::new(root.as_ref(), 7);
        assert_eq!(iterator.len(), 7);
        assert_eq!(iterator.next(), Some((&1, &10)));
        assert_eq!(iterator.len(), 6);

        let rest: Vec<i32> = iterator.clone().map(|(key, _)| *key).collect();
        assert_eq!(rest, vec![2, 3, 4, 5, 6, 7]);
        // the clone advanced independently
        assert_eq!(iterator.len(), 6);
    }
}
