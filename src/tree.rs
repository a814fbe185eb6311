//! The persistent ordered map handle.
//!
//! A [`Tree`] is a root reference, an element count, and a comparator. Every
//! update returns a new `Tree` and leaves the receiver untouched; the two
//! versions share every subtree the update did not pass through.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::algebra::{self, check_consistency};
use crate::compare::{Comparator, NaturalOrder};
use crate::error::InvariantViolation;
use crate::iter::Iter;
use crate::node::{Link, NodeRef, ReferenceCounter};

/// A persistent ordered map backed by a red-black tree.
///
/// `insert` and `remove` are O(log N) and allocate only the nodes on the
/// path from the root to the affected key. Cloning a tree is O(1).
///
/// Keys are ordered by the comparator `C`, which defaults to
/// [`NaturalOrder`] (the key's [`Ord`] implementation).
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `empty`        | O(1)       |
/// | `get`          | O(log N)   |
/// | `insert`       | O(log N)   |
/// | `remove`       | O(log N)   |
/// | `size`         | O(1)       |
/// | `items`        | O(N)       |
/// | `validate`     | O(N)       |
///
/// # Examples
///
/// ```rust
/// use persistent_rbtree::Tree;
///
/// let first = Tree::empty().insert(2, "two").insert(1, "one");
/// let second = first.insert(3, "three").remove(&1);
///
/// // the earlier version is unaffected
/// assert_eq!(first.size(), 2);
/// assert_eq!(first.get(&1), Some(&"one"));
///
/// let keys: Vec<&i32> = second.keys().collect();
/// assert_eq!(keys, vec![&2, &3]);
/// ```
pub struct Tree<K, V, C = NaturalOrder> {
    root: Link<K, V>,
    size: usize,
    comparator: C,
}

impl<K, V> Tree<K, V> {
    /// Creates an empty tree ordered by the key's [`Ord`] implementation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::Tree;
    ///
    /// let tree: Tree<String, i32> = Tree::empty();
    /// assert_eq!(tree.size(), 0);
    /// assert!(tree.consistent());
    /// ```
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Same as [`Tree::empty`].
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::empty()
    }
}

impl<K, V, C> Tree<K, V, C> {
    /// Creates an empty tree ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::{FnComparator, Tree};
    ///
    /// let by_length = FnComparator::new(|a: &&str, b: &&str| a.len().cmp(&b.len()));
    /// let tree = Tree::with_comparator(by_length)
    ///     .insert("ccc", 3)
    ///     .insert("a", 1)
    ///     .insert("bb", 2);
    ///
    /// let values: Vec<&i32> = tree.values().collect();
    /// assert_eq!(values, vec![&1, &2, &3]);
    /// ```
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            size: 0,
            comparator,
        }
    }

    /// Returns the number of distinct keys.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Same as [`Tree::size`].
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the tree holds no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The comparator ordering this tree.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns an iterator over entries in comparator order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::Tree;
    ///
    /// let tree = Tree::empty().insert(2, 'b').insert(1, 'a');
    /// let pairs: Vec<(&i32, &char)> = tree.iter().collect();
    /// assert_eq!(pairs, vec![(&1, &'a'), (&2, &'b')]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_ref(), self.size)
    }

    /// Returns an iterator over keys in comparator order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in key order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Returns `true` if both trees have the same root node.
    ///
    /// Two empty trees are considered to share their (absent) root. A
    /// `true` result implies equal contents; `false` says nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::Tree;
    ///
    /// let tree = Tree::empty().insert(1, "one");
    /// assert!(tree.remove(&42).ptr_eq(&tree));
    /// assert!(!tree.remove(&1).ptr_eq(&tree));
    /// ```
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        }
    }

    /// Materializes the tree into an owned [`BTreeMap`].
    ///
    /// Traverses with an explicit stack rather than recursion. Keys and
    /// values are cloned; the tree is left as it was.
    ///
    /// The map orders its keys by [`Ord`], not by the tree's comparator, so
    /// for a tree built with [`Tree::with_comparator`] the order of
    /// `items()` can differ from [`Tree::iter`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::{FnComparator, Tree};
    /// use std::collections::BTreeMap;
    ///
    /// let tree = Tree::empty().insert("b", 2).insert("a", 1);
    /// assert_eq!(tree.items(), BTreeMap::from([("a", 1), ("b", 2)]));
    ///
    /// // a descending tree still materializes in ascending key order
    /// let descending = Tree::with_comparator(FnComparator::new(|a: &u8, b: &u8| b.cmp(a)))
    ///     .insert(1, 'a')
    ///     .insert(2, 'b');
    /// let iterated: Vec<&u8> = descending.keys().collect();
    /// let materialized: Vec<u8> = descending.items().into_keys().collect();
    /// assert_eq!(iterated, vec![&2, &1]);
    /// assert_eq!(materialized, vec![1, 2]);
    /// ```
    #[must_use]
    pub fn items(&self) -> BTreeMap<K, V>
    where
        K: Ord + Clone,
        V: Clone,
    {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<K, V, C> Tree<K, V, C>
where
    C: Comparator<K>,
{
    /// Returns a new version with `key` bound to `value`.
    ///
    /// If `key` is already present its value is replaced and the size is
    /// unchanged. The receiver is not modified.
    ///
    /// # Complexity
    ///
    /// O(log N) time and O(log N) newly allocated nodes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::Tree;
    ///
    /// let first = Tree::empty().insert("k", 1);
    /// let second = first.insert("k", 2);
    ///
    /// assert_eq!(first.get("k"), Some(&1));
    /// assert_eq!(second.get("k"), Some(&2));
    /// assert_eq!(second.size(), 1);
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self
    where
        C: Clone,
    {
        let (root, inserted) = algebra::insert(self.root.as_ref(), key, value, &self.comparator);
        let size = if inserted { self.size + 1 } else { self.size };
        tracing::trace!(inserted, size, "insert produced a new version");
        Self {
            root: Some(blacken(root)),
            size,
            comparator: self.comparator.clone(),
        }
    }

    /// Returns `true` if every red-black invariant holds below the root.
    ///
    /// An empty tree is consistent. The color of the root itself and the
    /// recorded size are not looked at; see [`Tree::validate`] for those.
    #[must_use]
    pub fn consistent(&self) -> bool {
        check_consistency(self.root.as_ref(), &self.comparator).is_ok()
    }

    /// Checks every invariant a tree handle promises.
    ///
    /// On success returns the black-height of the tree (1 for the empty
    /// tree). Otherwise returns the first violation found, checking in
    /// this order: local node invariants, root color, whole-tree key
    /// order, and the recorded size.
    ///
    /// # Errors
    ///
    /// Returns the [`InvariantViolation`] describing the corruption.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::Tree;
    ///
    /// let tree: Tree<u32, ()> = (0..100).map(|key| (key, ())).collect();
    /// let height = tree.validate().expect("a fresh tree is valid");
    /// assert!(height > 1);
    /// ```
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        let outcome = self.check_invariants();
        if let Err(violation) = &outcome {
            tracing::debug!(%violation, size = self.size, "tree failed validation");
        }
        outcome
    }

    fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        let height = check_consistency(self.root.as_ref(), &self.comparator)?;
        if self.root.as_ref().is_some_and(|root| root.is_red()) {
            return Err(InvariantViolation::RedRoot);
        }

        let mut counted = 0;
        let mut previous: Option<&K> = None;
        for (key, _) in self.iter() {
            if let Some(previous) = previous
                && self.comparator.compare(previous, key) != Ordering::Less
            {
                return Err(InvariantViolation::OutOfOrder);
            }
            previous = Some(key);
            counted += 1;
        }

        if counted == self.size {
            Ok(height)
        } else {
            Err(InvariantViolation::SizeMismatch {
                recorded: self.size,
                counted,
            })
        }
    }
}

impl<K, V, C> Tree<K, V, C> {
    /// Returns a reference to the value bound to `key`.
    ///
    /// The key may be any borrowed form of the key type, provided the
    /// comparator orders the borrowed form the same way.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::Tree;
    ///
    /// let tree = Tree::empty().insert("hello".to_string(), 42);
    /// assert_eq!(tree.get("hello"), Some(&42));
    /// assert_eq!(tree.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut link = self.root.as_ref();
        while let Some(node) = link {
            match self.comparator.compare(key, node.key().borrow()) {
                Ordering::Less => link = node.left.as_ref(),
                Ordering::Greater => link = node.right.as_ref(),
                Ordering::Equal => return Some(node.entry.value()),
            }
        }
        None
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.get(key).is_some()
    }

    /// Returns a new version without `key`.
    ///
    /// Removing an absent key is not an error: the result is a clone of
    /// the receiver sharing the same root, so [`Tree::ptr_eq`] holds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_rbtree::Tree;
    ///
    /// let tree = Tree::empty().insert(1, "one").insert(2, "two");
    /// let removed = tree.remove(&1);
    ///
    /// assert_eq!(removed.get(&1), None);
    /// assert_eq!(removed.size(), 1);
    /// assert_eq!(tree.size(), 2);
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q> + Clone,
    {
        let (root, removed) = algebra::remove(self.root.as_ref(), key, &self.comparator);
        if !removed {
            tracing::trace!(size = self.size, "remove missed; version unchanged");
            return self.clone();
        }

        let size = self.size - 1;
        tracing::trace!(size, "remove produced a new version");
        Self {
            root: root.map(blacken),
            size,
            comparator: self.comparator.clone(),
        }
    }
}

/// Forces a root node black, reusing it when it already is.
fn blacken<K, V>(root: NodeRef<K, V>) -> NodeRef<K, V> {
    if root.is_red() {
        root.copy_as_black()
    } else {
        root
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, C: Clone> Clone for Tree<K, V, C> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            size: self.size,
            comparator: self.comparator.clone(),
        }
    }
}

impl<K, V, C: Default> Default for Tree<K, V, C> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Tree<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for Tree<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for Tree<K, V, C> {}

impl<K, V, C> FromIterator<(K, V)> for Tree<K, V, C>
where
    C: Comparator<K> + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |tree, (key, value)| tree.insert(key, value))
    }
}

impl<'a, K, V, C> IntoIterator for &'a Tree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::fixtures::{black, red};
    use crate::compare::FnComparator;
    use rstest::rstest;

    fn tree_of(keys: impl IntoIterator<Item = i32>) -> Tree<i32, i32> {
        keys.into_iter().map(|key| (key, key * 10)).collect()
    }

    #[rstest]
    fn test_empty_tree() {
        let tree: Tree<i32, i32> = Tree::empty();
        assert_eq!(tree.size(), 0);
        assert!(tree.is_empty());
        assert!(tree.consistent());
        assert_eq!(tree.validate(), Ok(1));
        assert_eq!(tree.get(&1), None);
        assert!(tree.items().is_empty());
    }

    #[rstest]
    fn test_root_is_black_after_every_insert() {
        let mut tree = Tree::empty();
        for key in 0..64 {
            tree = tree.insert(key, ());
            assert!(tree.root.as_ref().is_some_and(|root| !root.is_red()));
            assert!(tree.validate().is_ok());
        }
    }

    #[rstest]
    fn test_insert_then_get() {
        let tree = tree_of([5, 3, 8]);
        assert_eq!(tree.get(&3), Some(&30));
        assert_eq!(tree.get(&8), Some(&80));
        assert_eq!(tree.get(&4), None);
        assert!(tree.contains_key(&5));
        assert!(!tree.contains_key(&6));
    }

    #[rstest]
    fn test_insert_existing_key_updates_value() {
        let first = tree_of([1, 2, 3]);
        let second = first.insert(2, 200);
        assert_eq!(second.size(), 3);
        assert_eq!(second.get(&2), Some(&200));
        assert_eq!(first.get(&2), Some(&20));
    }

    #[rstest]
    fn test_remove_present_key() {
        let tree = tree_of(1..=10);
        let removed = tree.remove(&4);
        assert_eq!(removed.size(), 9);
        assert_eq!(removed.get(&4), None);
        assert!(removed.validate().is_ok());
        assert_eq!(tree.get(&4), Some(&40));
    }

    #[rstest]
    fn test_remove_absent_key_shares_root() {
        let tree = tree_of(1..=10);
        let unchanged = tree.remove(&42);
        assert!(unchanged.ptr_eq(&tree));
        assert_eq!(unchanged, tree);
        assert_eq!(unchanged.size(), 10);
    }

    #[rstest]
    fn test_remove_last_key_leaves_empty_tree() {
        let tree = tree_of([1]).remove(&1);
        assert!(tree.is_empty());
        assert!(tree.ptr_eq(&Tree::empty()));
    }

    #[rstest]
    fn test_get_with_borrowed_key() {
        let tree = Tree::empty()
            .insert("alpha".to_string(), 1)
            .insert("beta".to_string(), 2);
        assert_eq!(tree.get("beta"), Some(&2));
        let removed = tree.remove("alpha");
        assert_eq!(removed.size(), 1);
    }

    #[rstest]
    fn test_custom_comparator_drives_order() {
        let descending = Tree::with_comparator(FnComparator::new(|a: &i32, b: &i32| b.cmp(a)))
            .insert(1, "one")
            .insert(3, "three")
            .insert(2, "two");
        let keys: Vec<i32> = descending.keys().copied().collect();
        assert_eq!(keys, vec![3, 2, 1]);
        assert_eq!(descending.get(&2), Some(&"two"));
        assert!(descending.validate().is_ok());
        // items() is always in natural order
        let items: Vec<i32> = descending.items().into_keys().collect();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[rstest]
    fn test_iter_is_exact_size() {
        let tree = tree_of(0..20);
        let mut iterator = tree.iter();
        assert_eq!(iterator.len(), 20);
        iterator.next();
        assert_eq!(iterator.len(), 19);
        assert_eq!(tree.values().len(), 20);
    }

    #[rstest]
    fn test_debug_is_map_form() {
        let tree = Tree::empty().insert(2, "two").insert(1, "one");
        assert_eq!(format!("{tree:?}"), r#"{1: "one", 2: "two"}"#);
    }

    #[rstest]
    fn test_equality_ignores_history() {
        let ascending = tree_of(0..50);
        let descending = tree_of((0..50).rev());
        assert_eq!(ascending, descending);
        assert_ne!(ascending, ascending.remove(&0));
        assert_ne!(ascending, ascending.insert(0, -1));
    }

    #[rstest]
    fn test_into_iterator_for_reference() {
        let tree = tree_of([3, 1, 2]);
        let mut total = 0;
        for (key, value) in &tree {
            total += key + value;
        }
        assert_eq!(total, 66);
    }

    #[rstest]
    fn test_validate_reports_red_root() {
        let tree = Tree {
            root: red(1, None, None),
            size: 1,
            comparator: NaturalOrder,
        };
        assert!(tree.consistent());
        assert_eq!(tree.validate(), Err(InvariantViolation::RedRoot));
    }

    #[rstest]
    fn test_validate_reports_size_mismatch() {
        let tree = Tree {
            root: black(2, red(1, None, None), None),
            size: 5,
            comparator: NaturalOrder,
        };
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::SizeMismatch {
                recorded: 5,
                counted: 2
            })
        );
    }

    #[rstest]
    fn test_validate_reports_deep_order_violation() {
        // every parent/child pair is in order, but 5 sits left of 4
        let tree = Tree {
            root: black(4, black(2, None, red(5, None, None)), black(6, None, None)),
            size: 4,
            comparator: NaturalOrder,
        };
        assert!(tree.consistent());
        assert_eq!(tree.validate(), Err(InvariantViolation::OutOfOrder));
    }

    #[rstest]
    fn test_validate_reports_unequal_black_height() {
        let tree = Tree {
            root: black(2, black(1, None, None), None),
            size: 2,
            comparator: NaturalOrder,
        };
        assert!(!tree.consistent());
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::UnequalBlackHeight { left: 2, right: 1 })
        );
    }
}

// =============================================================================
// Send + Sync Tests (arc feature only)
// =============================================================================


// =============================================================================
// Multithread Tests (arc feature only)
// =============================================================================
