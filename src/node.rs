//! Immutable tree nodes and the shared-ownership pointer that links them.
//!
//! A node is never changed after construction. Every "change" builds a new
//! node through one of the `copy_*` constructors, reusing the entry and
//! whichever children are unaffected. One node may be reachable from many
//! tree versions at once, possibly owned by different threads.

use crate::entry::Entry;

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled (default), this is `std::sync::Arc`,
/// which lets tree versions cross threads.
///
/// When the `arc` feature is disabled, this is `std::rc::Rc`, which is
/// cheaper but confines every version to one thread.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

/// A shared reference to a node.
pub(crate) type NodeRef<K, V> = ReferenceCounter<Node<K, V>>;

/// A child slot: either absent or a shared node.
pub(crate) type Link<K, V> = Option<NodeRef<K, V>>;

// =============================================================================
// Color Definition
// =============================================================================

/// The color of a red-black tree node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Red,
    Black,
}

// =============================================================================
// Node Definition
// =============================================================================

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) color: Color,
    pub(crate) entry: ReferenceCounter<Entry<K, V>>,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// Builds a node from its four parts.
    #[inline]
    pub(crate) fn build(
        color: Color,
        entry: ReferenceCounter<Entry<K, V>>,
        left: Link<K, V>,
        right: Link<K, V>,
    ) -> NodeRef<K, V> {
        ReferenceCounter::new(Self {
            color,
            entry,
            left,
            right,
        })
    }

    /// Builds a red node with no children.
    #[inline]
    pub(crate) fn leaf(key: K, value: V) -> NodeRef<K, V> {
        Self::build(
            Color::Red,
            ReferenceCounter::new(Entry::new(key, value)),
            None,
            None,
        )
    }

    pub(crate) fn copy_with_entry(&self, key: K, value: V) -> NodeRef<K, V> {
        Self::build(
            self.color,
            ReferenceCounter::new(Entry::new(key, value)),
            self.left.clone(),
            self.right.clone(),
        )
    }

    pub(crate) fn copy_with_left(&self, left: Link<K, V>) -> NodeRef<K, V> {
        Self::build(
            self.color,
            ReferenceCounter::clone(&self.entry),
            left,
            self.right.clone(),
        )
    }

    pub(crate) fn copy_with_right(&self, right: Link<K, V>) -> NodeRef<K, V> {
        Self::build(
            self.color,
            ReferenceCounter::clone(&self.entry),
            self.left.clone(),
            right,
        )
    }

    pub(crate) fn copy_with_color(&self, color: Color) -> NodeRef<K, V> {
        Self::build(
            color,
            ReferenceCounter::clone(&self.entry),
            self.left.clone(),
            self.right.clone(),
        )
    }

    #[inline]
    pub(crate) fn copy_as_black(&self) -> NodeRef<K, V> {
        self.copy_with_color(Color::Black)
    }

    #[inline]
    pub(crate) fn copy_as_red(&self) -> NodeRef<K, V> {
        self.copy_with_color(Color::Red)
    }

    /// Another handle on this node's entry.
    #[inline]
    pub(crate) fn share_entry(&self) -> ReferenceCounter<Entry<K, V>> {
        ReferenceCounter::clone(&self.entry)
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        self.entry.key()
    }
}

// =============================================================================
// Shade: closed view over a child link
// =============================================================================

/// The color of a child link, with absence as its own case.
///
/// Every color case analysis in the algebra matches on tuples of `Shade`,
/// so the compiler checks that each combination is handled.
pub(crate) enum Shade<'a, K, V> {
    Absent,
    Red(&'a NodeRef<K, V>),
    Black(&'a NodeRef<K, V>),
}

impl<'a, K, V> Shade<'a, K, V> {
    #[inline]
    pub(crate) fn of(link: Option<&'a NodeRef<K, V>>) -> Self {
        match link {
            None => Self::Absent,
            Some(node) if node.is_red() => Self::Red(node),
            Some(node) => Self::Black(node),
        }
    }

    /// Shade of the left child of `link`, absent when `link` is.
    #[inline]
    pub(crate) fn of_left(link: Option<&'a NodeRef<K, V>>) -> Self {
        link.map_or(Self::Absent, |node| Self::of(node.left.as_ref()))
    }

    /// Shade of the right child of `link`, absent when `link` is.
    #[inline]
    pub(crate) fn of_right(link: Option<&'a NodeRef<K, V>>) -> Self {
        link.map_or(Self::Absent, |node| Self::of(node.right.as_ref()))
    }
}

/// Whether `link` is a present red node.
#[inline]
pub(crate) fn is_red<K, V>(link: Option<&NodeRef<K, V>>) -> bool {
    link.is_some_and(|node| node.is_red())
}

/// Whether `link` is a present black node. An absent link is not.
#[inline]
pub(crate) fn is_black_node<K, V>(link: Option<&NodeRef<K, V>>) -> bool {
    link.is_some_and(|node| !node.is_red())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_leaf_is_red_without_children() {
        let leaf = Node::leaf(1, "one");
        assert!(leaf.is_red());
        assert!(leaf.left.is_none());
        assert!(leaf.right.is_none());
        assert_eq!(leaf.key(), &1);
    }

    #[rstest]
    fn test_copy_as_black_leaves_original_untouched() {
        let leaf = Node::leaf(1, "one");
        let black = leaf.copy_as_black();
        assert!(leaf.is_red());
        assert!(!black.is_red());
        assert!(ReferenceCounter::ptr_eq(&leaf.entry, &black.entry));
    }

    #[rstest]
    fn test_copy_with_left_shares_right_subtree() {
        let right = Node::leaf(3, "three");
        let parent = Node::build(
            Color::Black,
            ReferenceCounter::new(Entry::new(2, "two")),
            None,
            Some(ReferenceCounter::clone(&right)),
        );
        let rebuilt = parent.copy_with_left(Some(Node::leaf(1, "one")));

        assert!(parent.left.is_none());
        assert_eq!(rebuilt.left.as_ref().map(|node| *node.key()), Some(1));
        let shared = rebuilt.right.as_ref().expect("right child");
        assert!(ReferenceCounter::ptr_eq(shared, &right));
    }

    #[rstest]
    fn test_copy_with_entry_keeps_color_and_children() {
        let parent = Node::build(
            Color::Black,
            ReferenceCounter::new(Entry::new(2, "two")),
            Some(Node::leaf(1, "one")),
            None,
        );
        let updated = parent.copy_with_entry(2, "TWO");
        assert!(!updated.is_red());
        assert_eq!(updated.entry.value(), &"TWO");
        assert_eq!(parent.entry.value(), &"two");
        assert!(updated.left.is_some());
    }

    #[rstest]
    fn test_shade_of_links() {
        let red = Node::leaf(1, ());
        let black = red.copy_as_black();
        assert!(matches!(Shade::of(Some(&red)), Shade::Red(_)));
        assert!(matches!(Shade::of(Some(&black)), Shade::Black(_)));
        assert!(matches!(Shade::<i32, ()>::of(None), Shade::Absent));
        assert!(matches!(Shade::of_left(Some(&red)), Shade::Absent));
        assert!(is_red(Some(&red)));
        assert!(!is_red::<i32, ()>(None));
        assert!(is_black_node(Some(&black)));
        assert!(!is_black_node::<i32, ()>(None));
    }
}
