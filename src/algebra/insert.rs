//! Copy-on-write insertion and the red-red repair that follows it.

use std::cmp::Ordering;

use crate::compare::Comparator;
use crate::node::{Color, Node, NodeRef};

/// Inserts `key` below `node`.
///
/// Returns the new subtree root and whether `key` was absent before. An
/// existing key gets a new entry in place, keeping its color and children;
/// nothing is rebalanced in that case because the shape did not change.
pub(crate) fn insert<K, V, C>(
    node: Option<&NodeRef<K, V>>,
    key: K,
    value: V,
    comparator: &C,
) -> (NodeRef<K, V>, bool)
where
    C: Comparator<K> + ?Sized,
{
    let Some(node) = node else {
        return (Node::leaf(key, value), true);
    };

    match comparator.compare(&key, node.key()) {
        Ordering::Less => {
            let (new_left, inserted) = insert(node.left.as_ref(), key, value, comparator);
            let rebuilt = node.copy_with_left(Some(new_left));
            if inserted {
                (balance(rebuilt), true)
            } else {
                (rebuilt, false)
            }
        }
        Ordering::Equal => (node.copy_with_entry(key, value), false),
        Ordering::Greater => {
            let (new_right, inserted) = insert(node.right.as_ref(), key, value, comparator);
            let rebuilt = node.copy_with_right(Some(new_right));
            if inserted {
                (balance(rebuilt), true)
            } else {
                (rebuilt, false)
            }
        }
    }
}

/// Repairs a red-red violation directly below a black `node`.
///
/// Handles the four shapes (left-left, left-right, right-left, right-right)
/// by promoting the middle key to a red node with two black children.
/// A red `node`, or one with no violation, is handed back as the same
/// reference.
///
/// ```text
///        z(B)          z(B)          x(B)          x(B)
///       /             /                 \              \
///     y(R)          x(R)                z(R)           y(R)
///     /                \               /                  \
///   x(R)               y(R)          y(R)                 z(R)
///
///                 all four become        y(R)
///                                       /    \
///                                    x(B)    z(B)
/// ```
pub(crate) fn balance<K, V>(node: NodeRef<K, V>) -> NodeRef<K, V> {
    if node.is_red() {
        return node;
    }

    if let Some(left) = node.left.as_ref().filter(|left| left.is_red()) {
        if let Some(left_left) = left.left.as_ref().filter(|left_left| left_left.is_red()) {
            let new_right = Node::build(
                Color::Black,
                node.share_entry(),
                left.right.clone(),
                node.right.clone(),
            );
            return Node::build(
                Color::Red,
                left.share_entry(),
                Some(left_left.copy_as_black()),
                Some(new_right),
            );
        }

        if let Some(left_right) = left.right.as_ref().filter(|left_right| left_right.is_red()) {
            let new_left = Node::build(
                Color::Black,
                left.share_entry(),
                left.left.clone(),
                left_right.left.clone(),
            );
            let new_right = Node::build(
                Color::Black,
                node.share_entry(),
                left_right.right.clone(),
                node.right.clone(),
            );
            return Node::build(
                Color::Red,
                left_right.share_entry(),
                Some(new_left),
                Some(new_right),
            );
        }
    }

    if let Some(right) = node.right.as_ref().filter(|right| right.is_red()) {
        if let Some(right_left) = right.left.as_ref().filter(|right_left| right_left.is_red()) {
            let new_left = Node::build(
                Color::Black,
                node.share_entry(),
                node.left.clone(),
                right_left.left.clone(),
            );
            let new_right = Node::build(
                Color::Black,
                right.share_entry(),
                right_left.right.clone(),
                right.right.clone(),
            );
            return Node::build(
                Color::Red,
                right_left.share_entry(),
                Some(new_left),
                Some(new_right),
            );
        }

        if let Some(right_right) = right.right.as_ref().filter(|right_right| right_right.is_red()) {
            let new_left = Node::build(
                Color::Black,
                node.share_entry(),
                node.left.clone(),
                right.left.clone(),
            );
            return Node::build(
                Color::Red,
                right.share_entry(),
                Some(new_left),
                Some(right_right.copy_as_black()),
            );
        }
    }

    node
}
