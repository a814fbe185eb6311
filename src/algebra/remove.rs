//! Copy-on-write deletion.
//!
//! A matched node is replaced by the [`fuse`] of its children. When the
//! removal happened inside a black child, that side may now be one black
//! node short, and [`balance_left`] / [`balance_right`] restore the
//! black-height on the way back up.

use std::borrow::Borrow;
use std::cmp::Ordering;

use super::balance;
use crate::compare::Comparator;
use crate::error::{InvariantViolation, invariant_violated};
use crate::node::{Color, Link, Node, NodeRef, ReferenceCounter, Shade, is_black_node};

/// Removes `key` from below `node`.
///
/// Returns the new subtree root (absent when the subtree became empty) and
/// whether `key` was present.
pub(crate) fn remove<K, V, Q, C>(
    node: Option<&NodeRef<K, V>>,
    key: &Q,
    comparator: &C,
) -> (Link<K, V>, bool)
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q> + ?Sized,
{
    let Some(node) = node else {
        return (None, false);
    };

    match comparator.compare(key, node.key().borrow()) {
        Ordering::Less => remove_left(node, key, comparator),
        Ordering::Equal => (fuse(node.left.as_ref(), node.right.as_ref()), true),
        Ordering::Greater => remove_right(node, key, comparator),
    }
}

fn remove_left<K, V, Q, C>(node: &NodeRef<K, V>, key: &Q, comparator: &C) -> (Link<K, V>, bool)
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q> + ?Sized,
{
    let (new_left, removed) = remove(node.left.as_ref(), key, comparator);
    if !removed {
        return (Some(ReferenceCounter::clone(node)), false);
    }

    // provisional color; a deficit repair or the final blackening settles it
    let rebuilt = Node::build(Color::Red, node.share_entry(), new_left, node.right.clone());
    let repaired = if is_black_node(node.left.as_ref()) {
        balance_left(rebuilt)
    } else {
        rebuilt
    };
    (Some(repaired), true)
}

fn remove_right<K, V, Q, C>(node: &NodeRef<K, V>, key: &Q, comparator: &C) -> (Link<K, V>, bool)
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q> + ?Sized,
{
    let (new_right, removed) = remove(node.right.as_ref(), key, comparator);
    if !removed {
        return (Some(ReferenceCounter::clone(node)), false);
    }

    let rebuilt = Node::build(Color::Red, node.share_entry(), node.left.clone(), new_right);
    let repaired = if is_black_node(node.right.as_ref()) {
        balance_right(rebuilt)
    } else {
        rebuilt
    };
    (Some(repaired), true)
}

/// Merges two subtrees of equal black-height into one.
///
/// Every key in `left` must order before every key in `right`. The result
/// has the same black-height, except in the black/black case where the
/// naive join is one short and goes through [`balance_left`].
pub(crate) fn fuse<K, V>(
    left: Option<&NodeRef<K, V>>,
    right: Option<&NodeRef<K, V>>,
) -> Link<K, V> {
    match (Shade::of(left), Shade::of(right)) {
        (Shade::Absent, _) => right.cloned(),
        (_, Shade::Absent) => left.cloned(),
        (Shade::Black(left), Shade::Red(right)) => Some(Node::build(
            Color::Red,
            right.share_entry(),
            fuse(Some(left), right.left.as_ref()),
            right.right.clone(),
        )),
        (Shade::Red(left), Shade::Black(right)) => Some(Node::build(
            Color::Red,
            left.share_entry(),
            left.left.clone(),
            fuse(left.right.as_ref(), Some(right)),
        )),
        (Shade::Red(left), Shade::Red(right)) => {
            let fused = fuse(left.right.as_ref(), right.left.as_ref());
            Some(match fused {
                Some(inner) if inner.is_red() => {
                    let new_left = Node::build(
                        Color::Red,
                        left.share_entry(),
                        left.left.clone(),
                        inner.left.clone(),
                    );
                    let new_right = Node::build(
                        Color::Red,
                        right.share_entry(),
                        inner.right.clone(),
                        right.right.clone(),
                    );
                    Node::build(Color::Red, inner.share_entry(), Some(new_left), Some(new_right))
                }
                fused => {
                    let new_right =
                        Node::build(Color::Red, right.share_entry(), fused, right.right.clone());
                    Node::build(Color::Red, left.share_entry(), left.left.clone(), Some(new_right))
                }
            })
        }
        (Shade::Black(left), Shade::Black(right)) => {
            let fused = fuse(left.right.as_ref(), right.left.as_ref());
            Some(match fused {
                Some(inner) if inner.is_red() => {
                    let new_left = Node::build(
                        Color::Black,
                        left.share_entry(),
                        left.left.clone(),
                        inner.left.clone(),
                    );
                    let new_right = Node::build(
                        Color::Black,
                        right.share_entry(),
                        inner.right.clone(),
                        right.right.clone(),
                    );
                    Node::build(Color::Red, inner.share_entry(), Some(new_left), Some(new_right))
                }
                fused => {
                    let new_right =
                        Node::build(Color::Black, right.share_entry(), fused, right.right.clone());
                    let joined = Node::build(
                        Color::Red,
                        left.share_entry(),
                        left.left.clone(),
                        Some(new_right),
                    );
                    balance_left(joined)
                }
            })
        }
    }
}

/// Deletion-side local repair.
///
/// A node with two red children is split by blackening both and turning
/// itself red. Anything else must be a black node and goes through the
/// insertion [`balance`].
pub(crate) fn rebalance<K, V>(node: NodeRef<K, V>) -> NodeRef<K, V> {
    if let (Shade::Red(left), Shade::Red(right)) =
        (Shade::of(node.left.as_ref()), Shade::of(node.right.as_ref()))
    {
        return Node::build(
            Color::Red,
            node.share_entry(),
            Some(left.copy_as_black()),
            Some(right.copy_as_black()),
        );
    }

    debug_assert!(!node.is_red(), "rebalance expects a black node");
    balance(node)
}

/// Restores black-height after the left subtree of `node` lost one black.
///
/// Case analysis on the shades of (left, right, right.left):
///
/// * left red: blacken it, which gives the black back.
/// * right black: redden the sibling and repair whatever red-red that
///   creates with [`rebalance`].
/// * right red over a black right.left: double rotation that lifts
///   right.left to the top.
///
/// Any other shape cannot follow a removal from a valid tree.
pub(crate) fn balance_left<K, V>(node: NodeRef<K, V>) -> NodeRef<K, V> {
    let right_link = node.right.as_ref();
    match (
        Shade::of(node.left.as_ref()),
        Shade::of(right_link),
        Shade::of_left(right_link),
    ) {
        (Shade::Red(left), _, _) => Node::build(
            Color::Red,
            node.share_entry(),
            Some(left.copy_as_black()),
            node.right.clone(),
        ),
        (_, Shade::Black(right), _) => rebalance(Node::build(
            Color::Black,
            node.share_entry(),
            node.left.clone(),
            Some(right.copy_as_red()),
        )),
        (_, Shade::Red(right), Shade::Black(right_left)) => {
            let Shade::Black(right_right) = Shade::of(right.right.as_ref()) else {
                invariant_violated(InvariantViolation::BalanceLeftShape)
            };
            let new_right = rebalance(Node::build(
                Color::Black,
                right.share_entry(),
                right_left.right.clone(),
                Some(right_right.copy_as_red()),
            ));
            let new_left = Node::build(
                Color::Black,
                node.share_entry(),
                node.left.clone(),
                right_left.left.clone(),
            );
            Node::build(
                Color::Red,
                right_left.share_entry(),
                Some(new_left),
                Some(new_right),
            )
        }
        (_, Shade::Red(_), Shade::Red(_) | Shade::Absent) | (_, Shade::Absent, _) => {
            invariant_violated(InvariantViolation::BalanceLeftShape)
        }
    }
}

/// Restores black-height after the right subtree of `node` lost one black.
///
/// Mirror of [`balance_left`], keyed on the shades of
/// (left, left.right, right).
pub(crate) fn balance_right<K, V>(node: NodeRef<K, V>) -> NodeRef<K, V> {
    let left_link = node.left.as_ref();
    match (
        Shade::of(left_link),
        Shade::of_right(left_link),
        Shade::of(node.right.as_ref()),
    ) {
        (_, _, Shade::Red(right)) => Node::build(
            Color::Red,
            node.share_entry(),
            node.left.clone(),
            Some(right.copy_as_black()),
        ),
        (Shade::Black(left), _, _) => rebalance(Node::build(
            Color::Black,
            node.share_entry(),
            Some(left.copy_as_red()),
            node.right.clone(),
        )),
        (Shade::Red(left), Shade::Black(left_right), _) => {
            let Shade::Black(left_left) = Shade::of(left.left.as_ref()) else {
                invariant_violated(InvariantViolation::BalanceRightShape)
            };
            let new_left = rebalance(Node::build(
                Color::Black,
                left.share_entry(),
                Some(left_left.copy_as_red()),
                left_right.left.clone(),
            ));
            let new_right = Node::build(
                Color::Black,
                node.share_entry(),
                left_right.right.clone(),
                node.right.clone(),
            );
            Node::build(
                Color::Red,
                left_right.share_entry(),
                Some(new_left),
                Some(new_right),
            )
        }
        (Shade::Red(_), Shade::Red(_) | Shade::Absent, _) | (Shade::Absent, _, _) => {
            invariant_violated(InvariantViolation::BalanceRightShape)
        }
    }
}
