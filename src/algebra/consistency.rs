//! Structural self-check of a node graph.

use std::cmp::Ordering;

use crate::compare::Comparator;
use crate::error::InvariantViolation;
use crate::node::{NodeRef, is_red};

/// Checks the red-black invariants of the subtree below `node`.
///
/// Returns the black-height of the subtree, counting an absent child as 1.
/// Only the parent/child key relation is checked here; the whole-tree
/// ordering is covered by [`Tree::validate`](crate::Tree::validate).
pub(crate) fn check_consistency<K, V, C>(
    node: Option<&NodeRef<K, V>>,
    comparator: &C,
) -> Result<usize, InvariantViolation>
where
    C: Comparator<K> + ?Sized,
{
    let Some(node) = node else {
        return Ok(1);
    };

    if node.is_red() && (is_red(node.left.as_ref()) || is_red(node.right.as_ref())) {
        return Err(InvariantViolation::ConsecutiveReds);
    }

    let left_in_order = node
        .left
        .as_ref()
        .is_none_or(|left| comparator.compare(left.key(), node.key()) == Ordering::Less);
    let right_in_order = node
        .right
        .as_ref()
        .is_none_or(|right| comparator.compare(right.key(), node.key()) == Ordering::Greater);
    if !(left_in_order && right_in_order) {
        return Err(InvariantViolation::OutOfOrder);
    }

    let left = check_consistency(node.left.as_ref(), comparator)?;
    let right = check_consistency(node.right.as_ref(), comparator)?;
    if left != right {
        return Err(InvariantViolation::UnequalBlackHeight { left, right });
    }

    Ok(if node.is_red() { left } else { left + 1 })
}
