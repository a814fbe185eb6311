//! Red-black invariant violations.
//!
//! Nothing in the public contract of [`Tree`](crate::Tree) fails: a missing
//! key is `None`, removing an absent key is a no-op, and re-inserting a key
//! is an update. The only failure this crate knows about is a structurally
//! corrupt tree, which is described by [`InvariantViolation`].
//!
//! Diagnostics such as [`Tree::validate`](crate::Tree::validate) return the
//! violation as a value. Inside the node algebra, reaching a color shape
//! that the invariants rule out aborts the operation with a panic whose
//! payload is the violation, because there is no tree left to recover.

use thiserror::Error;

/// A broken red-black tree invariant.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A red node has a red child.
    #[error("red node has a red child")]
    ConsecutiveReds,
    /// A child key is not strictly on the correct side of its parent key.
    #[error("child key is out of order with its parent")]
    OutOfOrder,
    /// The two subtrees of a node have different black-heights.
    #[error("unequal black-height: left {left}, right {right}")]
    UnequalBlackHeight {
        /// Black-height reported by the left subtree.
        left: usize,
        /// Black-height reported by the right subtree.
        right: usize,
    },
    /// The root of a non-empty tree is red.
    #[error("root of a non-empty tree is red")]
    RedRoot,
    /// The cached element count disagrees with the reachable entries.
    #[error("recorded size {recorded} but {counted} entries are reachable")]
    SizeMismatch {
        /// Size stored in the tree handle.
        recorded: usize,
        /// Entries found by walking the tree.
        counted: usize,
    },
    /// `balance_left` met a color shape that cannot follow a valid removal.
    #[error("no left-deficit repair matches the node's color shape")]
    BalanceLeftShape,
    /// `balance_right` met a color shape that cannot follow a valid removal.
    #[error("no right-deficit repair matches the node's color shape")]
    BalanceRightShape,
}

/// Aborts the current operation on a broken invariant.
///
/// The panic payload is the [`InvariantViolation`] itself, so a caller that
/// catches the unwind can tell it apart from any other panic.
#[cold]
#[track_caller]
pub(crate) fn invariant_violated(violation: InvariantViolation) -> ! {
    tracing::error!(%violation, "red-black invariant violated");
    std::panic::panic_any(violation)
}
