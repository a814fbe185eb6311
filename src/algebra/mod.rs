//! The persistent red-black node algebra.
//!
//! Every function here takes shared node references and returns new ones.
//! Nodes that an operation does not touch are shared with the input by
//! reference; nodes on the copy-on-write path are rebuilt. Nothing is ever
//! mutated, so every earlier tree version stays valid.
//!
//! Insertion follows Okasaki's functional balancing. Deletion follows the
//! Kahrs formulation: a removed node is replaced by the [`fuse`] of its two
//! subtrees, and a black-height deficit on one side is repaired on the way
//! up by [`balance_left`] / [`balance_right`].
//!
//! The algebra is only about local shape and color. Forcing the root black
//! is left to [`Tree`](crate::Tree).

mod consistency;
mod insert;
mod remove;

pub(crate) use consistency::check_consistency;
pub(crate) use insert::{balance, insert};
pub(crate) use remove::remove;
