//! # persistent-rbtree
//!
//! A persistent ordered map built on a functional red-black tree.
//!
//! ## Overview
//!
//! [`Tree`] is immutable. `insert` and `remove` return a new version and
//! leave the old one valid; the two share every subtree the update did not
//! touch, so a new version costs O(log N) fresh nodes. Old versions are
//! reclaimed once no handle reaches them.
//!
//! - Insertion uses Okasaki's four-case red-red repair.
//! - Deletion uses the Kahrs formulation (fuse of the removed node's
//!   children, then left/right deficit repair).
//! - Keys are ordered through a [`Comparator`], [`NaturalOrder`] by default.
//! - [`Tree::validate`] checks every red-black invariant and reports the
//!   first broken one as an [`InvariantViolation`].
//!
//! ## Feature Flags
//!
//! - `arc` (default): nodes are shared through `Arc`, so versions can be
//!   sent to and read from other threads. Without it nodes use `Rc`.
//!
//! ## Example
//!
//! ```rust
//! use persistent_rbtree::prelude::*;
//!
//! let base: Tree<&str, u32> = Tree::empty().insert("a", 1).insert("b", 2);
//! let extended = base.insert("c", 3);
//! let shrunk = base.remove("a");
//!
//! assert_eq!(base.size(), 2);
//! assert_eq!(extended.size(), 3);
//! assert_eq!(shrunk.get("a"), None);
//! assert!(extended.validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use persistent_rbtree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::compare::{Comparator, FnComparator, NaturalOrder};
    pub use crate::error::InvariantViolation;
    pub use crate::iter::Iter;
    pub use crate::tree::Tree;
}

pub mod compare;
pub mod error;

mod algebra;
mod entry;
mod iter;
mod node;
mod tree;

pub use compare::{Comparator, FnComparator, NaturalOrder};
pub use error::InvariantViolation;
pub use iter::Iter;
pub use tree::Tree;
