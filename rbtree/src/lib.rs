//! An ordered set backed by a red-black tree that never recurses.
//!
//! Every algorithm in this crate (insertion, removal, traversal, teardown and
//! even the diagnostic invariant check) is a plain loop that moves through the
//! tree using parent back-references. Call-stack depth is therefore constant
//! no matter how many elements the tree holds.
//!
//! ```
//! use rbtree::{RedBlackTree, TreeError};
//!
//! let mut tree = RedBlackTree::new();
//! for x in [5, 3, 8, 1, 4, 7, 9] {
//!     tree.insert(x).unwrap();
//! }
//! assert_eq!(tree.insert(5), Err(TreeError::DuplicateKey));
//!
//! let mut buf = [0; 8];
//! let n = tree.range(&4, &8, &mut buf);
//! assert_eq!(&buf[..n], &[4, 5, 7, 8]);
//! ```

#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

mod compare;
mod error;
mod insert;
mod node;
mod query;
mod remove;
mod traverse;
mod tree;
mod validate;

pub use compare::{three_way, ByAddress, Comparator, FnComparator, NaturalOrder, ThreeWay};
pub use error::TreeError;
pub use traverse::Iter;
pub use tree::RedBlackTree;

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::Once;

    use simplelog::{Config, LevelFilter, TestLogger};

    static LOGGER: Once = Once::new();

    /// Routes `log` output to the test harness. Set `RBTREE_LOG=trace` to see
    /// rotations and fixup steps.
    pub fn init_logging() {
        LOGGER.call_once(|| {
            let level = match std::env::var("RBTREE_LOG").as_deref() {
                Ok("trace") => LevelFilter::Trace,
                Ok("debug") => LevelFilter::Debug,
                _ => LevelFilter::Warn,
            };
            let _ = TestLogger::init(level, Config::default());
        });
    }
}
