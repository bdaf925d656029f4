use core::cmp::Ordering;

use crate::compare::Comparator;
use crate::node::{color_of, RawNode};
use crate::{RedBlackTree, TreeError};

impl<T, C> RedBlackTree<T, C>
where
    C: Comparator<T>,
{
    /// Walks the whole tree checking every red-black and ordering invariant.
    /// Returns the number of nodes found.
    ///
    /// This is a diagnostic for the tree itself and costs `O(n log n)`. Normal
    /// operation never calls it unless the `check-invariants` feature is on.
    pub fn validate(&self) -> Result<usize, TreeError> {
        let Some(root) = self.root else {
            return match self.len {
                0 => Ok(0),
                _ => Err(TreeError::InvalidTree("empty tree with non-zero length")),
            };
        };

        unsafe {
            if root.color().is_red() {
                return Err(TreeError::InvalidTree("root is red"));
            }
            if root.parent().is_some() {
                return Err(TreeError::InvalidTree("root has a parent"));
            }

            let mut count = 0usize;
            let mut black_height = None;
            let mut prev: Option<RawNode<T>> = None;
            let mut cur = Some(root.min_of());
            while let Some(node) = cur {
                count += 1;
                // Broken links could make the walk revisit nodes forever.
                if count > self.len {
                    return Err(TreeError::InvalidTree("more nodes than the length says"));
                }

                for child in [node.left(), node.right()].into_iter().flatten() {
                    if child.parent() != Some(node) {
                        return Err(TreeError::InvalidTree(
                            "child does not point back to its parent",
                        ));
                    }
                }

                if node.color().is_red()
                    && (color_of(node.left()).is_red() || color_of(node.right()).is_red())
                {
                    return Err(TreeError::InvalidTree("red node with a red child"));
                }

                if let Some(prev) = prev {
                    if self.cmp.compare(prev.element(), node.element()) != Ordering::Less {
                        return Err(TreeError::InvalidTree("elements out of order"));
                    }
                }

                // Any node with an empty slot ends a root-to-nil path.
                if node.left().is_none() || node.right().is_none() {
                    let height = black_depth(node);
                    match black_height {
                        None => black_height = Some(height),
                        Some(expected) if expected != height => {
                            return Err(TreeError::InvalidTree("uneven black height"));
                        }
                        Some(_) => {}
                    }
                }

                prev = Some(node);
                cur = node.successor();
            }

            if count != self.len {
                return Err(TreeError::InvalidTree("fewer nodes than the length says"));
            }
            Ok(count)
        }
    }

    /// Element count, cross-checked against a full [`validate`](Self::validate)
    /// walk.
    ///
    /// An inconsistent tree is a bug in this crate: debug builds panic, release
    /// builds return [`TreeError::InvalidTree`].
    pub fn checked_len(&self) -> Result<usize, TreeError> {
        let checked = self.validate();
        debug_assert!(checked.is_ok(), "{checked:?}");
        checked
    }
}

/// Black nodes from `node` up to and including the root.
unsafe fn black_depth<T>(node: RawNode<T>) -> usize {
    let mut depth = 0;
    let mut cur = Some(node);
    while let Some(n) = cur {
        unsafe {
            if n.color().is_black() {
                depth += 1;
            }
            cur = n.parent();
        }
    }
    depth
}
