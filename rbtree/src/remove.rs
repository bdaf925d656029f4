use core::mem;

use log::trace;

use crate::compare::Comparator;
use crate::node::{color_of, Color, RawNode};
use crate::{RedBlackTree, TreeError};

impl<T, C> RedBlackTree<T, C>
where
    C: Comparator<T>,
{
    /// Removes the element comparing equal to `element` and returns it.
    ///
    /// Fails with [`TreeError::NotFound`] if there is no such element, in
    /// which case the tree is unchanged.
    pub fn remove(&mut self, element: &T) -> Result<T, TreeError> {
        let node = self.find(element).ok_or(TreeError::NotFound)?;
        let removed = unsafe { self.remove_node(node) };
        self.after_mutation();
        Ok(removed)
    }
}

impl<T, C> RedBlackTree<T, C> {
    /// Unlinks `node`, rebalances and frees it.
    ///
    /// A node with two children trades elements with its in-order successor,
    /// and the successor, which has no left child, is unlinked instead. The
    /// element handed back is always the one that lived in `node`.
    unsafe fn remove_node(&mut self, mut node: RawNode<T>) -> T {
        unsafe {
            if let (Some(_), Some(right)) = (node.left(), node.right()) {
                let mut successor = right.min_of();
                mem::swap(node.element_mut(), successor.element_mut());
                node = successor;
            }

            // `node` has at most one child now; splice it out.
            let child = node.left().or(node.right());
            let parent = node.parent();
            self.replace_subtree(node, child);

            if node.color().is_black() {
                self.remove_fixup(child, parent);
            }

            self.len -= 1;
            node.free()
        }
    }

    /// Restores the black heights after a black node was spliced out.
    ///
    /// `x` took the removed node's place and carries an extra black. It may be
    /// `None` (an empty slot), which is why its parent is tracked separately
    /// rather than read back from `x`.
    unsafe fn remove_fixup(&mut self, mut x: Option<RawNode<T>>, mut x_parent: Option<RawNode<T>>) {
        unsafe {
            while color_of(x).is_black() {
                let Some(mut parent) = x_parent else {
                    // x is the root, the extra black just falls off the top.
                    break;
                };

                if parent.left() == x {
                    // A sibling exists: the paths through it had one more
                    // black node than the ones through x.
                    let Some(mut sibling) = parent.right() else {
                        unreachable!("black-height deficit without a sibling");
                    };

                    if sibling.color().is_red() {
                        //      p:b                 s:b
                        //     /   \               /   \
                        //    x    s:r    ──►    p:r    d
                        //        /   \         /   \
                        //       c     d       x     c
                        //
                        // Reduces to one of the black sibling cases below.
                        trace!("remove fixup: red sibling");
                        sibling.set_color(Color::Black);
                        parent.set_color(Color::Red);
                        self.rotate_left(parent);
                        let Some(s) = parent.right() else {
                            unreachable!("red sibling had no black children");
                        };
                        sibling = s;
                    }

                    if color_of(sibling.left()).is_black() && color_of(sibling.right()).is_black() {
                        // Take one black off both sides and move the deficit up.
                        trace!("remove fixup: black sibling with black children");
                        sibling.set_color(Color::Red);
                        x = Some(parent);
                        x_parent = parent.parent();
                        continue;
                    }

                    if color_of(sibling.right()).is_black() {
                        //    s:b            c:b
                        //   /   \              \
                        // c:r    d:b   ──►     s:r
                        //                        \
                        //                        d:b
                        trace!("remove fixup: near nephew red");
                        if let Some(mut near) = sibling.left() {
                            near.set_color(Color::Black);
                        }
                        sibling.set_color(Color::Red);
                        self.rotate_right(sibling);
                        let Some(s) = parent.right() else {
                            unreachable!("rotation lost the sibling");
                        };
                        sibling = s;
                    }

                    //      p:?                s:?
                    //     /   \              /   \
                    //    x     s:b   ──►   p:b    d:b
                    //         /   \       /   \
                    //        c     d:r   x     c
                    //
                    // x gains a black ancestor, d's lost black is repainted.
                    trace!("remove fixup: far nephew red");
                    sibling.set_color(parent.color());
                    parent.set_color(Color::Black);
                    if let Some(mut far) = sibling.right() {
                        far.set_color(Color::Black);
                    }
                    self.rotate_left(parent);
                    x = self.root;
                    break;
                } else {
                    let Some(mut sibling) = parent.left() else {
                        unreachable!("black-height deficit without a sibling");
                    };

                    if sibling.color().is_red() {
                        trace!("remove fixup: red sibling");
                        sibling.set_color(Color::Black);
                        parent.set_color(Color::Red);
                        self.rotate_right(parent);
                        let Some(s) = parent.left() else {
                            unreachable!("red sibling had no black children");
                        };
                        sibling = s;
                    }

                    if color_of(sibling.left()).is_black() && color_of(sibling.right()).is_black() {
                        trace!("remove fixup: black sibling with black children");
                        sibling.set_color(Color::Red);
                        x = Some(parent);
                        x_parent = parent.parent();
                        continue;
                    }

                    if color_of(sibling.left()).is_black() {
                        trace!("remove fixup: near nephew red");
                        if let Some(mut near) = sibling.right() {
                            near.set_color(Color::Black);
                        }
                        sibling.set_color(Color::Red);
                        self.rotate_left(sibling);
                        let Some(s) = parent.left() else {
                            unreachable!("rotation lost the sibling");
                        };
                        sibling = s;
                    }

                    trace!("remove fixup: far nephew red");
                    sibling.set_color(parent.color());
                    parent.set_color(Color::Black);
                    if let Some(mut far) = sibling.left() {
                        far.set_color(Color::Black);
                    }
                    self.rotate_right(parent);
                    x = self.root;
                    break;
                }
            }

            if let Some(mut x) = x {
                x.set_color(Color::Black);
            }
        }
    }
}
