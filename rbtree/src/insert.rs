use core::cmp::Ordering;

use log::trace;

use crate::compare::Comparator;
use crate::node::{Color, Node, NodePos, RawNode};
use crate::{RedBlackTree, TreeError};

impl<T, C> RedBlackTree<T, C>
where
    C: Comparator<T>,
{
    /// Adds `element` to the tree.
    ///
    /// Fails with [`TreeError::DuplicateKey`] if an equal element is already
    /// present, and with [`TreeError::AllocationFailure`] if no node could be
    /// allocated. In both cases the tree is left untouched and `element` is
    /// dropped.
    pub fn insert(&mut self, element: T) -> Result<(), TreeError> {
        // Find the empty slot first so that neither error case touches the tree.
        let mut parent = None;
        let mut side = NodePos::Root;
        let mut maybe_node = self.root;
        while let Some(node) = maybe_node {
            parent = Some(node);
            match self.cmp.compare(&element, unsafe { node.element() }) {
                Ordering::Less => {
                    side = NodePos::Left;
                    maybe_node = unsafe { node.left() };
                }
                Ordering::Equal => return Err(TreeError::DuplicateKey),
                Ordering::Greater => {
                    side = NodePos::Right;
                    maybe_node = unsafe { node.right() };
                }
            }
        }

        // A lone root is black right away and needs no fixup.
        let color = match parent {
            Some(_) => Color::Red,
            None => Color::Black,
        };
        let new_node = RawNode::alloc(Node {
            element,
            color,
            parent,
            left: None,
            right: None,
        })?;

        match (parent, side) {
            (Some(mut parent), NodePos::Left) => unsafe { parent.set_left(Some(new_node)) },
            (Some(mut parent), _) => unsafe { parent.set_right(Some(new_node)) },
            (None, _) => self.root = Some(new_node),
        }
        self.len += 1;

        if parent.is_some() {
            unsafe { self.insert_fixup(new_node) };
        }
        self.after_mutation();
        Ok(())
    }

    /// Restores the red-black properties after `new_node` was attached as a
    /// red leaf. Only a red-red edge between `node` and its parent can be
    /// broken; the loop pushes it upwards or resolves it with rotations.
    unsafe fn insert_fixup(&mut self, new_node: RawNode<T>) {
        let mut node = new_node;
        unsafe {
            while let Some(mut parent) = node.parent() {
                if parent.color().is_black() {
                    break;
                }
                debug_assert!(node.color().is_red());

                // A red parent is never the root, so the grandparent exists.
                let Some(mut grand_parent) = parent.parent() else {
                    unreachable!("red node without a parent");
                };
                debug_assert!(grand_parent.color().is_black());

                let parent_pos = parent.pos();
                let uncle = match parent_pos {
                    NodePos::Left => grand_parent.right(),
                    _ => grand_parent.left(),
                };

                match uncle {
                    Some(mut uncle) if uncle.color().is_red() => {
                        //       g:b                g:r
                        //     /     \            /     \
                        //   p:r     u:r   ──►  p:b     u:b
                        //    |                  |
                        //   n:r                n:r
                        //
                        // Pushes the black of g down one level, which keeps
                        // black heights but may create a red-red edge above g.
                        trace!("insert fixup: red uncle, recolor");
                        parent.set_color(Color::Black);
                        uncle.set_color(Color::Black);
                        grand_parent.set_color(Color::Red);
                        node = grand_parent;
                    }
                    _ => {
                        // Inner child: turn the zig-zag into a straight line
                        // so the outer case below applies.
                        //
                        //     g:b             g:b
                        //    /               /
                        //  p:r      ──►    n:r
                        //    \             /
                        //    n:r         p:r
                        if node.pos() != parent_pos {
                            trace!("insert fixup: inner child, rotate at parent");
                            match parent_pos {
                                NodePos::Left => self.rotate_left(parent),
                                _ => self.rotate_right(parent),
                            }
                            core::mem::swap(&mut parent, &mut node);
                        }

                        //       g:b            p:b
                        //      /   \          /   \
                        //    p:r   u:b  ──► n:r   g:r
                        //   /                       \
                        // n:r                       u:b
                        trace!("insert fixup: outer child, rotate at grandparent");
                        parent.set_color(Color::Black);
                        grand_parent.set_color(Color::Red);
                        match parent_pos {
                            NodePos::Left => self.rotate_right(grand_parent),
                            _ => self.rotate_left(grand_parent),
                        }
                        break;
                    }
                }
            }

            if let Some(mut root) = self.root {
                root.set_color(Color::Black);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::init_logging;

    fn colors(tree: &RedBlackTree<i32>) -> Vec<(i32, Color)> {
        let mut out = Vec::new();
        let mut cur = tree.root.map(|r| unsafe { r.min_of() });
        while let Some(node) = cur {
            unsafe {
                out.push((*node.element(), node.color()));
                cur = node.successor();
            }
        }
        out
    }

    #[test]
    fn first_insert_is_black_root() {
        let mut tree = RedBlackTree::new();
        assert_eq!(tree.insert(12), Ok(()));
        assert_eq!(tree.len(), 1);
        let root = tree.root.unwrap();
        unsafe {
            assert_eq!(*root.element(), 12);
            assert!(root.color().is_black());
            assert_eq!(root.parent(), None);
        }
    }

    #[test]
    fn red_uncle_recolors() {
        init_logging();
        let mut tree = RedBlackTree::new();
        for x in [10, 5, 15, 1] {
            tree.insert(x).unwrap();
        }
        //        10:b
        //       /    \
        //     5:b    15:b
        //     /
        //   1:r
        assert_eq!(
            colors(&tree),
            [(1, Color::Red), (5, Color::Black), (10, Color::Black), (15, Color::Black)]
        );
        tree.validate().unwrap();
    }

    #[test]
    fn outer_child_rotates_once() {
        let mut tree = RedBlackTree::new();
        for x in [1, 2, 3] {
            tree.insert(x).unwrap();
        }
        let root = tree.root.unwrap();
        assert_eq!(unsafe { *root.element() }, 2);
        assert_eq!(
            colors(&tree),
            [(1, Color::Red), (2, Color::Black), (3, Color::Red)]
        );
    }

    #[test]
    fn inner_child_rotates_twice() {
        let mut tree = RedBlackTree::new();
        for x in [3, 1, 2] {
            tree.insert(x).unwrap();
        }
        let root = tree.root.unwrap();
        assert_eq!(unsafe { *root.element() }, 2);
        assert_eq!(
            colors(&tree),
            [(1, Color::Red), (2, Color::Black), (3, Color::Red)]
        );

        let mut tree = RedBlackTree::new();
        for x in [1, 3, 2] {
            tree.insert(x).unwrap();
        }
        assert_eq!(unsafe { *tree.root.unwrap().element() }, 2);
    }

    #[test]
    fn duplicate_leaves_tree_unchanged() {
        let mut tree = RedBlackTree::new();
        for x in [5, 3, 8, 1, 4, 7, 9] {
            tree.insert(x).unwrap();
        }
        let before = colors(&tree);

        assert_eq!(tree.insert(5), Err(TreeError::DuplicateKey));
        assert_eq!(tree.insert(1), Err(TreeError::DuplicateKey));
        assert_eq!(tree.len(), 7);
        assert_eq!(colors(&tree), before);
    }

    #[test]
    fn ascending_and_descending_runs_stay_balanced() {
        init_logging();
        let mut up = RedBlackTree::new();
        let mut down = RedBlackTree::new();
        for x in 0..1024 {
            up.insert(x).unwrap();
            down.insert(-x).unwrap();
        }
        up.validate().unwrap();
        down.validate().unwrap();

        // Height of a red-black tree is at most 2 * log2(n + 1).
        for tree in [&up, &down] {
            let mut max_depth = 0;
            let mut cur = tree.root.map(|r| unsafe { r.min_of() });
            while let Some(node) = cur {
                let mut depth = 1;
                let mut p = unsafe { node.parent() };
                while let Some(n) = p {
                    depth += 1;
                    p = unsafe { n.parent() };
                }
                max_depth = max_depth.max(depth);
                cur = unsafe { node.successor() };
            }
            assert!(max_depth <= 2 * 11, "depth {max_depth}");
        }
    }

    #[test]
    fn custom_comparator_orders_descending() {
        let mut tree =
            RedBlackTree::with_comparator(crate::FnComparator(|a: &i32, b: &i32| b.cmp(a)));
        for x in [1, 5, 3] {
            tree.insert(x).unwrap();
        }
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [5, 3, 1]);
        assert_eq!(tree.insert(3), Err(TreeError::DuplicateKey));
    }
}
