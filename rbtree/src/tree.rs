use core::fmt;
use core::marker::PhantomData;
use core::mem;
use core::ops::Deref;
use std::alloc::{handle_alloc_error, Layout};

use log::{debug, trace};

use crate::compare::{ByAddress, Comparator, NaturalOrder};
use crate::node::{Node, RawNode};
use crate::TreeError;

/// An ordered set of `T`, ordered by the comparator `C`.
///
/// Elements comparing equal under `C` are the same member: the tree never
/// holds two of them.
pub struct RedBlackTree<T, C = NaturalOrder> {
    // INVARIANTS:
    //  * `root` is `None` exactly when `len == 0`
    //  * every node reachable from `root` is live and owned by its parent
    pub(crate) root: Option<RawNode<T>>,
    pub(crate) len: usize,
    pub(crate) cmp: C,
    pub(crate) marker: PhantomData<Box<Node<T>>>,
}

impl<T> RedBlackTree<T, NaturalOrder> {
    /// Creates an empty tree ordered by `T`'s [`Ord`] implementation.
    ///
    /// For references and other pointers this compares the pointees, not
    /// their addresses. Use [`by_address`](RedBlackTree::by_address) to order
    /// `&U` or `Rc<U>` elements by identity instead.
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<T: Deref> RedBlackTree<T, ByAddress> {
    /// Creates an empty tree of pointer-like elements ordered by the address
    /// they point to.
    pub fn by_address() -> Self {
        Self::with_comparator(ByAddress)
    }
}

impl<T, C> RedBlackTree<T, C> {
    /// Creates an empty tree using `cmp` to order its elements.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            root: None,
            len: 0,
            cmp,
            marker: PhantomData,
        }
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Number of elements. This is a maintained counter, not a walk.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes and drops every element.
    ///
    /// Walks down preferring left children, then right ones, until it hits a
    /// leaf. The leaf is detached from its parent and freed, and the walk
    /// resumes from that parent. The root goes last.
    pub fn clear(&mut self) {
        // Detach everything up front so a panicking `T::drop` can only leak
        // nodes, never leave `self` pointing at freed memory.
        let Some(mut node) = self.root.take() else {
            return;
        };
        let count = mem::replace(&mut self.len, 0);

        let mut freed = 0usize;
        loop {
            unsafe {
                if let Some(left) = node.left() {
                    node = left;
                    continue;
                }
                if let Some(right) = node.right() {
                    node = right;
                    continue;
                }

                let parent = node.parent();
                if let Some(mut parent) = parent {
                    if parent.left() == Some(node) {
                        parent.set_left(None);
                    } else {
                        parent.set_right(None);
                    }
                }
                drop(node.free());
                freed += 1;

                match parent {
                    Some(parent) => node = parent,
                    None => break,
                }
            }
        }

        debug_assert_eq!(freed, count);
        debug!("cleared tree, freed {freed} nodes");
    }

    /// Points whatever referenced `old` (its parent or the root slot) at
    /// `new`, and sets `new`'s parent link accordingly.
    pub(crate) unsafe fn replace_subtree(&mut self, old: RawNode<T>, new: Option<RawNode<T>>) {
        unsafe {
            let parent = old.parent();
            match parent {
                None => self.root = new,
                Some(mut parent) => {
                    if parent.left() == Some(old) {
                        parent.set_left(new);
                    } else {
                        parent.set_right(new);
                    }
                }
            }

            if let Some(mut new) = new {
                new.set_parent(parent);
            }
        }
    }

    //     x                 r
    //    / \               / \
    //   a   r     ──►     x   c
    //      / \           / \
    //     b   c         a   b
    pub(crate) unsafe fn rotate_left(&mut self, mut x: RawNode<T>) {
        unsafe {
            let Some(mut r) = x.right() else {
                return;
            };
            trace!("rotate left at {:p}", x.as_ptr());

            let b = r.left();
            x.set_right(b);
            if let Some(mut b) = b {
                b.set_parent(Some(x));
            }

            self.replace_subtree(x, Some(r));
            r.set_left(Some(x));
            x.set_parent(Some(r));
        }
    }

    //       x             l
    //      / \           / \
    //     l   c   ──►   a   x
    //    / \               / \
    //   a   b             b   c
    pub(crate) unsafe fn rotate_right(&mut self, mut x: RawNode<T>) {
        unsafe {
            let Some(mut l) = x.left() else {
                return;
            };
            trace!("rotate right at {:p}", x.as_ptr());

            let b = l.right();
            x.set_left(b);
            if let Some(mut b) = b {
                b.set_parent(Some(x));
            }

            self.replace_subtree(x, Some(l));
            l.set_right(Some(x));
            x.set_parent(Some(l));
        }
    }
}

impl<T, C> RedBlackTree<T, C>
where
    C: Comparator<T>,
{
    /// Runs the diagnostic walk after a mutation when the `check-invariants`
    /// feature is enabled.
    #[inline]
    pub(crate) fn after_mutation(&self) {
        if cfg!(feature = "check-invariants") {
            if let Err(e) = self.validate() {
                panic!("{e}");
            }
        }
    }
}

impl<T, C> Drop for RedBlackTree<T, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, C: Default> Default for RedBlackTree<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C> fmt::Debug for RedBlackTree<T, C>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Elements<'a, T, C>(&'a RedBlackTree<T, C>);

        impl<T: fmt::Debug, C> fmt::Debug for Elements<'_, T, C> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_list().entries(self.0.iter()).finish()
            }
        }

        f.debug_struct("RedBlackTree")
            .field("len", &self.len)
            .field("elements", &Elements(self))
            .finish()
    }
}

impl<T, C> Extend<T> for RedBlackTree<T, C>
where
    C: Comparator<T>,
{
    /// Inserts every element, silently skipping ones already present.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            match self.insert(element) {
                Ok(()) | Err(TreeError::DuplicateKey) => {}
                Err(_) => handle_alloc_error(Layout::new::<Node<T>>()),
            }
        }
    }
}

impl<T, C> FromIterator<T> for RedBlackTree<T, C>
where
    C: Comparator<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::node::Color;
    use crate::test_util::init_logging;

    /// In-order `(element, parent element)` pairs, enough to pin down a shape.
    fn shape(tree: &RedBlackTree<i32>) -> Vec<(i32, Option<i32>)> {
        let mut out = Vec::new();
        let mut cur = tree.root.map(|r| unsafe { r.min_of() });
        while let Some(node) = cur {
            unsafe {
                out.push((*node.element(), node.parent().map(|p| *p.element())));
                cur = node.successor();
            }
        }
        out
    }

    #[test]
    fn new_is_empty() {
        let tree = RedBlackTree::<i32>::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.root.is_none());
    }

    #[test]
    fn new_orders_references_by_value() {
        let (a, b, c) = (2, 1, 2);
        let mut tree = RedBlackTree::new();
        tree.insert(&a).unwrap();
        tree.insert(&b).unwrap();
        assert_eq!(tree.insert(&c), Err(TreeError::DuplicateKey));
        assert_eq!(tree.iter().copied().copied().collect::<Vec<_>>(), [1, 2]);

        let mut by_address = RedBlackTree::by_address();
        by_address.extend([&a, &b, &c]);
        assert_eq!(by_address.len(), 3);
    }

    /// Plain unbalanced BST insert so tests can build exact shapes.
    fn insert_bst(tree: &mut RedBlackTree<i32>, key: i32) {
        let mut parent = None;
        let mut cur = tree.root;
        while let Some(node) = cur {
            parent = Some(node);
            cur = unsafe {
                if key < *node.element() {
                    node.left()
                } else {
                    node.right()
                }
            };
        }

        let node = RawNode::alloc(Node {
            element: key,
            color: Color::Black,
            parent,
            left: None,
            right: None,
        })
        .unwrap();
        match parent {
            None => tree.root = Some(node),
            Some(mut p) => unsafe {
                if key < *p.element() {
                    p.set_left(Some(node));
                } else {
                    p.set_right(Some(node));
                }
            },
        }
        tree.len += 1;
    }

    #[test]
    fn rotate_roundtrip() {
        init_logging();
        let mut tree = RedBlackTree::new();
        for key in [12, 9, 15, 14, 16] {
            insert_bst(&mut tree, key);
        }

        //       12
        //     9    15
        //        14  16
        let expected0 = vec![
            (9, Some(12)),
            (12, None),
            (14, Some(15)),
            (15, Some(12)),
            (16, Some(15)),
        ];
        assert_eq!(shape(&tree), expected0);

        //         15
        //      12    16
        //    9   14
        unsafe { tree.rotate_left(tree.root.unwrap()) };
        let expected1 = vec![
            (9, Some(12)),
            (12, Some(15)),
            (14, Some(12)),
            (15, None),
            (16, Some(15)),
        ];
        assert_eq!(shape(&tree), expected1);

        unsafe { tree.rotate_left(tree.root.unwrap()) };
        let expected2 = vec![
            (9, Some(12)),
            (12, Some(15)),
            (14, Some(12)),
            (15, Some(16)),
            (16, None),
        ];
        assert_eq!(shape(&tree), expected2);

        let node = tree.find(&12).unwrap();
        unsafe { tree.rotate_left(node) };
        let expected3 = vec![
            (9, Some(12)),
            (12, Some(14)),
            (14, Some(15)),
            (15, Some(16)),
            (16, None),
        ];
        assert_eq!(shape(&tree), expected3);

        let node = tree.find(&14).unwrap();
        unsafe { tree.rotate_right(node) };
        assert_eq!(shape(&tree), expected2);

        unsafe { tree.rotate_right(tree.root.unwrap()) };
        assert_eq!(shape(&tree), expected1);

        unsafe { tree.rotate_right(tree.root.unwrap()) };
        assert_eq!(shape(&tree), expected0);
    }

    #[test]
    fn rotations_preserve_order() {
        let mut tree = RedBlackTree::new();
        tree.extend(0..32);
        let expected: Vec<_> = (0..32).collect();

        for key in [0, 5, 16, 31, 7] {
            let node = tree.find(&key).unwrap();
            unsafe { tree.rotate_left(node) };
            assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expected);
            let node = tree.find(&key).unwrap();
            unsafe { tree.rotate_right(node) };
            assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn rotate_without_child_is_noop() {
        let mut tree = RedBlackTree::new();
        tree.insert(1).unwrap();
        let root = tree.root.unwrap();
        unsafe {
            tree.rotate_left(root);
            tree.rotate_right(root);
        }
        assert_eq!(tree.root, Some(root));
        assert_eq!(unsafe { root.color() }, Color::Black);
    }

    #[derive(Debug)]
    struct DropCounter(i32, Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.1.set(self.1.get() + 1);
        }
    }

    #[test]
    fn clear_frees_every_node_once() {
        init_logging();
        let drops = Rc::new(Cell::new(0));
        let mut tree = RedBlackTree::with_comparator(crate::FnComparator(
            |a: &DropCounter, b: &DropCounter| a.0.cmp(&b.0),
        ));
        for i in 0..100 {
            tree.insert(DropCounter(i, Rc::clone(&drops))).unwrap();
        }

        tree.clear();
        assert_eq!(drops.get(), 100);
        assert!(tree.is_empty());
        assert!(tree.root.is_none());

        // Reusable after clearing.
        tree.insert(DropCounter(1, Rc::clone(&drops))).unwrap();
        assert_eq!(tree.len(), 1);
        drop(tree);
        assert_eq!(drops.get(), 101);
    }

    #[test]
    fn clear_empty() {
        let mut tree = RedBlackTree::<u8>::new();
        tree.clear();
        assert!(tree.is_empty());
    }

    #[test]
    fn deep_tree_teardown() {
        // Deep enough that a recursive teardown would be noticeable.
        let tree: RedBlackTree<u32> = (0..200_000).collect();
        assert_eq!(tree.len(), 200_000);
        drop(tree);
    }

    #[test]
    fn debug_lists_elements() {
        let tree: RedBlackTree<i32> = [3, 1, 2].into_iter().collect();
        assert_eq!(
            format!("{tree:?}"),
            "RedBlackTree { len: 3, elements: [1, 2, 3] }"
        );
    }

    #[test]
    fn extend_skips_duplicates() {
        let mut tree = RedBlackTree::new();
        tree.extend([4, 4, 2, 2, 9]);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [2, 4, 9]);
    }
}
