use core::cmp::Ordering;

use crate::compare::Comparator;
use crate::node::RawNode;
use crate::RedBlackTree;

impl<T, C> RedBlackTree<T, C>
where
    C: Comparator<T>,
{
    pub(crate) fn find(&self, element: &T) -> Option<RawNode<T>> {
        let mut maybe_node = self.root;
        while let Some(node) = maybe_node {
            match self.cmp.compare(element, unsafe { node.element() }) {
                Ordering::Less => maybe_node = unsafe { node.left() },
                Ordering::Equal => return Some(node),
                Ordering::Greater => maybe_node = unsafe { node.right() },
            }
        }

        None
    }

    pub fn contains(&self, element: &T) -> bool {
        self.find(element).is_some()
    }

    /// Returns the stored element comparing equal to `element`.
    ///
    /// With a comparator that only looks at part of `T` this is a lookup by
    /// key.
    pub fn get(&self, element: &T) -> Option<&T> {
        self.find(element).map(|node| unsafe { node.element() })
    }

    /// Smallest element in the tree following the stored one equal to
    /// `element`, or `None` if `element` is absent or the largest.
    pub fn successor(&self, element: &T) -> Option<&T> {
        let node = self.find(element)?;
        unsafe { node.successor().map(|node| node.element()) }
    }

    /// Largest element in the tree preceding the stored one equal to
    /// `element`, or `None` if `element` is absent or the smallest.
    pub fn predecessor(&self, element: &T) -> Option<&T> {
        let node = self.find(element)?;
        unsafe { node.predecessor().map(|node| node.element()) }
    }
}

impl<T, C> RedBlackTree<T, C> {
    pub fn min(&self) -> Option<&T> {
        self.root.map(|root| unsafe { root.min_of().element() })
    }

    pub fn max(&self) -> Option<&T> {
        self.root.map(|root| unsafe { root.max_of().element() })
    }
}
