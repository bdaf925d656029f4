use core::cmp::Ordering;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::ControlFlow;

use crate::compare::Comparator;
use crate::node::RawNode;
use crate::RedBlackTree;

/// Where an in-order walk stands relative to the current node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Just arrived from above, the left subtree is still to do.
    Descend,
    /// Left subtree done, the node itself is next.
    Visit,
    /// Whole subtree done, go back up.
    Ascend,
}

impl<T, C> RedBlackTree<T, C> {
    /// In-order walk driven by parent links only.
    ///
    /// `lower(e)` and `upper(e)` report how `e` compares to the bounds. A left
    /// subtree is entered only if it may hold elements `>= lower`, a right one
    /// only if it may hold elements `<= upper`, and the walk ends at the first
    /// element above `upper`.
    fn walk<'a, L, U, F>(&'a self, lower: L, upper: U, mut visit: F)
    where
        L: Fn(&T) -> Ordering,
        U: Fn(&T) -> Ordering,
        F: FnMut(&'a T) -> ControlFlow<()>,
    {
        let Some(mut node) = self.root else {
            return;
        };
        let mut step = Step::Descend;

        loop {
            let element: &'a T = unsafe { node.element() };
            match step {
                Step::Descend => {
                    step = Step::Visit;
                    if lower(element) == Ordering::Greater {
                        if let Some(left) = unsafe { node.left() } {
                            node = left;
                            step = Step::Descend;
                        }
                    }
                }
                Step::Visit => {
                    if upper(element) == Ordering::Greater {
                        return;
                    }
                    if lower(element) != Ordering::Less && visit(element).is_break() {
                        return;
                    }

                    step = Step::Ascend;
                    if upper(element) == Ordering::Less {
                        if let Some(right) = unsafe { node.right() } {
                            node = right;
                            step = Step::Descend;
                        }
                    }
                }
                Step::Ascend => {
                    let Some(parent) = (unsafe { node.parent() }) else {
                        return;
                    };
                    // Coming up from the left means the parent is not visited yet.
                    step = if unsafe { parent.left() } == Some(node) {
                        Step::Visit
                    } else {
                        Step::Ascend
                    };
                    node = parent;
                }
            }
        }
    }

    /// Calls `f` on every element in ascending order until it returns
    /// [`ControlFlow::Break`].
    pub fn for_each<'a, F>(&'a self, f: F)
    where
        F: FnMut(&'a T) -> ControlFlow<()>,
    {
        self.walk(|_| Ordering::Greater, |_| Ordering::Less, f)
    }

    /// Clones elements in ascending order into `buf` until either the tree or
    /// the buffer runs out. Returns how many were written.
    pub fn enumerate(&self, buf: &mut [T]) -> usize
    where
        T: Clone,
    {
        fill(buf, |sink| self.for_each(sink))
    }

    /// Borrowing iterator over the elements in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            front: self.root.map(|root| unsafe { root.min_of() }),
            back: self.root.map(|root| unsafe { root.max_of() }),
            remaining: self.len,
            marker: PhantomData,
        }
    }
}

impl<T, C> RedBlackTree<T, C>
where
    C: Comparator<T>,
{
    /// Calls `f` in ascending order on every element `e` with
    /// `lower <= e <= upper` until it returns [`ControlFlow::Break`].
    ///
    /// Subtrees entirely outside the bounds are never entered, so this costs
    /// `O(k + log n)` for `k` matches.
    pub fn for_each_in_range<'a, F>(&'a self, lower: &T, upper: &T, f: F)
    where
        F: FnMut(&'a T) -> ControlFlow<()>,
    {
        if self.cmp.compare(lower, upper) == Ordering::Greater {
            return;
        }
        self.walk(
            |e| self.cmp.compare(e, lower),
            |e| self.cmp.compare(e, upper),
            f,
        )
    }

    /// Like [`enumerate`](Self::enumerate) but only for elements `e` with
    /// `lower <= e <= upper`. An inverted range writes nothing.
    pub fn range(&self, lower: &T, upper: &T, buf: &mut [T]) -> usize
    where
        T: Clone,
    {
        fill(buf, |sink| self.for_each_in_range(lower, upper, sink))
    }
}

/// Feeds a walk into `buf`, stopping the walk once `buf` is full.
fn fill<'a, T, W>(buf: &mut [T], walk: W) -> usize
where
    T: Clone + 'a,
    W: FnOnce(&mut dyn FnMut(&'a T) -> ControlFlow<()>),
{
    if buf.is_empty() {
        return 0;
    }

    let mut written = 0;
    walk(&mut |element: &'a T| {
        buf[written].clone_from(element);
        written += 1;
        if written == buf.len() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    written
}

/// Iterator returned by [`RedBlackTree::iter`].
///
/// Steps between neighbours with parent links, so it holds no stack.
pub struct Iter<'a, T> {
    front: Option<RawNode<T>>,
    back: Option<RawNode<T>>,
    // Both ends meet exactly when this hits zero.
    remaining: usize,
    marker: PhantomData<&'a T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
            remaining: self.remaining,
            marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front?;
        self.remaining -= 1;
        unsafe {
            self.front = node.successor();
            Some(node.element())
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back?;
        self.remaining -= 1;
        unsafe {
            self.back = node.predecessor();
            Some(node.element())
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T, C> IntoIterator for &'a RedBlackTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
