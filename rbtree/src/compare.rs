use core::cmp::Ordering;
use core::fmt;
use core::ops::Deref;

/// Three-way ordering strategy used by [`RedBlackTree`](crate::RedBlackTree).
///
/// Two elements for which `compare` returns [`Ordering::Equal`] are the same
/// member of the set.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering;
}

/// Orders elements by their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Orders pointer-like elements by the address of what they point to.
///
/// Two handles to the same allocation compare equal even if the pointees
/// would compare unequal by value, and vice versa. Only useful for
/// reference-typed elements such as `&U`, `Box<U>` or `Rc<U>`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ByAddress;

impl<P: Deref> Comparator<P> for ByAddress {
    #[inline]
    fn compare(&self, lhs: &P, rhs: &P) -> Ordering {
        let lhs = (&**lhs as *const P::Target).cast::<()>();
        let rhs = (&**rhs as *const P::Target).cast::<()>();
        lhs.cmp(&rhs)
    }
}

/// Wraps a closure returning an [`Ordering`].
#[derive(Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnComparator")
    }
}

impl<T: ?Sized, F> Comparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        (self.0)(lhs, rhs)
    }
}

/// Wraps a closure following the integer convention: negative when `lhs` is
/// smaller, zero when equal and positive when `lhs` is greater.
#[derive(Clone, Copy)]
pub struct ThreeWay<F>(F);

impl<F> fmt::Debug for ThreeWay<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ThreeWay")
    }
}

impl<T: ?Sized, F> Comparator<T> for ThreeWay<F>
where
    F: Fn(&T, &T) -> i32,
{
    #[inline]
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        (self.0)(lhs, rhs).cmp(&0)
    }
}

/// Adapts an integer-returning comparison function.
///
/// ```
/// use rbtree::{three_way, RedBlackTree};
///
/// let mut tree =
///     RedBlackTree::with_comparator(three_way(|a: &i64, b: &i64| (b - a).signum() as i32));
/// tree.extend([1, 3, 2]);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
pub fn three_way<T: ?Sized, F>(f: F) -> ThreeWay<F>
where
    F: Fn(&T, &T) -> i32,
{
    ThreeWay(f)
}
