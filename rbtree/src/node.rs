use core::fmt;
use core::ptr::{self, NonNull};
use std::alloc::{self, Layout};

use log::warn;

use crate::TreeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    /// Returns `true` if the color is [`Red`].
    ///
    /// [`Red`]: Color::Red
    #[must_use]
    pub(crate) fn is_red(&self) -> bool {
        matches!(self, Self::Red)
    }

    /// Returns `true` if the color is [`Black`].
    ///
    /// [`Black`]: Color::Black
    #[must_use]
    pub(crate) fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }
}

pub(crate) struct Node<T> {
    pub(crate) element: T,
    pub(crate) color: Color,
    // Non-owning back-reference, only ever used to walk upwards.
    pub(crate) parent: Option<RawNode<T>>,
    pub(crate) left: Option<RawNode<T>>,
    pub(crate) right: Option<RawNode<T>>,
}

/// Color of a possibly missing child. Absent children are black.
#[inline]
pub(crate) unsafe fn color_of<T>(node: Option<RawNode<T>>) -> Color {
    match node {
        Some(node) => unsafe { node.color() },
        None => Color::Black,
    }
}

/// Wrapper around `NonNull<Node<T>>` to provide convenient methods in order
/// to make the algorithms of the tree much more readable.
///
/// All accessors are `unsafe`: the caller guarantees the node is live, that is
/// it was returned by [`RawNode::alloc`] and has not been passed to
/// [`RawNode::free`] yet.
#[repr(transparent)]
pub(crate) struct RawNode<T> {
    ptr: NonNull<Node<T>>,
}

impl<T> fmt::Debug for RawNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawNode").field(&self.ptr).finish()
    }
}

// Identity, not element equality.
impl<T> PartialEq for RawNode<T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.as_ptr(), other.as_ptr())
    }
}

impl<T> Eq for RawNode<T> {}

impl<T> Clone for RawNode<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RawNode<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodePos {
    Root,
    Left,
    Right,
}

impl<T> RawNode<T> {
    /// Moves `node` into a freshly allocated block.
    ///
    /// A failed allocation is reported instead of aborting the process.
    pub(crate) fn alloc(node: Node<T>) -> Result<Self, TreeError> {
        let layout = Layout::new::<Node<T>>();
        // SAFETY: `Node<T>` always holds three pointers, so `layout` is never zero sized.
        let ptr = unsafe { alloc::alloc(layout) }.cast::<Node<T>>();
        match NonNull::new(ptr) {
            Some(ptr) => {
                unsafe { ptr.as_ptr().write(node) };
                Ok(Self { ptr })
            }
            None => {
                warn!("node allocation of {} bytes failed", layout.size());
                Err(TreeError::AllocationFailure {
                    size: layout.size(),
                })
            }
        }
    }

    /// Releases the node's memory and hands back its element.
    ///
    /// # Safety
    ///
    /// The node must be live and unreachable from the tree. It must not be
    /// used again afterwards.
    pub(crate) unsafe fn free(self) -> T {
        let ptr = self.as_ptr();
        let node = unsafe { ptr::read(ptr) };
        unsafe { alloc::dealloc(ptr.cast(), Layout::new::<Node<T>>()) };
        node.element
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut Node<T> {
        self.ptr.as_ptr()
    }

    #[inline]
    pub(crate) unsafe fn element<'a>(&self) -> &'a T {
        unsafe { &(*self.as_ptr()).element }
    }

    #[inline]
    pub(crate) unsafe fn element_mut<'a>(&mut self) -> &'a mut T {
        unsafe { &mut (*self.as_ptr()).element }
    }

    #[inline]
    pub(crate) unsafe fn parent(&self) -> Option<RawNode<T>> {
        unsafe { (*self.as_ptr()).parent }
    }

    #[inline]
    pub(crate) unsafe fn set_parent(&mut self, new_parent: Option<RawNode<T>>) {
        unsafe {
            (*self.as_ptr()).parent = new_parent;
        }
    }

    #[inline]
    pub(crate) unsafe fn left(&self) -> Option<RawNode<T>> {
        unsafe { (*self.as_ptr()).left }
    }

    #[inline]
    pub(crate) unsafe fn set_left(&mut self, new_left: Option<RawNode<T>>) {
        unsafe {
            (*self.as_ptr()).left = new_left;
        }
    }

    #[inline]
    pub(crate) unsafe fn right(&self) -> Option<RawNode<T>> {
        unsafe { (*self.as_ptr()).right }
    }

    #[inline]
    pub(crate) unsafe fn set_right(&mut self, new_right: Option<RawNode<T>>) {
        unsafe {
            (*self.as_ptr()).right = new_right;
        }
    }

    #[inline]
    pub(crate) unsafe fn color(&self) -> Color {
        unsafe { (*self.as_ptr()).color }
    }

    #[inline]
    pub(crate) unsafe fn set_color(&mut self, new_color: Color) {
        unsafe { (*self.as_ptr()).color = new_color }
    }

    /// Which side of its parent this node hangs from.
    #[inline]
    pub(crate) unsafe fn pos(&self) -> NodePos {
        match unsafe { self.parent() } {
            Some(parent) if unsafe { parent.left() } == Some(*self) => NodePos::Left,
            Some(parent) => {
                debug_assert_eq!(unsafe { parent.right() }, Some(*self));
                NodePos::Right
            }
            None => NodePos::Root,
        }
    }

    /// Leftmost node of the subtree rooted here.
    #[inline]
    pub(crate) unsafe fn min_of(self) -> RawNode<T> {
        let mut x = self;
        while let Some(left) = unsafe { x.left() } {
            x = left;
        }
        x
    }

    /// Rightmost node of the subtree rooted here.
    #[inline]
    pub(crate) unsafe fn max_of(self) -> RawNode<T> {
        let mut x = self;
        while let Some(right) = unsafe { x.right() } {
            x = right;
        }
        x
    }

    /// Next node in ascending order, found with parent links only.
    pub(crate) unsafe fn successor(self) -> Option<RawNode<T>> {
        if let Some(right) = unsafe { self.right() } {
            return Some(unsafe { right.min_of() });
        }

        // Climb until we leave a left subtree; that parent is the successor.
        let mut node = self;
        let mut parent = unsafe { node.parent() };
        while let Some(p) = parent {
            if unsafe { p.left() } == Some(node) {
                break;
            }
            node = p;
            parent = unsafe { node.parent() };
        }
        parent
    }

    /// Previous node in ascending order. Mirror image of [`Self::successor`].
    pub(crate) unsafe fn predecessor(self) -> Option<RawNode<T>> {
        if let Some(left) = unsafe { self.left() } {
            return Some(unsafe { left.max_of() });
        }

        let mut node = self;
        let mut parent = unsafe { node.parent() };
        while let Some(p) = parent {
            if unsafe { p.right() } == Some(node) {
                break;
            }
            node = p;
            parent = unsafe { node.parent() };
        }
        parent
    }
}
