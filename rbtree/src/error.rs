/// Errors reported by [`RedBlackTree`](crate::RedBlackTree) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Storage for a new node could not be obtained. The tree is unchanged.
    #[error("failed to allocate a {size} byte tree node")]
    AllocationFailure { size: usize },

    /// An element comparing equal to the inserted one is already present.
    #[error("an equal element is already in the tree")]
    DuplicateKey,

    #[error("element not found")]
    NotFound,

    /// The diagnostic walk found a broken invariant. This is a defect in the
    /// tree itself, never a usage error.
    #[error("invalid tree: {0}")]
    InvalidTree(&'static str),
}
