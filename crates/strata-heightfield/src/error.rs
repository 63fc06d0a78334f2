//! Height field construction errors.

/// Errors that can occur when constructing a [`HeightField`](crate::HeightField).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeightFieldError {
    /// Both axes need at least two samples to span a world extent.
    #[error("invalid resolution {width}x{depth}: each axis needs at least 2 samples")]
    InvalidResolution {
        /// Requested sample count along X.
        width: usize,
        /// Requested sample count along Z.
        depth: usize,
    },

    /// World extent must be positive and finite on both axes.
    #[error("invalid world extent {world_width}x{world_depth}")]
    InvalidExtent {
        /// Requested world size along X.
        world_width: f32,
        /// Requested world size along Z.
        world_depth: f32,
    },

    /// The supplied sample buffer does not match `width * depth`.
    #[error("expected {expected} height samples, got {actual}")]
    SampleCountMismatch {
        /// `width * depth`.
        expected: usize,
        /// Length of the buffer that was passed in.
        actual: usize,
    },
}
