use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A lower bound exceeds its paired upper bound, or a bound is not finite.
    #[error("invalid {axis} bounds: lower {lower} exceeds upper {upper}")]
    InvalidBound {
        axis: &'static str,
        lower: f64,
        upper: f64,
    },
    /// Two grids that must be co-registered have different `(height, width)`.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("size mismatch: expected {expected} elements, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("out of bounds")]
    OutOfBounds,
    #[error("invalid stride")]
    InvalidStride,
}

impl Error {
    pub fn invalid_bound(axis: &'static str, lower: f64, upper: f64) -> Self {
        Self::InvalidBound { axis, lower, upper }
    }

    pub fn shape_mismatch(expected: (usize, usize), actual: (usize, usize)) -> Self {
        Self::ShapeMismatch { expected, actual }
    }
}
