//! Fractional-weight aperture masks placed on an image grid.
//!
//! An [`ApertureMask`] pairs a grid of pixel-coverage weights with the
//! [`BoundingBox`](pa_bbox::BoundingBox) that locates it. Every operation
//! against a data grid first asks the box for its overlap with that grid:
//! - No shared pixel is a normal outcome, reported as `None` (or an empty
//!   `Vec` from [`ApertureMask::get_values`]), never as an error.
//! - A box fully inside the grid lets [`ApertureMask::cutout`] borrow the data
//!   instead of copying it.
//! - A box partly outside the grid yields a weight-shaped copy padded with a
//!   fill value.
//!
//! Errors are reserved for malformed input: weights whose shape disagrees with
//! the box, or an exclusion mask whose shape disagrees with the data grid.

mod cutout;
mod mask;
mod values;

pub use cutout::{Cutout, CutoutConfig, CutoutMut};
pub use mask::ApertureMask;
pub use values::OverlapCutouts;
