//! Integer bounding boxes in pixel-index space.
//!
//! A [`BoundingBox`] is half-open: it covers columns `[ixmin, ixmax)` and rows
//! `[iymin, iymax)`. It carries no knowledge of any grid, so its bounds may be
//! negative or run past a grid's edge.
//!
//! Continuous coordinates follow the pixel-center convention: pixel `i` spans
//! `[i - 0.5, i + 0.5)`.
//!
//! [`BoundingBox::get_overlap_slices`] intersects a box with a `(ny, nx)` grid
//! and reports the shared region twice, once in grid indices and once in
//! box-local indices, so a box-shaped buffer and the grid can be sliced in
//! lockstep.

mod bbox;
mod overlap;

pub use bbox::BoundingBox;
pub use overlap::{OverlapSlices, Slice2d};
