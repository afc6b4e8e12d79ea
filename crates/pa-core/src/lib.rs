//! Foundational grid types for the pixel-aperture workspace.
//!
//! ## Shapes
//! Shapes are reported as `(height, width)`, i.e. `(ny, nx)`, matching the
//! row-major layout of every buffer. Pixel accessors take `(x, y)`.
//!
//! ## Image Views and Stride
//! Images use element stride (not byte stride). `stride` is the distance, in
//! elements, between adjacent row starts and may be greater than `width`.
//! Subviews borrow the parent buffer without copying, which is what lets a
//! cutout fully inside a data grid alias that grid.

mod error;
mod image;

pub use error::Error;
pub use image::{Image, ImageView, ImageViewMut};
