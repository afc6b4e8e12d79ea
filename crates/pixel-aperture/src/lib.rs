//! Umbrella crate for the `pixel-aperture` workspace.
//!
//! Re-exports the grid types, bounding boxes, and aperture masks used to
//! combine a small weight mask with image data of arbitrary size.

pub use pa_bbox::*;
pub use pa_core::*;
pub use pa_mask::*;
