use pa_bbox::{BoundingBox, OverlapSlices};
use pa_core::{Error, Image, ImageView};
use tracing::{debug, trace};

use crate::cutout::copy_overlap_into;

/// Fractional pixel-coverage weights located on an implicit infinite grid by
/// a [`BoundingBox`].
///
/// `zero_mask` is derived once at construction and is `true` exactly where a
/// weight equals `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApertureMask {
    weights: Image<f64>,
    bbox: BoundingBox,
    zero_mask: Image<bool>,
}

impl ApertureMask {
    pub fn new(weights: Image<f64>, bbox: BoundingBox) -> Result<Self, Error> {
        if weights.shape() != bbox.shape() {
            return Err(Error::shape_mismatch(bbox.shape(), weights.shape()));
        }

        let zero_mask = weights.map(|&w| w == 0.0);
        debug!(
            %bbox,
            zero_pixels = zero_mask.data().iter().filter(|&&z| z).count(),
            "built aperture mask"
        );

        Ok(Self {
            weights,
            bbox,
            zero_mask,
        })
    }

    pub fn weights(&self) -> &Image<f64> {
        &self.weights
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn zero_mask(&self) -> &Image<bool> {
        &self.zero_mask
    }

    /// `(height, width)` of the weight grid, equal to the box shape.
    pub fn shape(&self) -> (usize, usize) {
        self.weights.shape()
    }

    pub fn get_overlap_slices(&self, ny: usize, nx: usize) -> Option<OverlapSlices> {
        let slices = self.bbox.get_overlap_slices(ny, nx);
        if slices.is_none() {
            trace!(bbox = %self.bbox, ny, nx, "aperture mask does not overlap grid");
        }
        slices
    }

    /// Embeds the weights into a `(ny, nx)` grid whose other pixels hold
    /// `fill`.
    pub fn to_image(&self, ny: usize, nx: usize, fill: f64) -> Option<Image<f64>> {
        let slices = self.get_overlap_slices(ny, nx)?;

        let mut out = Image::new_fill(nx, ny, fill);
        copy_overlap_into(
            &self.weights.as_view(),
            &slices.small,
            &mut out.as_view_mut(),
            &slices.large,
            |&w| w,
        );
        Some(out)
    }

    /// Weighted cutout of `data`: `cutout(data, fill_value) * weights`, with
    /// `fill_value` restored wherever the weight is exactly zero.
    ///
    /// Pixels outside `data` but under a nonzero weight hold
    /// `fill_value * weight`.
    pub fn multiply<T: Copy + Into<f64>>(
        &self,
        data: &ImageView<'_, T>,
        fill_value: f64,
    ) -> Option<Image<f64>> {
        let (ny, nx) = data.shape();
        let slices = self.get_overlap_slices(ny, nx)?;

        let mut out = Image::new_fill(self.weights.width(), self.weights.height(), fill_value);
        copy_overlap_into(
            data,
            &slices.large,
            &mut out.as_view_mut(),
            &slices.small,
            |&v| v.into(),
        );

        let weights = self.weights.data().iter();
        let zeros = self.zero_mask.data().iter();
        for (px, (&w, &is_zero)) in out.data_mut().iter_mut().zip(weights.zip(zeros)) {
            *px = if is_zero { fill_value } else { *px * w };
        }
        Some(out)
    }
}
