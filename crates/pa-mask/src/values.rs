use pa_bbox::Slice2d;
use pa_core::{Error, Image, ImageView};

use crate::ApertureMask;

/// Overlap of one mask with one `(ny, nx)` grid, reusable across every grid
/// co-registered with it (data, error, flags).
#[derive(Debug, Clone)]
pub struct OverlapCutouts<'a> {
    /// Overlap region in grid indices.
    pub large: Slice2d,
    /// Mask weights over the overlap region.
    pub weights: ImageView<'a, f64>,
    /// `true` for pixels with nonzero weight that no external mask excludes.
    pub pixel_mask: Image<bool>,
    grid_shape: (usize, usize),
}

impl OverlapCutouts<'_> {
    /// `(ny, nx)` of the grid this overlap was computed for.
    pub fn grid_shape(&self) -> (usize, usize) {
        self.grid_shape
    }

    /// `weights * data[large]` at every selected pixel, in row-major order.
    pub fn values<T: Copy + Into<f64>>(&self, data: &ImageView<'_, T>) -> Result<Vec<f64>, Error> {
        if data.shape() != self.grid_shape {
            return Err(Error::shape_mismatch(self.grid_shape, data.shape()));
        }

        let region = self.large.view(data)?;
        let mut out = Vec::new();
        for y in 0..region.height() {
            let selected = self.pixel_mask.data()[y * region.width()..(y + 1) * region.width()]
                .iter()
                .zip(self.weights.row(y))
                .zip(region.row(y));
            for ((&keep, &w), &v) in selected {
                if keep {
                    out.push(w * v.into());
                }
            }
        }
        Ok(out)
    }
}

impl ApertureMask {
    /// Slices shared by every grid of shape `(ny, nx)`.
    ///
    /// `external_mask`, when given, must have shape `(ny, nx)`; its `true`
    /// pixels are excluded from `pixel_mask`. Returns `Ok(None)` when the
    /// mask does not overlap the grid.
    pub fn get_overlap_cutouts(
        &self,
        ny: usize,
        nx: usize,
        external_mask: Option<&ImageView<'_, bool>>,
    ) -> Result<Option<OverlapCutouts<'_>>, Error> {
        if let Some(ext) = external_mask
            && ext.shape() != (ny, nx)
        {
            return Err(Error::shape_mismatch((ny, nx), ext.shape()));
        }

        let Some(slices) = self.get_overlap_slices(ny, nx) else {
            return Ok(None);
        };

        let weights = slices.small.view(&self.weights().as_view())?;
        let mut pixel_mask = Image::new_fill(weights.width(), weights.height(), false);
        let width = weights.width();
        for (y, w_row) in weights.rows().enumerate() {
            let mask_row = &mut pixel_mask.data_mut()[y * width..(y + 1) * width];
            for (keep, &w) in mask_row.iter_mut().zip(w_row) {
                *keep = w > 0.0;
            }
        }

        if let Some(ext) = external_mask {
            let excluded = slices.large.view(ext)?;
            for (y, ex_row) in excluded.rows().enumerate() {
                let mask_row = &mut pixel_mask.data_mut()[y * width..(y + 1) * width];
                for (keep, &ex) in mask_row.iter_mut().zip(ex_row) {
                    *keep &= !ex;
                }
            }
        }

        Ok(Some(OverlapCutouts {
            large: slices.large,
            weights,
            pixel_mask,
            grid_shape: (ny, nx),
        }))
    }

    /// Weighted values of `data` under the mask's nonzero-weight pixels,
    /// row-major. Empty when the mask does not overlap `data`.
    pub fn get_values<T: Copy + Into<f64>>(
        &self,
        data: &ImageView<'_, T>,
        external_mask: Option<&ImageView<'_, bool>>,
    ) -> Result<Vec<f64>, Error> {
        let (ny, nx) = data.shape();
        match self.get_overlap_cutouts(ny, nx, external_mask)? {
            Some(cutouts) => cutouts.values(data),
            None => Ok(Vec::new()),
        }
    }
}
