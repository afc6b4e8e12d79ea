use pa_bbox::Slice2d;
use pa_core::{Image, ImageView, ImageViewMut};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::ApertureMask;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CutoutConfig<T> {
    /// Value for cutout pixels that fall outside the data grid.
    pub fill_value: T,
    /// Copy even when the cutout could borrow the data grid.
    pub force_copy: bool,
}

impl<T> CutoutConfig<T> {
    pub fn new(fill_value: T) -> Self {
        Self {
            fill_value,
            force_copy: false,
        }
    }

    pub fn with_force_copy(mut self, force_copy: bool) -> Self {
        self.force_copy = force_copy;
        self
    }
}

/// Region of a data grid aligned with a mask's bounding box.
///
/// `Borrowed` aliases the caller's grid and only occurs when the box lies
/// entirely inside it and no copy was requested.
#[derive(Debug, Clone)]
pub enum Cutout<'a, T> {
    Borrowed(ImageView<'a, T>),
    Owned(Image<T>),
}

impl<T> Cutout<'_, T> {
    pub fn as_view(&self) -> ImageView<'_, T> {
        match self {
            Self::Borrowed(view) => *view,
            Self::Owned(img) => img.as_view(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.as_view().shape()
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }
}

impl<T: Clone> Cutout<'_, T> {
    pub fn into_owned(self) -> Image<T> {
        match self {
            Self::Borrowed(view) => view.to_image(),
            Self::Owned(img) => img,
        }
    }
}

/// Mutable counterpart of [`Cutout`]; writes through `Borrowed` reach the
/// data grid.
#[derive(Debug)]
pub enum CutoutMut<'a, T> {
    Borrowed(ImageViewMut<'a, T>),
    Owned(Image<T>),
}

impl<T> CutoutMut<'_, T> {
    pub fn as_view(&self) -> ImageView<'_, T> {
        match self {
            Self::Borrowed(view) => view.as_view(),
            Self::Owned(img) => img.as_view(),
        }
    }

    pub fn as_view_mut(&mut self) -> ImageViewMut<'_, T> {
        match self {
            Self::Borrowed(view) => view.reborrow(),
            Self::Owned(img) => img.as_view_mut(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.as_view().shape()
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }
}

impl<T: Clone> CutoutMut<'_, T> {
    pub fn into_owned(self) -> Image<T> {
        match self {
            Self::Borrowed(view) => view.as_view().to_image(),
            Self::Owned(img) => img,
        }
    }
}

impl ApertureMask {
    /// Extracts the part of `data` under this mask's bounding box.
    ///
    /// Returns `None` when the box and `data` share no pixel. When the box is
    /// fully inside `data` the result borrows `data` unless
    /// `cfg.force_copy` is set; otherwise it is a new buffer shaped like the
    /// weights, padded with `cfg.fill_value`.
    pub fn cutout<'a, T: Copy>(
        &self,
        data: &ImageView<'a, T>,
        cfg: &CutoutConfig<T>,
    ) -> Option<Cutout<'a, T>> {
        let (ny, nx) = data.shape();
        let slices = self.get_overlap_slices(ny, nx)?;

        if slices.is_full(&self.bbox()) {
            let region = match slices.large.view(data) {
                Ok(region) => region,
                // `large` is clipped to `[0, ny) x [0, nx)` of this same grid.
                Err(err) => unreachable!("overlap slices outside their own grid: {err}"),
            };
            if cfg.force_copy {
                return Some(Cutout::Owned(region.to_image()));
            }
            trace!(bbox = %self.bbox(), "borrowing cutout from data grid");
            return Some(Cutout::Borrowed(region));
        }

        let (height, width) = self.shape();
        let mut out = Image::new_fill(width, height, cfg.fill_value);
        copy_overlap_into(
            data,
            &slices.large,
            &mut out.as_view_mut(),
            &slices.small,
            |&v| v,
        );
        Some(Cutout::Owned(out))
    }

    /// Like [`ApertureMask::cutout`], but a borrowed result can write back
    /// into `data`.
    pub fn cutout_mut<'a, T: Copy>(
        &self,
        data: ImageViewMut<'a, T>,
        cfg: &CutoutConfig<T>,
    ) -> Option<CutoutMut<'a, T>> {
        let (ny, nx) = data.shape();
        let slices = self.get_overlap_slices(ny, nx)?;

        if slices.is_full(&self.bbox()) && !cfg.force_copy {
            trace!(bbox = %self.bbox(), "borrowing mutable cutout from data grid");
            return match slices.large.view_mut(data) {
                Ok(region) => Some(CutoutMut::Borrowed(region)),
                Err(err) => unreachable!("overlap slices outside their own grid: {err}"),
            };
        }

        let (height, width) = self.shape();
        let mut out = Image::new_fill(width, height, cfg.fill_value);
        copy_overlap_into(
            &data.as_view(),
            &slices.large,
            &mut out.as_view_mut(),
            &slices.small,
            |&v| v,
        );
        Some(CutoutMut::Owned(out))
    }

    /// Always-owned cutout with pixels converted to `U`.
    ///
    /// Lets integer data be padded with a fill it cannot hold itself, such as
    /// `f64::NAN`.
    pub fn cutout_as<T, U>(&self, data: &ImageView<'_, T>, fill_value: U) -> Option<Image<U>>
    where
        T: Copy + Into<U>,
        U: Copy,
    {
        let (ny, nx) = data.shape();
        let slices = self.get_overlap_slices(ny, nx)?;

        let (height, width) = self.shape();
        let mut out = Image::new_fill(width, height, fill_value);
        copy_overlap_into(
            data,
            &slices.large,
            &mut out.as_view_mut(),
            &slices.small,
            |&v| v.into(),
        );
        Some(out)
    }
}

/// Copies `src[src_slice]` into `dst[dst_slice]`, converting each pixel.
pub(crate) fn copy_overlap_into<S, D>(
    src: &ImageView<'_, S>,
    src_slice: &Slice2d,
    dst: &mut ImageViewMut<'_, D>,
    dst_slice: &Slice2d,
    convert: impl Fn(&S) -> D,
) {
    debug_assert_eq!(src_slice.shape(), dst_slice.shape());

    for (sy, dy) in src_slice.rows.clone().zip(dst_slice.rows.clone()) {
        let src_row = &src.row(sy)[src_slice.cols.clone()];
        let dst_row = &mut dst.row_mut(dy)[dst_slice.cols.clone()];
        for (d, s) in dst_row.iter_mut().zip(src_row) {
            *d = convert(s);
        }
    }
}
