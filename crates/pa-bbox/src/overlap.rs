use core::ops::Range;

use pa_core::{Error, ImageView, ImageViewMut};

use crate::BoundingBox;

/// Half-open row and column ranges into one particular grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slice2d {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Slice2d {
    pub fn new(rows: Range<usize>, cols: Range<usize>) -> Self {
        Self { rows, cols }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.cols.len()
    }

    /// `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    pub fn view<'a, T>(&self, grid: &ImageView<'a, T>) -> Result<ImageView<'a, T>, Error> {
        grid.subview(self.cols.start, self.rows.start, self.width(), self.height())
    }

    pub fn view_mut<'a, T>(&self, grid: ImageViewMut<'a, T>) -> Result<ImageViewMut<'a, T>, Error> {
        grid.into_subview_mut(self.cols.start, self.rows.start, self.width(), self.height())
    }
}

/// Where a box and a grid intersect, expressed in both index spaces.
///
/// `large` indexes the external `(ny, nx)` grid; `small` indexes any buffer
/// shaped like the box. Both always have the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverlapSlices {
    pub large: Slice2d,
    pub small: Slice2d,
}

impl OverlapSlices {
    /// True when the box lies entirely inside the grid.
    pub fn is_full(&self, bbox: &BoundingBox) -> bool {
        self.small.shape() == bbox.shape()
    }
}

impl BoundingBox {
    /// Overlap between this box and a grid covering `[0, ny) x [0, nx)`.
    ///
    /// Returns `None` when the two share no pixel, including when the box
    /// itself is empty.
    pub fn get_overlap_slices(&self, ny: usize, nx: usize) -> Option<OverlapSlices> {
        let ny = isize::try_from(ny).unwrap_or(isize::MAX);
        let nx = isize::try_from(nx).unwrap_or(isize::MAX);

        if self.is_empty()
            || self.ixmin() >= nx
            || self.iymin() >= ny
            || self.ixmax() <= 0
            || self.iymax() <= 0
        {
            return None;
        }

        let (large_rows, small_rows) = axis_overlap(self.iymin(), self.iymax(), ny);
        let (large_cols, small_cols) = axis_overlap(self.ixmin(), self.ixmax(), nx);

        Some(OverlapSlices {
            large: Slice2d::new(large_rows, large_cols),
            small: Slice2d::new(small_rows, small_cols),
        })
    }
}

// Callers guarantee `lo < n`, `hi > 0` and `lo < hi`.
fn axis_overlap(lo: isize, hi: isize, n: isize) -> (Range<usize>, Range<usize>) {
    let large_lo = lo.max(0);
    let large_hi = hi.min(n);
    // `lo <= large_lo < large_hi`; the distance from `lo` can exceed `isize::MAX`.
    let small_lo = large_lo.abs_diff(lo);
    let small_hi = large_hi.abs_diff(lo);

    (large_lo as usize..large_hi as usize, small_lo..small_hi)
}

#[cfg(test)]
mod tests {
    use pa_core::Image;

    use super::Slice2d;
    use crate::BoundingBox;

    fn bbox(ixmin: isize, ixmax: isize, iymin: isize, iymax: isize) -> BoundingBox {
        BoundingBox::new(ixmin, ixmax, iymin, iymax).expect("valid box")
    }

    #[test]
    fn partial_overlap_on_right_edge() {
        let slices = bbox(2, 5, 1, 3).get_overlap_slices(4, 4).expect("overlaps");

        assert_eq!(slices.large, Slice2d::new(1..3, 2..4));
        assert_eq!(slices.small, Slice2d::new(0..2, 0..2));
        assert!(!slices.is_full(&bbox(2, 5, 1, 3)));
    }

    #[test]
    fn box_starting_at_grid_width_does_not_overlap() {
        assert!(bbox(2, 5, 1, 3).get_overlap_slices(4, 2).is_none());
    }

    #[test]
    fn fully_inside_maps_to_whole_box() {
        let b = bbox(1, 4, 2, 5);
        let slices = b.get_overlap_slices(10, 10).expect("overlaps");

        assert_eq!(slices.large, Slice2d::new(2..5, 1..4));
        assert_eq!(slices.small, Slice2d::new(0..3, 0..3));
        assert!(slices.is_full(&b));
    }

    #[test]
    fn negative_origin_clips_small_side() {
        let slices = bbox(-2, 2, -1, 1).get_overlap_slices(3, 3).expect("overlaps");

        assert_eq!(slices.large, Slice2d::new(0..1, 0..2));
        assert_eq!(slices.small, Slice2d::new(1..2, 2..4));
    }

    #[test]
    fn box_larger_than_grid_on_both_sides() {
        let slices = bbox(-1, 5, -2, 6).get_overlap_slices(3, 2).expect("overlaps");

        assert_eq!(slices.large, Slice2d::new(0..3, 0..2));
        assert_eq!(slices.small, Slice2d::new(2..5, 1..3));
    }

    #[test]
    fn outside_on_any_single_axis_is_none() {
        assert!(bbox(-3, 0, 0, 2).get_overlap_slices(4, 4).is_none());
        assert!(bbox(0, 2, -3, 0).get_overlap_slices(4, 4).is_none());
        assert!(bbox(0, 2, 4, 6).get_overlap_slices(4, 4).is_none());
        assert!(bbox(1, 1, 0, 2).get_overlap_slices(4, 4).is_none());
        assert!(bbox(0, 2, 0, 2).get_overlap_slices(0, 0).is_none());
    }

    #[test]
    fn extreme_bounds_do_not_overflow() {
        let b = BoundingBox::from_float(-1e300, 2.0, 0.0, 2.0).expect("finite extent");
        assert_eq!(b.ixmin(), isize::MIN);
        let slices = b.get_overlap_slices(4, 4).expect("overlaps");
        let offset = isize::MIN.unsigned_abs();
        assert_eq!(slices.large, Slice2d::new(0..3, 0..3));
        assert_eq!(slices.small, Slice2d::new(0..3, offset..offset + 3));
        assert!(!slices.is_full(&b));

        let b = bbox(isize::MIN, isize::MAX, -1, isize::MAX);
        let slices = b.get_overlap_slices(2, 3).expect("overlaps");
        assert_eq!(slices.large, Slice2d::new(0..2, 0..3));
        assert_eq!(slices.small, Slice2d::new(1..3, offset..offset + 3));
    }

    #[test]
    fn overlap_invariants_hold_for_every_small_placement() {
        for (ny, nx) in [(1usize, 1usize), (3, 4), (5, 2)] {
            for ixmin in -5isize..7 {
                for w in 0isize..5 {
                    for iymin in -5isize..7 {
                        for h in 0isize..5 {
                            let b = bbox(ixmin, ixmin + w, iymin, iymin + h);
                            let outside = b.ixmin() >= nx as isize
                                || b.iymin() >= ny as isize
                                || b.ixmax() <= 0
                                || b.iymax() <= 0
                                || b.is_empty();

                            let Some(s) = b.get_overlap_slices(ny, nx) else {
                                assert!(outside, "{b} vs ({ny}, {nx})");
                                continue;
                            };
                            assert!(!outside, "{b} vs ({ny}, {nx})");

                            assert_eq!(s.large.shape(), s.small.shape());
                            assert!(s.large.height() > 0 && s.large.width() > 0);
                            assert!(s.large.rows.end <= ny && s.large.cols.end <= nx);
                            assert!(s.small.rows.end <= b.height());
                            assert!(s.small.cols.end <= b.width());

                            let inside = b.ixmin() >= 0
                                && b.iymin() >= 0
                                && b.ixmax() <= nx as isize
                                && b.iymax() <= ny as isize;
                            assert_eq!(s.is_full(&b), inside);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn slices_cut_matching_views() {
        let grid = Image::from_vec(4, 3, (0..12).collect::<Vec<i32>>()).expect("valid image");
        let slices = bbox(2, 6, -1, 2).get_overlap_slices(3, 4).expect("overlaps");

        let large = slices.large.view(&grid.as_view()).expect("in bounds");
        assert_eq!(large.shape(), slices.small.shape());
        assert_eq!(large.to_image().data(), &[2, 3, 6, 7]);

        let mut target = Image::new_fill(4, 3, 0i32);
        let mut sub = slices.small.view_mut(target.as_view_mut()).expect("in bounds");
        sub.copy_from(&large).expect("same shape");
        assert_eq!(target.data(), &[0, 0, 0, 0, 2, 3, 0, 0, 6, 7, 0, 0]);
    }
}
