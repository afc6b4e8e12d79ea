use core::fmt;
use core::ops::{BitAnd, BitOr};

use pa_core::Error;
use serde::{Deserialize, Serialize};

/// Half-open integer rectangle covering columns `[ixmin, ixmax)` and rows
/// `[iymin, iymax)`.
///
/// Bounds may be negative or lie past the edge of any grid the box is later
/// compared against. The box never changes after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoundsRepr", into = "BoundsRepr")]
pub struct BoundingBox {
    ixmin: isize,
    ixmax: isize,
    iymin: isize,
    iymax: isize,
}

impl BoundingBox {
    /// Canonical zero-extent box returned for disjoint intersections.
    pub const EMPTY: Self = Self {
        ixmin: 0,
        ixmax: 0,
        iymin: 0,
        iymax: 0,
    };

    pub fn new(ixmin: isize, ixmax: isize, iymin: isize, iymax: isize) -> Result<Self, Error> {
        if ixmin > ixmax {
            return Err(Error::invalid_bound("x", ixmin as f64, ixmax as f64));
        }
        if iymin > iymax {
            return Err(Error::invalid_bound("y", iymin as f64, iymax as f64));
        }

        Ok(Self {
            ixmin,
            ixmax,
            iymin,
            iymax,
        })
    }

    /// Smallest box enclosing the continuous rectangle
    /// `[xmin, xmax] x [ymin, ymax]`.
    ///
    /// Pixel `i` spans `[i - 0.5, i + 0.5)`, so the lower edge rounds with
    /// `floor(v + 0.5)` and the upper edge with `ceil(v + 0.5)`.
    pub fn from_float(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self, Error> {
        if !xmin.is_finite() || !xmax.is_finite() {
            return Err(Error::invalid_bound("x", xmin, xmax));
        }
        if !ymin.is_finite() || !ymax.is_finite() {
            return Err(Error::invalid_bound("y", ymin, ymax));
        }

        Self::new(
            (xmin + 0.5).floor() as isize,
            (xmax + 0.5).ceil() as isize,
            (ymin + 0.5).floor() as isize,
            (ymax + 0.5).ceil() as isize,
        )
    }

    pub fn ixmin(&self) -> isize {
        self.ixmin
    }

    pub fn ixmax(&self) -> isize {
        self.ixmax
    }

    pub fn iymin(&self) -> isize {
        self.iymin
    }

    pub fn iymax(&self) -> isize {
        self.iymax
    }

    pub fn width(&self) -> usize {
        self.ixmax.abs_diff(self.ixmin)
    }

    pub fn height(&self) -> usize {
        self.iymax.abs_diff(self.iymin)
    }

    /// `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height(), self.width())
    }

    /// Pixel count, saturating at `usize::MAX`.
    pub fn area(&self) -> usize {
        self.width().saturating_mul(self.height())
    }

    pub fn is_empty(&self) -> bool {
        self.ixmin == self.ixmax || self.iymin == self.iymax
    }

    /// Centroid of the covered pixel indices as `(y, x)`.
    pub fn center(&self) -> (f64, f64) {
        (
            0.5 * ((self.iymax as f64 - 1.0) + self.iymin as f64),
            0.5 * ((self.ixmax as f64 - 1.0) + self.ixmin as f64),
        )
    }

    /// Pixel-edge outline as `(xmin, xmax, ymin, ymax)`.
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        (
            self.ixmin as f64 - 0.5,
            self.ixmax as f64 - 0.5,
            self.iymin as f64 - 0.5,
            self.iymax as f64 - 0.5,
        )
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            ixmin: self.ixmin.min(other.ixmin),
            ixmax: self.ixmax.max(other.ixmax),
            iymin: self.iymin.min(other.iymin),
            iymax: self.iymax.max(other.iymax),
        }
    }

    /// Pixels shared by both boxes.
    ///
    /// Boxes that only touch along an edge give a zero-width (or zero-height)
    /// box on that edge; disjoint boxes give [`BoundingBox::EMPTY`]. Either
    /// way the result [`is_empty`](Self::is_empty).
    pub fn intersection(&self, other: &Self) -> Self {
        let ixmin = self.ixmin.max(other.ixmin);
        let ixmax = self.ixmax.min(other.ixmax);
        let iymin = self.iymin.max(other.iymin);
        let iymax = self.iymax.min(other.iymax);

        if ixmax < ixmin || iymax < iymin {
            return Self::EMPTY;
        }

        Self {
            ixmin,
            ixmax,
            iymin,
            iymax,
        }
    }

    /// True when every pixel of `other` is also a pixel of `self`.
    pub fn contains(&self, other: &Self) -> bool {
        if other.is_empty() {
            return true;
        }
        self.ixmin <= other.ixmin
            && other.ixmax <= self.ixmax
            && self.iymin <= other.iymin
            && other.iymax <= self.iymax
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        !self.intersection(other).is_empty()
    }
}

impl BitOr for BoundingBox {
    type Output = BoundingBox;

    fn bitor(self, rhs: BoundingBox) -> Self::Output {
        self.union(&rhs)
    }
}

impl BitAnd for BoundingBox {
    type Output = BoundingBox;

    fn bitand(self, rhs: BoundingBox) -> Self::Output {
        self.intersection(&rhs)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundingBox(ixmin={}, ixmax={}, iymin={}, iymax={})",
            self.ixmin, self.ixmax, self.iymin, self.iymax
        )
    }
}

#[derive(Serialize, Deserialize)]
struct BoundsRepr {
    ixmin: isize,
    ixmax: isize,
    iymin: isize,
    iymax: isize,
}

impl TryFrom<BoundsRepr> for BoundingBox {
    type Error = Error;

    fn try_from(repr: BoundsRepr) -> Result<Self, Self::Error> {
        Self::new(repr.ixmin, repr.ixmax, repr.iymin, repr.iymax)
    }
}

impl From<BoundingBox> for BoundsRepr {
    fn from(bbox: BoundingBox) -> Self {
        Self {
            ixmin: bbox.ixmin,
            ixmax: bbox.ixmax,
            iymin: bbox.iymin,
            iymax: bbox.iymax,
        }
    }
}

#[cfg(test)]
mod tests {
    use pa_core::Error;

    use super::BoundingBox;

    fn bbox(ixmin: isize, ixmax: isize, iymin: isize, iymax: isize) -> BoundingBox {
        BoundingBox::new(ixmin, ixmax, iymin, iymax).expect("valid box")
    }

    #[test]
    fn new_rejects_inverted_bounds() {
        assert_eq!(
            BoundingBox::new(5, 2, 0, 1).unwrap_err(),
            Error::invalid_bound("x", 5.0, 2.0)
        );
        assert_eq!(
            BoundingBox::new(0, 1, 3, -1).unwrap_err(),
            Error::invalid_bound("y", 3.0, -1.0)
        );
        assert!(BoundingBox::new(-3, -3, 7, 7).expect("empty is valid").is_empty());
    }

    #[test]
    fn from_float_uses_pixel_center_rounding() {
        let b = BoundingBox::from_float(1.4, 3.6, -0.6, 0.2).expect("valid box");
        assert_eq!(b, bbox(1, 5, -1, 1));

        // Edges exactly on a pixel boundary stay on that boundary.
        let b = BoundingBox::from_float(-0.5, 2.5, 0.5, 0.5).expect("valid box");
        assert_eq!(b, bbox(0, 3, 1, 1));

        assert!(matches!(
            BoundingBox::from_float(4.0, 1.0, 0.0, 1.0),
            Err(Error::InvalidBound { axis: "x", .. })
        ));
        assert!(matches!(
            BoundingBox::from_float(0.0, 1.0, f64::NAN, 1.0),
            Err(Error::InvalidBound { axis: "y", .. })
        ));
    }

    #[test]
    fn shape_center_and_extent() {
        let b = bbox(2, 5, 1, 3);
        assert_eq!(b.shape(), (2, 3));
        assert_eq!(b.area(), 6);
        assert_eq!(b.center(), (1.5, 3.0));
        assert_eq!(b.extent(), (1.5, 4.5, 0.5, 2.5));

        let neg = bbox(-4, -1, -2, 0);
        assert_eq!(neg.shape(), (2, 3));
        assert_eq!(neg.center(), (-1.5, -3.0));
    }

    #[test]
    fn extreme_bounds_do_not_overflow() {
        let near_max = bbox(0, 1, isize::MAX - 1, isize::MAX);
        let (cy, cx) = near_max.center();
        assert_eq!(cx, 0.0);
        assert!((cy / isize::MAX as f64 - 1.0).abs() < 1e-12);

        let near_min = bbox(isize::MIN, isize::MIN + 1, 0, 1);
        let (cy, cx) = near_min.center();
        assert_eq!(cy, 0.0);
        assert!((cx / isize::MIN as f64 - 1.0).abs() < 1e-12);

        let huge = bbox(isize::MIN, isize::MAX, isize::MIN, isize::MAX);
        assert_eq!(huge.width(), usize::MAX);
        assert_eq!(huge.area(), usize::MAX);
        assert_eq!(bbox(0, 3, 0, 0).area(), 0);
    }

    #[test]
    fn union_contains_both_inputs() {
        let a = bbox(1, 4, 2, 5);
        let b = bbox(-2, 2, 4, 9);
        let u = a | b;

        assert_eq!(u, bbox(-2, 4, 2, 9));
        assert_eq!(u, a.union(&b));
        assert!(u.contains(&a));
        assert!(u.contains(&b));
    }

    #[test]
    fn intersection_overlapping_touching_and_disjoint() {
        let a = bbox(1, 4, 2, 5);

        assert_eq!(a & bbox(3, 8, 0, 3), bbox(3, 4, 2, 3));
        // Sharing an edge is not sharing a pixel.
        let touching = a & bbox(4, 6, 2, 5);
        assert_eq!(touching, bbox(4, 4, 2, 5));
        assert!(touching.is_empty());
        assert_eq!(a & bbox(1, 4, 5, 7), bbox(1, 4, 5, 5));
        assert_eq!(a & bbox(10, 12, 10, 12), BoundingBox::EMPTY);
        // Disjoint on y alone is enough.
        assert_eq!(a & bbox(0, 5, 6, 8), BoundingBox::EMPTY);

        assert!(a.overlaps(&bbox(3, 8, 0, 3)));
        assert!(!a.overlaps(&bbox(4, 6, 2, 5)));
    }

    #[test]
    fn intersection_is_empty_iff_no_shared_pixel_exhaustive() {
        let a = bbox(0, 3, 0, 2);
        for x0 in -4..5 {
            for x1 in x0..6 {
                for y0 in -3..4 {
                    for y1 in y0..5 {
                        let b = bbox(x0, x1, y0, y1);
                        let shares_pixel = (0..3)
                            .any(|x| (x0..x1).contains(&x))
                            && (0..2).any(|y| (y0..y1).contains(&y));
                        assert_eq!(!a.intersection(&b).is_empty(), shares_pixel, "{b}");
                        assert!(a.union(&b).contains(&a));
                        assert!(a.union(&b).contains(&b));
                    }
                }
            }
        }
    }

    #[test]
    fn display_matches_field_names() {
        assert_eq!(
            bbox(1, 2, 3, 4).to_string(),
            "BoundingBox(ixmin=1, ixmax=2, iymin=3, iymax=4)"
        );
    }

    #[test]
    fn serde_round_trip_revalidates() {
        let b = bbox(-1, 3, 0, 2);
        let json = serde_json::to_string(&b).expect("serialize");
        assert_eq!(json, r#"{"ixmin":-1,"ixmax":3,"iymin":0,"iymax":2}"#);
        let back: BoundingBox = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, b);

        let bad = r#"{"ixmin":4,"ixmax":3,"iymin":0,"iymax":2}"#;
        assert!(serde_json::from_str::<BoundingBox>(bad).is_err());
    }
}
