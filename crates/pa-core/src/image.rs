use crate::Error;

/// Dense row-major grid owning its pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(height, width)`, i.e. `(ny, nx)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get_mut(y * self.width + x)
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            stride: self.width,
            data: &self.data,
        }
    }

    pub fn as_view_mut(&mut self) -> ImageViewMut<'_, T> {
        ImageViewMut {
            width: self.width,
            height: self.height,
            stride: self.width,
            data: &mut self.data,
        }
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Image<U> {
        Image {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl<T: Clone> Image<T> {
    /// Allocates a `width x height` image with every pixel set to `value`.
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn new_fill(width: usize, height: usize, value: T) -> Self {
        let len = width.checked_mul(height).expect("image size overflow");
        Self {
            width,
            height,
            data: vec![value; len],
        }
    }
}

#[derive(Debug)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a [T],
}

impl<T> Clone for ImageView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ImageView<'_, T> {}

impl<'a, T> ImageView<'a, T> {
    pub fn from_slice(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a [T],
    ) -> Result<Self, Error> {
        check_layout(width, height, stride, data.len())?;
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x)
    }

    /// Borrows the `width x height` block whose top-left pixel is `(x, y)`.
    pub fn subview(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<ImageView<'a, T>, Error> {
        let start = subview_start(self.shape(), self.stride, x, y, width, height)?;
        let tail = self.data.get(start..).ok_or(Error::OutOfBounds)?;
        if tail.len() < min_required_len(width, height, self.stride).ok_or(Error::OutOfBounds)? {
            return Err(Error::OutOfBounds);
        }

        Ok(ImageView {
            width,
            height,
            stride: self.stride,
            data: tail,
        })
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == self.width
    }

    pub fn as_contiguous_slice(&self) -> Option<&'a [T]> {
        if !self.is_contiguous() {
            return None;
        }
        self.data.get(0..self.width * self.height)
    }
}

impl<T: Clone> ImageView<'_, T> {
    /// Copies the viewed pixels into a new contiguous image.
    pub fn to_image(&self) -> Image<T> {
        let data = match self.as_contiguous_slice() {
            Some(contig) => contig.to_vec(),
            None => {
                let mut out = Vec::with_capacity(self.width * self.height);
                for row in self.rows() {
                    out.extend_from_slice(row);
                }
                out
            }
        };

        Image {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

#[derive(Debug)]
pub struct ImageViewMut<'a, T> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a mut [T],
}

impl<'a, T> ImageViewMut<'a, T> {
    /// Writable view over a caller-owned, possibly padded, row-major buffer.
    pub fn from_slice_mut(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a mut [T],
    ) -> Result<Self, Error> {
        check_layout(width, height, stride, data.len())?;
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &mut self.data[start..start + self.width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x)
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get_mut(y * self.stride + x)
    }

    pub fn subview(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<ImageView<'_, T>, Error> {
        self.as_view().subview(x, y, width, height)
    }

    pub fn subview_mut(
        &mut self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<ImageViewMut<'_, T>, Error> {
        self.reborrow().into_subview_mut(x, y, width, height)
    }

    /// Like [`ImageViewMut::subview_mut`], but keeps the parent's lifetime by
    /// consuming the parent view.
    pub fn into_subview_mut(
        self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<ImageViewMut<'a, T>, Error> {
        let start = subview_start(self.shape(), self.stride, x, y, width, height)?;
        let min_len = min_required_len(width, height, self.stride).ok_or(Error::OutOfBounds)?;

        let stride = self.stride;
        let data = self.data;
        let tail = data.get_mut(start..).ok_or(Error::OutOfBounds)?;
        if tail.len() < min_len {
            return Err(Error::OutOfBounds);
        }

        Ok(ImageViewMut {
            width,
            height,
            stride,
            data: tail,
        })
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            stride: self.stride,
            data: self.data,
        }
    }

    pub fn reborrow(&mut self) -> ImageViewMut<'_, T> {
        ImageViewMut {
            width: self.width,
            height: self.height,
            stride: self.stride,
            data: &mut *self.data,
        }
    }
}

impl<T: Clone> ImageViewMut<'_, T> {
    /// Overwrites every pixel of this view with the matching pixel of `src`.
    pub fn copy_from(&mut self, src: &ImageView<'_, T>) -> Result<(), Error> {
        if src.shape() != self.shape() {
            return Err(Error::shape_mismatch(self.shape(), src.shape()));
        }

        for y in 0..self.height {
            self.row_mut(y).clone_from_slice(src.row(y));
        }
        Ok(())
    }

    pub fn fill(&mut self, value: T) {
        for y in 0..self.height {
            self.row_mut(y).fill(value.clone());
        }
    }
}

fn check_layout(width: usize, height: usize, stride: usize, len: usize) -> Result<(), Error> {
    if stride < width {
        return Err(Error::InvalidStride);
    }

    let min_len = stride.checked_mul(height).ok_or(Error::SizeMismatch {
        expected: usize::MAX,
        actual: len,
    })?;

    if len < min_len {
        return Err(Error::SizeMismatch {
            expected: min_len,
            actual: len,
        });
    }
    Ok(())
}

fn subview_start(
    (parent_h, parent_w): (usize, usize),
    stride: usize,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> Result<usize, Error> {
    if x > parent_w || y > parent_h || width > (parent_w - x) || height > (parent_h - y) {
        return Err(Error::OutOfBounds);
    }

    y.checked_mul(stride)
        .and_then(|v| v.checked_add(x))
        .ok_or(Error::OutOfBounds)
}

fn min_required_len(width: usize, height: usize, stride: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }

    let rows_before_last = height.checked_sub(1)?;
    let base = rows_before_last.checked_mul(stride)?;
    base.checked_add(width)
}
