use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::slice;

/// Interleaved multi-channel buffer laid out row-major as
/// `(height, width, channels)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer3<T> {
    pixels: Vec<T>,
    width: usize,
    height: usize,
    channels: usize,
}

impl<T> Buffer3<T> {
    pub fn new(width: usize, height: usize, channels: usize, pixels: Vec<T>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height * channels,
            "pixels length must equal width * height * channels"
        );
        Self {
            pixels,
            width,
            height,
            channels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(height, width, channels)`
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, self.channels)
    }

    /// Number of samples in one row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width * self.channels
    }

    /// Offset of the first sample of pixel `(x, y)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.channels
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[T] {
        debug_assert!(x < self.width && y < self.height);
        let start = self.index(x, y);
        &self.pixels[start..start + self.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [T] {
        debug_assert!(x < self.width && y < self.height);
        let start = self.index(x, y);
        let channels = self.channels;
        &mut self.pixels[start..start + channels]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        let row_len = self.row_len();
        &self.pixels[y * row_len..(y + 1) * row_len]
    }

    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.pixels
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.pixels.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.pixels.iter_mut()
    }

    /// Applies `f` to every sample, keeping the shape.
    pub fn map<U, F>(&self, f: F) -> Buffer3<U>
    where
        F: FnMut(&T) -> U,
    {
        Buffer3 {
            pixels: self.pixels.iter().map(f).collect(),
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }
}

impl<T: Copy> Buffer3<T> {
    /// Copies the `width x height` region starting at `(x, y)` into a new buffer.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> Buffer3<T> {
        assert!(
            x + width <= self.width && y + height <= self.height,
            "crop region {}x{} at ({}, {}) exceeds buffer {}x{}",
            width,
            height,
            x,
            y,
            self.width,
            self.height
        );

        let span = width * self.channels;
        let mut pixels = Vec::with_capacity(span * height);
        for row in y..y + height {
            let start = self.index(x, row);
            pixels.extend_from_slice(&self.pixels[start..start + span]);
        }

        Buffer3::new(width, height, self.channels, pixels)
    }

    /// Copies the `width x height` region of `src` at `(src_x, src_y)` into
    /// this buffer at `(dst_x, dst_y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn copy_region_from(
        &mut self,
        src: &Buffer3<T>,
        src_x: usize,
        src_y: usize,
        width: usize,
        height: usize,
        dst_x: usize,
        dst_y: usize,
    ) {
        assert_eq!(self.channels, src.channels, "channel count mismatch");
        assert!(
            src_x + width <= src.width && src_y + height <= src.height,
            "source region exceeds source buffer"
        );
        assert!(
            dst_x + width <= self.width && dst_y + height <= self.height,
            "destination region exceeds destination buffer"
        );

        let span = width * self.channels;
        for row in 0..height {
            let src_start = src.index(src_x, src_y + row);
            let dst_start = self.index(dst_x, dst_y + row);
            self.pixels[dst_start..dst_start + span]
                .copy_from_slice(&src.pixels[src_start..src_start + span]);
        }
    }
}

impl<T: Default + Clone> Buffer3<T> {
    pub fn new_default(width: usize, height: usize, channels: usize) -> Self {
        Self {
            pixels: vec![T::default(); width * height * channels],
            width,
            height,
            channels,
        }
    }
}

impl<T: Clone> Buffer3<T> {
    pub fn new_filled(width: usize, height: usize, channels: usize, value: T) -> Self {
        Self {
            pixels: vec![value; width * height * channels],
            width,
            height,
            channels,
        }
    }

    #[inline]
    pub fn fill(&mut self, value: T) {
        self.pixels.fill(value);
    }
}

/// `(x, y, channel)`
impl<T> Index<(usize, usize, usize)> for Buffer3<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y, c): (usize, usize, usize)) -> &Self::Output {
        &self.pixels[(y * self.width + x) * self.channels + c]
    }
}

impl<T> IndexMut<(usize, usize, usize)> for Buffer3<T> {
    #[inline]
    fn index_mut(&mut self, (x, y, c): (usize, usize, usize)) -> &mut Self::Output {
        &mut self.pixels[(y * self.width + x) * self.channels + c]
    }
}

impl<T> Deref for Buffer3<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.pixels
    }
}

impl<T> DerefMut for Buffer3<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pixels
    }
}

impl<T> AsRef<[T]> for Buffer3<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.pixels
    }
}

impl<'a, T> IntoIterator for &'a Buffer3<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.pixels.iter()
    }
}

impl<T> From<Buffer3<T>> for Vec<T> {
    #[inline]
    fn from(buffer: Buffer3<T>) -> Self {
        buffer.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3x2, 2 channels: sample value = y * 100 + x * 10 + c
    fn sample_buffer() -> Buffer3<u16> {
        let mut pixels = Vec::new();
        for y in 0..2u16 {
            for x in 0..3u16 {
                for c in 0..2u16 {
                    pixels.push(y * 100 + x * 10 + c);
                }
            }
        }
        Buffer3::new(3, 2, 2, pixels)
    }

    #[test]
    fn test_new_stores_dimensions() {
        let buf = sample_buffer();
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.channels(), 2);
        assert_eq!(buf.shape(), (2, 3, 2));
        assert_eq!(buf.len(), 12);
        assert_eq!(buf.row_len(), 6);
    }

    #[test]
    #[should_panic(expected = "pixels length must equal width * height * channels")]
    fn test_new_panics_on_size_mismatch() {
        Buffer3::new(3, 2, 3, vec![0u8; 6]);
    }

    #[test]
    fn test_index_tuple() {
        let buf = sample_buffer();
        assert_eq!(buf[(0, 0, 0)], 0);
        assert_eq!(buf[(2, 0, 1)], 21);
        assert_eq!(buf[(1, 1, 0)], 110);
        assert_eq!(buf.pixel(2, 1), &[120, 121]);
    }

    #[test]
    fn test_pixel_mut() {
        let mut buf = Buffer3::<u8>::new_default(2, 2, 3);
        buf.pixel_mut(1, 1).copy_from_slice(&[1, 2, 3]);
        assert_eq!(buf[(1, 1, 2)], 3);
        assert_eq!(buf.pixel(0, 1), &[0, 0, 0]);
    }

    #[test]
    fn test_crop() {
        let buf = sample_buffer();
        let crop = buf.crop(1, 0, 2, 2);
        assert_eq!(crop.shape(), (2, 2, 2));
        assert_eq!(crop.row(0), &[10, 11, 20, 21]);
        assert_eq!(crop.row(1), &[110, 111, 120, 121]);
    }

    #[test]
    #[should_panic(expected = "exceeds buffer")]
    fn test_crop_out_of_bounds() {
        sample_buffer().crop(2, 0, 2, 1);
    }

    #[test]
    fn test_copy_region_from() {
        let src = sample_buffer();
        let mut dst = Buffer3::new_filled(4, 3, 2, 9u16);
        dst.copy_region_from(&src, 1, 1, 2, 1, 2, 2);

        assert_eq!(dst.pixel(2, 2), &[110, 111]);
        assert_eq!(dst.pixel(3, 2), &[120, 121]);
        assert_eq!(dst.pixel(1, 2), &[9, 9]);
        assert!(dst.row(0).iter().all(|&v| v == 9));
    }

    #[test]
    #[should_panic(expected = "channel count mismatch")]
    fn test_copy_region_channel_mismatch() {
        let src = Buffer3::<u8>::new_default(2, 2, 3);
        let mut dst = Buffer3::<u8>::new_default(2, 2, 4);
        dst.copy_region_from(&src, 0, 0, 2, 2, 0, 0);
    }

    #[test]
    fn test_map_keeps_shape() {
        let buf = Buffer3::new(1, 2, 1, vec![0u8, 255]);
        let mapped = buf.map(|&v| v as f32 / 255.0);
        assert_eq!(mapped.shape(), buf.shape());
        assert_eq!(mapped.pixels(), &[0.0, 1.0]);
    }
}
