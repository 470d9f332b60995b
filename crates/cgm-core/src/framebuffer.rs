//! Heap framebuffer with per-pixel change detection.
//!
//! Charts can be drawn into this RAM buffer instead of straight onto a
//! display. After drawing completes, only the rectangular region containing
//! changed pixels is flushed to the real target in a single call.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    /// Expand the dirty region to include the given pixel coordinate.
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Create a new dirty rect covering a single pixel.
    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn to_rectangle(self) -> Rectangle {
        Rectangle::new(
            Point::new(self.min_x as i32, self.min_y as i32),
            Size::new(
                (self.max_x - self.min_x + 1) as u32,
                (self.max_y - self.min_y + 1) as u32,
            ),
        )
    }
}

/// Framebuffer implementing `DrawTarget<Color = Rgb888>`.
///
/// Holds `width * height` pixels row-major and tracks a dirty bounding box
/// so that only changed pixels are flushed. Pixels outside the buffer are
/// silently dropped.
pub struct FrameBuffer {
    size: Size,
    pixels: Vec<Rgb888>,
    dirty: Option<DirtyRect>,
}

impl FrameBuffer {
    /// Allocate a new framebuffer filled with black pixels.
    pub fn new(size: Size) -> Self {
        let count = size.width as usize * size.height as usize;
        Self {
            size,
            pixels: vec![Rgb888::BLACK; count],
            dirty: None,
        }
    }

    /// Read a pixel, `None` outside the buffer.
    pub fn pixel(&self, point: Point) -> Option<Rgb888> {
        let index = self.index_of(point.x, point.y)?;
        self.pixels.get(index).copied()
    }

    /// Number of pixels currently holding `color`.
    pub fn count_color(&self, color: Rgb888) -> usize {
        self.pixels.iter().filter(|&&pixel| pixel == color).count()
    }

    /// Region changed since the last flush, if any.
    pub fn dirty_area(&self) -> Option<Rectangle> {
        self.dirty.map(DirtyRect::to_rectangle)
    }

    /// Row-major pixel data.
    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let w = self.size.width as usize;
        let h = self.size.height as usize;
        if x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h {
            Some(y as usize * w + x as usize)
        } else {
            None
        }
    }

    /// Write a single pixel, expanding the dirty rect only if the color changed.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb888) {
        let idx = y * self.size.width as usize + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Flush the dirty region to another target, then reset the dirty state.
    ///
    /// Only the bounding rectangle of changed pixels is sent via
    /// `fill_contiguous`. If nothing changed, this is a no-op.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let area = rect.to_rectangle();
        let width = area.size.width as usize;

        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            area.size.width, area.size.height, rect.min_x, rect.min_y
        );

        let pixels = &self.pixels;
        let stride = self.size.width as usize;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * stride + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if self.index_of(coord.x, coord.y).is_some() {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let clipped = area.intersection(&self.bounding_box());
        let Some(bottom_right) = clipped.bottom_right() else {
            return Ok(());
        };

        for y in clipped.top_left.y..=bottom_right.y {
            for x in clipped.top_left.x..=bottom_right.x {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let w = self.size.width as usize;
        let h = self.size.height as usize;

        for y in 0..h {
            for x in 0..w {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;
    use embedded_graphics::primitives::PrimitiveStyle;

    #[test]
    fn test_new_is_clean_and_black() {
        let fb = FrameBuffer::new(Size::new(8, 4));
        assert_eq!(fb.dirty_area(), None);
        assert_eq!(fb.count_color(Rgb888::BLACK), 32);
        assert_eq!(fb.pixel(Point::new(8, 0)), None);
    }

    #[test]
    fn test_dirty_tracks_changed_pixels_only() {
        let mut fb = FrameBuffer::new(Size::new(10, 10));

        Rectangle::new(Point::new(2, 3), Size::new(2, 2))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::RED))
            .draw(&mut fb)
            .unwrap();
        // Same color as the background: no change
        Pixel(Point::new(9, 9), Rgb888::BLACK).draw(&mut fb).unwrap();

        assert_eq!(
            fb.dirty_area(),
            Some(Rectangle::new(Point::new(2, 3), Size::new(2, 2)))
        );
        assert_eq!(fb.count_color(Rgb888::RED), 4);
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut fb = FrameBuffer::new(Size::new(4, 4));

        Rectangle::new(Point::new(-2, -2), Size::new(4, 4))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::GREEN))
            .draw(&mut fb)
            .unwrap();
        Pixel(Point::new(100, 1), Rgb888::GREEN).draw(&mut fb).unwrap();

        assert_eq!(fb.count_color(Rgb888::GREEN), 4);
    }

    #[test]
    fn test_flush_copies_dirty_region() {
        let mut fb = FrameBuffer::new(Size::new(8, 8));
        Pixel(Point::new(1, 1), Rgb888::WHITE).draw(&mut fb).unwrap();
        Pixel(Point::new(2, 2), Rgb888::WHITE).draw(&mut fb).unwrap();

        let mut display: MockDisplay<Rgb888> = MockDisplay::new();
        fb.flush(&mut display).unwrap();

        assert_eq!(display.get_pixel(Point::new(1, 1)), Some(Rgb888::WHITE));
        assert_eq!(display.get_pixel(Point::new(2, 1)), Some(Rgb888::BLACK));
        assert_eq!(display.get_pixel(Point::new(2, 2)), Some(Rgb888::WHITE));
        assert_eq!(display.get_pixel(Point::new(0, 0)), None);
        assert_eq!(fb.dirty_area(), None);

        // Nothing changed since: flushing again is a no-op
        let mut untouched: MockDisplay<Rgb888> = MockDisplay::new();
        fb.flush(&mut untouched).unwrap();
        assert_eq!(untouched.get_pixel(Point::new(1, 1)), None);
    }
}
