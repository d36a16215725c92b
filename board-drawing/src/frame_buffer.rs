use embedded_graphics::{
    pixelcolor::{Rgb888, RgbColor},
    prelude::*,
};
use skip_error::SkipError;

/// A heap backed display of any size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    size: Size,
    pixels: Vec<Rgb888>,
}

impl FrameBuffer {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![Rgb888::BLACK; size.width as usize * size.height as usize],
        }
    }

    fn index(&self, point: Point) -> Option<usize> {
        let x: u32 = point.x.try_into().ok()?;
        let y: u32 = point.y.try_into().ok()?;
        if (x < self.size.width) & (y < self.size.height) {
            Some(y as usize * self.size.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn pixel(&self, point: Point) -> Option<Rgb888> {
        self.index(point).map(|i| self.pixels[i])
    }

    /// Every pixel with its position, row by row
    pub fn pixels(&self) -> impl Iterator<Item = (Point, Rgb888)> + '_ {
        let width = self.size.width as i32;
        self.pixels
            .iter()
            .enumerate()
            .map(move |(i, color)| (Point::new(i as i32 % width, i as i32 / width), *color))
    }

    /// Row-major RGBA bytes, fully opaque
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| [c.r(), c.g(), c.b(), u8::MAX])
            .collect()
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for (x, y, color) in pixels
            .into_iter()
            .map(
                |Pixel(coord, color)| -> Result<(u32, u32, Self::Color), core::num::TryFromIntError> {
                    let x: u32 = coord.x.try_into()?;
                    let y: u32 = coord.y.try_into()?;
                    Ok((x, y, color))
                },
            )
            .skip_error()
        {
            // Check if the pixel coordinates are not out of bounds
            if (x < self.size.width) & (y < self.size.height) {
                let i = y as usize * self.size.width as usize + x as usize;
                self.pixels[i] = color;
            }
        }

        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        self.size
    }
}
