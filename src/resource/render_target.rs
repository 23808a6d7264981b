//! Off-screen HDR buffers the renderer and post-processing passes draw into.

use crate::color::{self, Color};
use image::{Rgba32FImage, RgbaImage};

/// An HDR color buffer with an attached depth buffer.
///
/// Colors are linear and unclamped. The depth buffer stores normalized
/// device depth in `[-1, 1]`, cleared to `+inf`.
#[derive(Clone, Debug)]
pub struct RenderTarget {
    color: Rgba32FImage,
    depth: Vec<f32>,
}

impl RenderTarget {
    /// Creates a render target. Dimensions are raised to at least 1×1.
    pub fn new(width: u32, height: u32) -> RenderTarget {
        let width = width.max(1);
        let height = height.max(1);

        RenderTarget {
            color: Rgba32FImage::new(width, height),
            depth: vec![f32::INFINITY; (width * height) as usize],
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.color.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.color.height()
    }

    /// `(width, height)` in pixels.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.color.dimensions()
    }

    /// Resizes this render target, discarding its content.
    ///
    /// Returns `false` without touching the buffers when the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let width = width.max(1);
        let height = height.max(1);

        if self.size() == (width, height) {
            return false;
        }

        *self = RenderTarget::new(width, height);
        true
    }

    /// Fills the color buffer with `c` and resets the depth buffer.
    pub fn clear(&mut self, c: Color) {
        let px = image::Rgba([c.r, c.g, c.b, c.a]);
        for p in self.color.pixels_mut() {
            *p = px;
        }
        self.clear_depth();
    }

    /// Resets the depth buffer only.
    pub fn clear_depth(&mut self) {
        self.depth.fill(f32::INFINITY);
    }

    /// Reads one pixel.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let p = self.color.get_pixel(x, y).0;
        Color::new(p[0], p[1], p[2], p[3])
    }

    /// Writes one pixel.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, c: Color) {
        self.color.put_pixel(x, y, image::Rgba([c.r, c.g, c.b, c.a]));
    }

    /// Reads the depth at one pixel.
    #[inline]
    pub fn depth(&self, x: u32, y: u32) -> f32 {
        self.depth[(y * self.width() + x) as usize]
    }

    /// Writes `depth` at one pixel if it is closer than the stored depth.
    /// Returns whether the write happened.
    #[inline]
    pub fn test_and_set_depth(&mut self, x: u32, y: u32, depth: f32) -> bool {
        let i = (y * self.width() + x) as usize;
        if depth < self.depth[i] {
            self.depth[i] = depth;
            true
        } else {
            false
        }
    }

    /// Bilinear sample at normalized coordinates (`u` rightward, `v` downward),
    /// clamped to the edges.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let (w, h) = self.size();
        let x = (u * w as f32 - 0.5).clamp(0.0, (w - 1) as f32);
        let y = (v * h as f32 - 0.5).clamp(0.0, (h - 1) as f32);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(w - 1);
        let y1 = (y0 + 1).min(h - 1);
        let tx = x - x0 as f32;
        let ty = y - y0 as f32;

        let lerp = |a: Color, b: Color, t: f32| {
            Color::new(
                a.r + (b.r - a.r) * t,
                a.g + (b.g - a.g) * t,
                a.b + (b.b - a.b) * t,
                a.a + (b.a - a.a) * t,
            )
        };

        let top = lerp(self.pixel(x0, y0), self.pixel(x1, y0), tx);
        let bottom = lerp(self.pixel(x0, y1), self.pixel(x1, y1), tx);
        lerp(top, bottom, ty)
    }

    /// Copies the color content of `other`, resampling if the sizes differ.
    pub fn copy_from(&mut self, other: &RenderTarget) {
        if self.size() == other.size() {
            self.color.copy_from_slice(other.color.as_raw());
            return;
        }

        let (w, h) = self.size();
        for y in 0..h {
            for x in 0..w {
                let u = (x as f32 + 0.5) / w as f32;
                let v = (y as f32 + 0.5) / h as f32;
                self.set_pixel(x, y, other.sample(u, v));
            }
        }
    }

    /// The raw HDR color buffer.
    #[inline]
    pub fn color_image(&self) -> &Rgba32FImage {
        &self.color
    }

    /// Mutable access to the raw HDR color buffer.
    #[inline]
    pub fn color_image_mut(&mut self) -> &mut Rgba32FImage {
        &mut self.color
    }

    /// Converts to a displayable 8-bit sRGB image, clamping HDR values.
    pub fn to_rgba8(&self) -> RgbaImage {
        let (w, h) = self.size();
        RgbaImage::from_fn(w, h, |x, y| {
            let c = self.pixel(x, y);
            image::Rgba([
                color::linear_to_srgb8(c.r),
                color::linear_to_srgb8(c.g),
                color::linear_to_srgb8(c.b),
                (c.a.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
            ])
        })
    }
}
