//! Unreal-style bloom: a bright-pass, a chain of blurred mips and an additive
//! recombination.

use crate::color::{self, Color};
use crate::config::BloomParams;
use crate::post_processing::{Pass, PassContext};
use crate::resource::RenderTarget;

/// Number of progressively half-resolution blur levels.
pub const MIP_LEVELS: usize = 5;

const KERNEL_RADII: [usize; MIP_LEVELS] = [3, 5, 7, 9, 11];
const BLOOM_FACTORS: [f32; MIP_LEVELS] = [1.0, 0.8, 0.6, 0.4, 0.2];
const SOFT_KNEE: f32 = 0.01;

struct BlurLevel {
    kernel: Vec<f32>,
    horizontal: RenderTarget,
    vertical: RenderTarget,
}

impl BlurLevel {
    fn new(radius: usize, width: u32, height: u32) -> BlurLevel {
        BlurLevel {
            kernel: gaussian_kernel(radius),
            horizontal: RenderTarget::new(width, height),
            vertical: RenderTarget::new(width, height),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let _ = self.horizontal.resize(width, height);
        let _ = self.vertical.resize(width, height);
    }

    /// Blurs `src` into `self.vertical`, resampling it to this level's size.
    fn blur(&mut self, src: &RenderTarget) {
        let (w, h) = self.horizontal.size();
        let (du, dv) = (1.0 / w as f32, 1.0 / h as f32);

        separable(src, &mut self.horizontal, &self.kernel, du, 0.0);
        separable(&self.horizontal, &mut self.vertical, &self.kernel, 0.0, dv);
    }
}

/// Bloom post-processing pass.
///
/// Writes `read + strength * Σ weight_i * blur_i(bright(read))`, where
/// `bright` keeps the pixels whose luminance exceeds the threshold. When its
/// parameters are disabled the pass writes black, so an additive composite
/// downstream adds nothing.
pub struct BloomPass {
    params: BloomParams,
    bright: RenderTarget,
    levels: Vec<BlurLevel>,
}

impl BloomPass {
    /// Creates a bloom pass for a `width`×`height` input.
    pub fn new(width: u32, height: u32, params: BloomParams) -> BloomPass {
        let levels = mip_sizes(width, height)
            .into_iter()
            .zip(KERNEL_RADII)
            .map(|((w, h), radius)| BlurLevel::new(radius, w, h))
            .collect();

        BloomPass {
            params: params.clamped(),
            bright: RenderTarget::new(width, height),
            levels,
        }
    }

    /// The current parameters.
    pub fn params(&self) -> &BloomParams {
        &self.params
    }

    /// Replaces the parameters, clamping them to their valid ranges.
    pub fn set_params(&mut self, params: BloomParams) {
        self.params = params.clamped();
    }

    /// Size of each blur level, largest first.
    pub fn mip_sizes(&self) -> Vec<(u32, u32)> {
        self.levels.iter().map(|l| l.vertical.size()).collect()
    }

    fn high_pass(&mut self, read: &RenderTarget) {
        let _ = self.bright.resize(read.width(), read.height());
        let threshold = self.params.threshold;

        for y in 0..read.height() {
            for x in 0..read.width() {
                let c = read.pixel(x, y);
                let alpha = smoothstep(threshold, threshold + SOFT_KNEE, color::luminance(c));
                self.bright.set_pixel(x, y, color::scale(c, alpha));
            }
        }
    }

    fn level_weight(&self, i: usize) -> f32 {
        let f = BLOOM_FACTORS[i];
        f + (1.2 - f - f) * self.params.radius
    }
}

impl Pass for BloomPass {
    fn render(&mut self, _: &PassContext, read: &RenderTarget, write: &mut RenderTarget) {
        if !self.params.enabled {
            write.clear(color::BLACK);
            return;
        }

        self.high_pass(read);

        let mut input = &self.bright;
        for level in self.levels.iter_mut() {
            level.blur(input);
            input = &level.vertical;
        }

        let weights: Vec<f32> = (0..MIP_LEVELS).map(|i| self.level_weight(i)).collect();
        let strength = self.params.strength;
        let (w, h) = write.size();

        for y in 0..h {
            for x in 0..w {
                let (u, v) = ((x as f32 + 0.5) / w as f32, (y as f32 + 0.5) / h as f32);
                let bloom = self
                    .levels
                    .iter()
                    .zip(&weights)
                    .fold(Color::new(0.0, 0.0, 0.0, 0.0), |acc, (level, weight)| {
                        color::add_scaled(acc, level.vertical.sample(u, v), *weight)
                    });

                let base = read.sample(u, v);
                let mut out = color::add_scaled(base, bloom, strength);
                out.a = 1.0;
                write.set_pixel(x, y, out);
            }
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        let _ = self.bright.resize(width, height);
        for (level, (w, h)) in self.levels.iter_mut().zip(mip_sizes(width, height)) {
            level.resize(w, h);
        }
    }
}

fn mip_sizes(width: u32, height: u32) -> Vec<(u32, u32)> {
    let mut w = (width as f32 / 2.0).round().max(1.0) as u32;
    let mut h = (height as f32 / 2.0).round().max(1.0) as u32;
    let mut sizes = Vec::with_capacity(MIP_LEVELS);

    for _ in 0..MIP_LEVELS {
        sizes.push((w, h));
        w = (w / 2).max(1);
        h = (h / 2).max(1);
    }

    sizes
}

/// One-sided normalized gaussian weights; `kernel[0]` is the center tap.
fn gaussian_kernel(radius: usize) -> Vec<f32> {
    let sigma = radius as f32;
    let mut kernel: Vec<f32> = (0..radius)
        .map(|i| {
            let x = i as f32;
            (-0.5 * x * x / (sigma * sigma)).exp() / sigma
        })
        .collect();

    let sum = kernel[0] + 2.0 * kernel[1..].iter().sum::<f32>();
    for k in kernel.iter_mut() {
        *k /= sum;
    }
    kernel
}

fn separable(src: &RenderTarget, dst: &mut RenderTarget, kernel: &[f32], du: f32, dv: f32) {
    let (w, h) = dst.size();

    for y in 0..h {
        for x in 0..w {
            let (u, v) = ((x as f32 + 0.5) / w as f32, (y as f32 + 0.5) / h as f32);
            let mut acc = color::scale(src.sample(u, v), kernel[0]);

            for (i, k) in kernel.iter().enumerate().skip(1) {
                let o = i as f32;
                acc = color::add_scaled(acc, src.sample(u + du * o, v + dv * o), *k);
                acc = color::add_scaled(acc, src.sample(u - du * o, v - dv * o), *k);
            }

            dst.set_pixel(x, y, acc);
        }
    }
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
