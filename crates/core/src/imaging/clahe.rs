//! Contrast-limited adaptive histogram equalization.
//!
//! The image is split into a grid of tiles. Each tile gets its own
//! equalization lookup table built from a clipped histogram, and every
//! pixel is mapped by bilinear interpolation between the four nearest
//! tile tables.

use image::GrayImage;
use ndarray::Array3;

use crate::shared::constants::{CLAHE_CLIP_LIMIT, CLAHE_TILE_GRID};

const BINS: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClaheParams {
    /// Histogram clip limit, relative to a uniform distribution.
    pub clip_limit: f64,
    /// Number of tiles along each axis.
    pub tile_grid: u32,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: CLAHE_CLIP_LIMIT,
            tile_grid: CLAHE_TILE_GRID,
        }
    }
}

/// Tile geometry along one axis.
#[derive(Clone, Copy, Debug)]
struct Axis {
    tiles: usize,
    tile_len: usize,
    len: usize,
}

impl Axis {
    fn new(len: u32, grid: u32) -> Self {
        let len = len as usize;
        let tiles = (grid as usize).clamp(1, len.max(1));
        let tile_len = len.div_ceil(tiles).max(1);
        // Ceil division may leave trailing tiles empty; drop them.
        let tiles = len.div_ceil(tile_len).max(1);
        Self {
            tiles,
            tile_len,
            len,
        }
    }

    fn span(&self, tile: usize) -> (usize, usize) {
        let start = tile * self.tile_len;
        (start, (start + self.tile_len).min(self.len))
    }

    /// Neighbouring tiles and the weight of the second one for `pos`.
    fn neighbours(&self, pos: usize) -> (usize, usize, f32) {
        let f = (pos as f32 + 0.5) / self.tile_len as f32 - 0.5;
        let lo = f.floor();
        let weight = f - lo;
        let lo = lo as isize;
        let last = self.tiles as isize - 1;
        let t1 = lo.clamp(0, last) as usize;
        let t2 = (lo + 1).clamp(0, last) as usize;
        (t1, t2, weight)
    }
}

/// Applies CLAHE to a grayscale image, returning a new image.
pub fn apply_clahe(image: &GrayImage, params: &ClaheParams) -> GrayImage {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return image.clone();
    }
    let ax = Axis::new(w, params.tile_grid);
    let ay = Axis::new(h, params.tile_grid);
    let luts = build_tile_luts(image, &ax, &ay, params.clip_limit);

    let mut out = GrayImage::new(w, h);
    for y in 0..h as usize {
        let (ty1, ty2, ya) = ay.neighbours(y);
        for x in 0..w as usize {
            let (tx1, tx2, xa) = ax.neighbours(x);
            let v = image.get_pixel(x as u32, y as u32).0[0] as usize;
            let top = luts[[ty1, tx1, v]] as f32 * (1.0 - xa) + luts[[ty1, tx2, v]] as f32 * xa;
            let bottom = luts[[ty2, tx1, v]] as f32 * (1.0 - xa) + luts[[ty2, tx2, v]] as f32 * xa;
            let mapped = top * (1.0 - ya) + bottom * ya;
            out.put_pixel(
                x as u32,
                y as u32,
                image::Luma([mapped.round().clamp(0.0, 255.0) as u8]),
            );
        }
    }
    out
}

/// Lookup tables indexed by `[tile_y, tile_x, intensity]`.
fn build_tile_luts(image: &GrayImage, ax: &Axis, ay: &Axis, clip_limit: f64) -> Array3<u8> {
    let mut luts = Array3::<u8>::zeros((ay.tiles, ax.tiles, BINS));
    for ty in 0..ay.tiles {
        let (y0, y1) = ay.span(ty);
        for tx in 0..ax.tiles {
            let (x0, x1) = ax.span(tx);
            let mut hist = [0u32; BINS];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[image.get_pixel(x as u32, y as u32).0[0] as usize] += 1;
                }
            }
            let area = ((x1 - x0) * (y1 - y0)) as u32;
            let lut = clipped_equalization_lut(&mut hist, area, clip_limit);
            for (i, value) in lut.iter().enumerate() {
                luts[[ty, tx, i]] = *value;
            }
        }
    }
    luts
}

/// Clips `hist` at the contrast limit, redistributes the excess evenly and
/// returns the cumulative mapping scaled to 0..=255.
fn clipped_equalization_lut(hist: &mut [u32; BINS], area: u32, clip_limit: f64) -> [u8; BINS] {
    if area == 0 {
        let mut identity = [0u8; BINS];
        for (i, item) in identity.iter_mut().enumerate() {
            *item = i as u8;
        }
        return identity;
    }

    if clip_limit > 0.0 {
        let limit = ((clip_limit * area as f64 / BINS as f64) as u32).max(1);
        let mut excess = 0u32;
        for count in hist.iter_mut() {
            if *count > limit {
                excess += *count - limit;
                *count = limit;
            }
        }

        let batch = excess / BINS as u32;
        let residual = (excess - batch * BINS as u32) as usize;
        for count in hist.iter_mut() {
            *count += batch;
        }
        if residual > 0 {
            let step = (BINS / residual).max(1);
            for i in (0..BINS).step_by(step).take(residual) {
                hist[i] += 1;
            }
        }
    }

    let scale = (BINS - 1) as f64 / area as f64;
    let mut lut = [0u8; BINS];
    let mut cumulative = 0u32;
    for (i, count) in hist.iter().enumerate() {
        cumulative += count;
        lut[i] = (cumulative as f64 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}
