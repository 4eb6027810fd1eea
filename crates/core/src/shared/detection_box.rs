/// An axis-aligned box in the pixel space of the image it was detected in.
///
/// Width and height are positive for anything a detector returns; boxes
/// derived by clamping may become empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DetectionBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DetectionBox {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Maps a box found on an image downscaled by `scale` back to the
    /// original image. Each coordinate is rounded to the nearest pixel.
    pub fn unscale(&self, scale: f64) -> Self {
        if scale == 1.0 || scale <= 0.0 {
            return *self;
        }
        let map = |v: i32| (v as f64 / scale).round() as i32;
        Self {
            x: map(self.x),
            y: map(self.y),
            width: map(self.width),
            height: map(self.height),
        }
    }

    /// Shifts a box detected inside a sub-region into the parent's space.
    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Intersection with the `[0, width) x [0, height)` image rectangle.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let x1 = self.x.clamp(0, width as i32);
        let y1 = self.y.clamp(0, height as i32);
        let x2 = self.right().clamp(0, width as i32);
        let y2 = self.bottom().clamp(0, height as i32);
        Self {
            x: x1,
            y: y1,
            width: (x2 - x1).max(0),
            height: (y2 - y1).max(0),
        }
    }
}
