use serde::Serialize;

/// Axis-aligned box with inclusive pixel extent, as produced by a contour
/// bounding rect: a single pixel has width and height 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Per-pixel binary region over a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }

    /// Filled disc of `radius` around `center`, clipped to the frame.
    /// The center may lie outside the frame.
    pub fn filled_circle(width: u32, height: u32, center: (i64, i64), radius: u32) -> Self {
        let mut mask = Self::empty(width, height);
        let (cx, cy) = center;
        let r = i64::from(radius);
        let r_sq = r * r;

        let y_start = (cy - r).max(0);
        let y_end = (cy + r).min(i64::from(height) - 1);
        let x_start = (cx - r).max(0);
        let x_end = (cx + r).min(i64::from(width) - 1);

        for y in y_start..=y_end {
            let dy = y - cy;
            for x in x_start..=x_end {
                let dx = x - cx;
                if dx * dx + dy * dy <= r_sq {
                    mask.set(x as u32, y as u32);
                }
            }
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[self.index(x, y)]
    }

    pub fn area(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|b| *b)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        let mut found = false;

        for y in 0..self.height {
            for x in 0..self.width {
                if self.bits[self.index(x, y)] {
                    found = true;
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }

        found.then(|| BoundingBox {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        })
    }

    fn set(&mut self, x: u32, y: u32) {
        let idx = self.index(x, y);
        self.bits[idx] = true;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
