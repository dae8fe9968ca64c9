use font8x8::{BASIC_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};

use crate::domain::{BoundingBox, Mask};

/// Neon cyan used for the blend, the box and the label.
pub const HIGHLIGHT: Rgb<u8> = Rgb([0, 243, 255]);
pub const BLEND_ALPHA: f32 = 0.4;
pub const BOX_THICKNESS: u32 = 2;
pub const LABEL_SCALE: u32 = 2;
/// Gap between the label baseline and the top edge of the box.
pub const LABEL_OFFSET: i64 = 10;

const GLYPH_SIZE: i64 = 8;

/// Draws the "detected target" treatment onto a frame.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    highlight: Rgb<u8>,
    alpha: f32,
    box_thickness: u32,
    label_scale: u32,
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            highlight: HIGHLIGHT,
            alpha: BLEND_ALPHA,
            box_thickness: BOX_THICKNESS,
            label_scale: LABEL_SCALE,
        }
    }
}

impl Compositor {
    pub fn new(highlight: Rgb<u8>, alpha: f32) -> Self {
        Self {
            highlight,
            alpha: alpha.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    /// Blends the highlight over the masked pixels, outlines the mask's
    /// bounding box and writes `label` above it. Returns the bounding box, or
    /// `None` for an empty mask, in which case the frame is left untouched.
    pub fn composite(&self, frame: &mut RgbImage, mask: &Mask, label: &str) -> Option<BoundingBox> {
        let bbox = mask.bounding_box()?;
        self.blend(frame, mask);
        self.draw_box(frame, &bbox);
        self.draw_label(frame, label, i64::from(bbox.x), i64::from(bbox.y) - LABEL_OFFSET);
        Some(bbox)
    }

    pub fn blend(&self, frame: &mut RgbImage, mask: &Mask) {
        let keep = 1.0 - self.alpha;
        for (x, y, pixel) in frame.enumerate_pixels_mut() {
            if !mask.contains(x, y) {
                continue;
            }
            for (channel, highlight) in pixel.0.iter_mut().zip(self.highlight.0) {
                let mixed = f32::from(*channel) * keep + f32::from(highlight) * self.alpha;
                *channel = mixed.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    /// Outline from `(x, y)` to `(x + width, y + height)`, thickened inwards.
    pub fn draw_box(&self, frame: &mut RgbImage, bbox: &BoundingBox) {
        let x0 = i64::from(bbox.x);
        let y0 = i64::from(bbox.y);
        let x1 = x0 + i64::from(bbox.width);
        let y1 = y0 + i64::from(bbox.height);

        for t in 0..i64::from(self.box_thickness) {
            let (left, top, right, bottom) = (x0 + t, y0 + t, x1 - t, y1 - t);
            if left > right || top > bottom {
                break;
            }
            for x in left..=right {
                self.put(frame, x, top);
                self.put(frame, x, bottom);
            }
            for y in top..=bottom {
                self.put(frame, left, y);
                self.put(frame, right, y);
            }
        }
    }

    /// Renders `text` with its baseline at `baseline`, clipping whatever
    /// falls outside the frame. Characters without a glyph are skipped.
    pub fn draw_label(&self, frame: &mut RgbImage, text: &str, left: i64, baseline: i64) {
        let scale = i64::from(self.label_scale);
        let top = baseline - GLYPH_SIZE * scale;

        for (i, c) in text.chars().enumerate() {
            let Some(glyph) = BASIC_FONTS.get(c) else {
                continue;
            };
            let origin_x = left + i as i64 * GLYPH_SIZE * scale;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_SIZE as u32 {
                    if *bits & (1u8 << col) == 0 {
                        continue;
                    }
                    let px = origin_x + i64::from(col) * scale;
                    let py = top + row as i64 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            self.put(frame, px + dx, py + dy);
                        }
                    }
                }
            }
        }
    }

    fn put(&self, frame: &mut RgbImage, x: i64, y: i64) {
        if x < 0 || y < 0 || x >= i64::from(frame.width()) || y >= i64::from(frame.height()) {
            return;
        }
        frame.put_pixel(x as u32, y as u32, self.highlight);
    }
}

pub fn target_label(prompt: &str) -> String {
    format!("TARGET: {}", prompt.to_uppercase())
}
