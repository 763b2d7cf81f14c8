/// Axis-aligned rectangle in physical pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Editor panel on the left, output panel on the right.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Panels {
    pub editor: PixelRect,
    pub output: PixelRect,
}

/// Split-panel layout of the studio window.
#[derive(Debug, Copy, Clone)]
pub struct Layout {
    /// Fraction of the window width given to the output panel.
    pub split_ratio: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self { split_ratio: 0.5 }
    }
}

impl Layout {
    /// Width of the output panel for a window `surface_width` pixels wide.
    pub fn output_width(&self, surface_width: u32) -> u32 {
        (surface_width as f32 * self.split_ratio).floor() as u32
    }

    pub fn panels(&self, (width, height): (u32, u32)) -> Panels {
        let output_width = self.output_width(width).min(width);
        let editor_width = width - output_width;

        Panels {
            editor: PixelRect::new(0, 0, editor_width, height),
            output: PixelRect::new(editor_width, 0, output_width, height),
        }
    }
}

/// Where the viewport image goes inside `panel`.
///
/// The image spans the panel width with height `width * inverse_ratio`,
/// scaled down to fit when the panel is too short. Top-aligned. `None` when
/// nothing would be visible.
pub fn image_rect(panel: PixelRect, inverse_ratio: f32) -> Option<PixelRect> {
    if panel.is_empty() || !(inverse_ratio > 0.0) {
        return None;
    }

    let mut width = panel.width;
    let mut height = (width as f32 * inverse_ratio).floor() as u32;
    if height > panel.height {
        height = panel.height;
        width = ((height as f32 / inverse_ratio).floor() as u32).min(panel.width);
    }

    let rect = PixelRect::new(panel.x + (panel.width - width) / 2, panel.y, width, height);
    (!rect.is_empty()).then_some(rect)
}
