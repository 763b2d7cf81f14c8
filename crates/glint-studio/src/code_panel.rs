use std::collections::HashMap;

use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};

/// Monospace faces first; any face still reads better than an empty panel.
const FONT_CANDIDATES: [&str; 7] = [
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
];

pub const FONT_SIZE: f32 = 15.0;
const MARGIN: f32 = 8.0;
const TAB: &str = "    ";

/// Same as the presenter's clear color, in sRGB bytes.
const BACKGROUND: [u8; 4] = [20, 20, 23, 255];
const FOREGROUND: [u8; 3] = [214, 214, 204];

/// First system font that parses, if any.
pub fn load_system_font() -> Option<fontdue::Font> {
    FONT_CANDIDATES.iter().find_map(|path| {
        let bytes = std::fs::read(path).ok()?;
        match fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()) {
            Ok(font) => {
                log::debug!("code font: {path}");
                Some(font)
            }
            Err(err) => {
                log::debug!("skipping font {path}: {err}");
                None
            }
        }
    })
}

/// Rasterizes the editor buffer into an RGBA8 image on the CPU.
///
/// Glyph bitmaps are cached by `GlyphRasterConfig`, so recomposing after a
/// reload only rasterizes characters that were not seen before.
pub struct CodeRaster {
    font: fontdue::Font,
    size: f32,
    layout: Layout<()>,
    glyphs: HashMap<GlyphRasterConfig, (fontdue::Metrics, Vec<u8>)>,
}

impl CodeRaster {
    pub fn new(font: fontdue::Font, size: f32) -> Self {
        Self {
            font,
            size,
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            glyphs: HashMap::new(),
        }
    }

    /// `width` x `height` RGBA8 pixels with `text` drawn from the top-left
    /// margin. Text past the right or bottom edge is clipped, not wrapped.
    pub fn compose(&mut self, text: &str, width: u32, height: u32) -> Vec<u8> {
        let (width, height) = (width as usize, height as usize);
        let mut pixels = BACKGROUND.repeat(width * height);

        let text = text.replace('\t', TAB);
        self.layout.reset(&LayoutSettings {
            x: MARGIN,
            y: MARGIN,
            ..LayoutSettings::default()
        });
        self.layout
            .append(&[&self.font], &TextStyle::new(&text, self.size, 0));

        for glyph in self.layout.glyphs() {
            if !glyph.char_data.rasterize() || glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            if glyph.y >= height as f32 {
                break;
            }

            let font = &self.font;
            let (metrics, coverage) = self
                .glyphs
                .entry(glyph.key)
                .or_insert_with(|| font.rasterize_config(glyph.key));

            let left = glyph.x.round() as i64;
            let top = glyph.y.round() as i64;
            for row in 0..metrics.height {
                let y = top + row as i64;
                if y < 0 || y >= height as i64 {
                    continue;
                }
                for col in 0..metrics.width {
                    let x = left + col as i64;
                    if x < 0 || x >= width as i64 {
                        continue;
                    }
                    let alpha = coverage[row * metrics.width + col];
                    if alpha == 0 {
                        continue;
                    }
                    let at = (y as usize * width + x as usize) * 4;
                    blend(&mut pixels[at..at + 3], alpha);
                }
            }
        }

        pixels
    }
}

/// `dst` is one RGB pixel over the background.
fn blend(dst: &mut [u8], alpha: u8) {
    let a = u16::from(alpha);
    for (channel, fg) in dst.iter_mut().zip(FOREGROUND) {
        let bg = u16::from(*channel);
        *channel = ((u16::from(fg) * a + bg * (255 - a) + 127) / 255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster() -> Option<CodeRaster> {
        let font = load_system_font();
        if font.is_none() {
            eprintln!("Skipping: no system font found.");
        }
        font.map(|font| CodeRaster::new(font, FONT_SIZE))
    }

    fn inked_rows(pixels: &[u8], width: u32) -> Vec<usize> {
        pixels
            .chunks_exact(width as usize * 4)
            .enumerate()
            .filter(|(_, row)| row.chunks_exact(4).any(|px| px != BACKGROUND))
            .map(|(y, _)| y)
            .collect()
    }

    #[test]
    fn blend_endpoints() {
        let mut px = [BACKGROUND[0], BACKGROUND[1], BACKGROUND[2]];
        blend(&mut px, 0);
        assert_eq!(px, [BACKGROUND[0], BACKGROUND[1], BACKGROUND[2]]);
        blend(&mut px, 255);
        assert_eq!(px, FOREGROUND);
    }

    #[test]
    fn empty_text_is_background_only() {
        let Some(mut raster) = raster() else { return };
        let pixels = raster.compose("", 40, 30);
        assert_eq!(pixels.len(), 40 * 30 * 4);
        assert!(pixels.chunks_exact(4).all(|px| px == BACKGROUND));
    }

    #[test]
    fn text_is_drawn_inside_the_margin() {
        let Some(mut raster) = raster() else { return };
        let pixels = raster.compose("fn main", 200, 60);

        let rows = inked_rows(&pixels, 200);
        assert!(!rows.is_empty());
        assert!(rows[0] >= MARGIN as usize);
    }

    #[test]
    fn later_lines_are_drawn_lower() {
        let Some(mut raster) = raster() else { return };
        let one = inked_rows(&raster.compose("x", 100, 200), 100);
        let two = inked_rows(&raster.compose("x\n\nx", 100, 200), 100);
        assert!(two.last() > one.last());
    }

    #[test]
    fn text_below_the_panel_is_clipped() {
        let Some(mut raster) = raster() else { return };
        let text = "line\n".repeat(200);
        let pixels = raster.compose(&text, 64, 32);
        assert_eq!(pixels.len(), 64 * 32 * 4);
    }
}
