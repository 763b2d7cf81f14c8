use std::fmt;

/// Closed set of aspect ratios (width:height) offered for the output.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum AspectPreset {
    Square,
    Wide2x1,
    Classic3x2,
    #[default]
    Widescreen16x9,
}

impl AspectPreset {
    pub const ALL: [AspectPreset; 4] = [
        AspectPreset::Square,
        AspectPreset::Wide2x1,
        AspectPreset::Classic3x2,
        AspectPreset::Widescreen16x9,
    ];

    /// Height divided by width.
    #[inline]
    pub const fn inverse_value(self) -> f32 {
        match self {
            AspectPreset::Square => inverse::SQUARE,
            AspectPreset::Wide2x1 => inverse::WIDE_2_1,
            AspectPreset::Classic3x2 => inverse::CLASSIC_3_2,
            AspectPreset::Widescreen16x9 => inverse::WIDESCREEN_16_9,
        }
    }

    /// Height for `width` under this ratio, floored.
    #[inline]
    pub fn derive_height(self, width: u32) -> u32 {
        (width as f32 * self.inverse_value()).floor() as u32
    }
}

impl fmt::Display for AspectPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AspectPreset::Square => "1:1",
            AspectPreset::Wide2x1 => "2:1",
            AspectPreset::Classic3x2 => "3:2",
            AspectPreset::Widescreen16x9 => "16:9",
        };
        f.write_str(s)
    }
}

mod inverse {
    pub const SQUARE: f32 = 1.0 / 1.0;
    pub const WIDE_2_1: f32 = 1.0 / 2.0;
    pub const CLASSIC_3_2: f32 = 2.0 / 3.0;
    pub const WIDESCREEN_16_9: f32 = 9.0 / 16.0;
}
