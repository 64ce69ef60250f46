// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use skrifa::instance::{LocationRef, Size};
use skrifa::FontRef;

use crate::style::DecorationKind;

/// Metrics for a font at a given size.
///
/// Decoration offsets are measured from the baseline to the top edge of the
/// decoration, positive upwards. Underline offsets are therefore usually negative.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct FontMetrics {
    /// Typographic ascent.
    pub ascent: f32,
    /// Typographic descent, positive below the baseline.
    pub descent: f32,
    /// Typographic leading.
    pub leading: f32,
    /// Offset of the top of underline decoration from the baseline.
    pub underline_offset: f32,
    /// Thickness of the underline decoration.
    pub underline_size: f32,
    /// Offset of the top of strikethrough decoration from the baseline.
    pub strikethrough_offset: f32,
    /// Thickness of the strikethrough decoration.
    pub strikethrough_size: f32,
    /// Offset of the top of overline decoration from the baseline.
    pub overline_offset: f32,
    /// Thickness of the overline decoration.
    pub overline_size: f32,
}

impl FontMetrics {
    /// Synthesizes metrics from proportions of the font size.
    ///
    /// Decorations use the same defaults as fonts lacking `post` and `OS/2` data:
    /// a thickness of one eighteenth of the em, the underline one thickness below
    /// the baseline and the strikethrough at half the ascent.
    pub fn from_ratios(font_size: f32, ascent_ratio: f32, descent_ratio: f32) -> Self {
        let ascent = font_size * ascent_ratio;
        let descent = font_size * descent_ratio;
        let size = font_size / 18.0;
        Self {
            ascent,
            descent,
            leading: 0.0,
            underline_offset: -size,
            underline_size: size,
            strikethrough_offset: ascent / 2.0,
            strikethrough_size: size,
            overline_offset: ascent,
            overline_size: size,
        }
    }

    /// Reads metrics from a font.
    pub fn from_font(font: &FontRef<'_>, font_size: f32) -> Self {
        let metrics =
            skrifa::metrics::Metrics::new(font, Size::new(font_size), LocationRef::default());
        let default_size = font_size / 18.0;
        let (underline_offset, underline_size) = metrics
            .underline
            .map(|underline| (underline.offset, underline.thickness))
            .unwrap_or((-default_size, default_size));
        let (strikethrough_offset, strikethrough_size) = metrics
            .strikeout
            .map(|strikeout| (strikeout.offset, strikeout.thickness))
            .unwrap_or((metrics.ascent / 2.0, default_size));
        Self {
            ascent: metrics.ascent,
            descent: -metrics.descent,
            leading: metrics.leading,
            underline_offset,
            underline_size,
            strikethrough_offset,
            strikethrough_size,
            overline_offset: metrics.ascent,
            overline_size: underline_size,
        }
    }

    /// Offset and thickness for a decoration kind.
    pub fn decoration(&self, kind: DecorationKind) -> (f32, f32) {
        match kind {
            DecorationKind::Underline => (self.underline_offset, self.underline_size),
            DecorationKind::Overline => (self.overline_offset, self.overline_size),
            DecorationKind::Strikethrough => (self.strikethrough_offset, self.strikethrough_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FontMetrics;
    use crate::style::DecorationKind;

    #[test]
    fn ratios_scale_with_size() {
        let metrics = FontMetrics::from_ratios(18.0, 0.75, 0.25);
        assert_eq!(metrics.ascent, 13.5);
        assert_eq!(metrics.descent, 4.5);
        assert_eq!(metrics.underline_size, 1.0);
        assert_eq!(metrics.decoration(DecorationKind::Underline), (-1.0, 1.0));
        assert_eq!(metrics.decoration(DecorationKind::Overline).0, metrics.ascent);
    }
}
