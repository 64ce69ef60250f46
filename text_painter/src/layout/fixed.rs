// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::Range;

use peniko::kurbo::{Point, Rect, Shape};

use super::{is_default_ignorable, FontMetrics, GlyphLayout, GlyphLayoutBuilder, GlyphSource, Pen};
use crate::node::RenderContext;
use crate::run::AttributedRun;
use crate::style::{Brush, TextAttributes};

/// Glyph ids at and above this value identify ligatures.
const LIGATURE_GLYPH_BASE: u32 = 0x11_0000;

/// A deterministic glyph source that needs no font file.
///
/// Every character gets one glyph box `advance_ratio * font_size` wide, drawn from the
/// ascent line down to the baseline. Whitespace advances without ink and default
/// ignorable characters produce no glyph. Registered ligatures map a character sequence
/// to a single glyph.
#[derive(Clone, Debug)]
pub struct FixedAdvanceSource {
    advance_ratio: f32,
    ascent_ratio: f32,
    descent_ratio: f32,
    ligatures: Vec<Vec<char>>,
}

impl Default for FixedAdvanceSource {
    fn default() -> Self {
        Self {
            advance_ratio: 0.5,
            ascent_ratio: 0.75,
            descent_ratio: 0.25,
            ligatures: Vec::new(),
        }
    }
}

impl FixedAdvanceSource {
    /// Creates a source with the default proportions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the glyph advance as a proportion of the font size.
    #[must_use]
    pub fn with_advance_ratio(mut self, ratio: f32) -> Self {
        self.advance_ratio = ratio;
        self
    }

    /// Sets the ascent as a proportion of the font size.
    #[must_use]
    pub fn with_ascent_ratio(mut self, ratio: f32) -> Self {
        self.ascent_ratio = ratio;
        self
    }

    /// Sets the descent as a proportion of the font size.
    #[must_use]
    pub fn with_descent_ratio(mut self, ratio: f32) -> Self {
        self.descent_ratio = ratio;
        self
    }

    /// Registers a character sequence that is drawn as one glyph.
    ///
    /// Sequences are tried in registration order.
    #[must_use]
    pub fn with_ligature(mut self, sequence: &str) -> Self {
        let chars: Vec<char> = sequence.chars().collect();
        if chars.len() > 1 {
            self.ligatures.push(chars);
        }
        self
    }

    /// Metrics for a font size.
    pub fn metrics(&self, font_size: f32) -> FontMetrics {
        FontMetrics::from_ratios(font_size, self.ascent_ratio, self.descent_ratio)
    }

    /// Glyph advance for a font size, snapped to device pixels when hinting.
    pub fn advance(&self, font_size: f32, cx: &RenderContext) -> f64 {
        let advance = f64::from(font_size * self.advance_ratio);
        if cx.hinting && cx.scale > 0.0 {
            let scale = f64::from(cx.scale);
            (advance * scale).round() / scale
        } else {
            advance
        }
    }

    /// Lays out one span with these proportions, continuing from `pen`.
    pub(crate) fn push_span<B: Brush>(
        &self,
        builder: &mut GlyphLayoutBuilder,
        run: &AttributedRun<B>,
        span_index: usize,
        range: Range<usize>,
        attributes: &TextAttributes<B>,
        baseline: f64,
        pen: &mut Pen,
        cx: &RenderContext,
    ) {
        let metrics = self.metrics(attributes.font_size);
        builder.push_segment(range.clone(), span_index, metrics, baseline);
        let width = self.advance(attributes.font_size, cx);
        let top = baseline - f64::from(metrics.ascent);
        let text = run.text();
        let mut index = range.start;
        while index < range.end {
            if let Some((ligature, len)) = self.match_ligature(run, index, range.end) {
                let leading = pen.advance(width);
                let ink = Rect::new(leading, top, leading + pen.signed(width), baseline).abs();
                builder.push_glyph(
                    LIGATURE_GLYPH_BASE + ligature,
                    Point::new(leading, baseline),
                    pen.signed(width),
                    index..index + len,
                    Some(ink),
                    Some(ink.to_path(0.1)),
                );
                index += len;
                continue;
            }
            let Some(ch) = text.char_at(index) else {
                break;
            };
            if is_default_ignorable(ch) {
                index += 1;
                continue;
            }
            let leading = pen.advance(width);
            let (ink, outline) = if ch.is_whitespace() {
                (None, None)
            } else {
                let ink = Rect::new(leading, top, leading + pen.signed(width), baseline).abs();
                (Some(ink), Some(ink.to_path(0.1)))
            };
            builder.push_glyph(
                u32::from(ch),
                Point::new(leading, baseline),
                pen.signed(width),
                index..index + 1,
                ink,
                outline,
            );
            index += 1;
        }
    }

    fn match_ligature<B: Brush>(
        &self,
        run: &AttributedRun<B>,
        index: usize,
        end: usize,
    ) -> Option<(u32, usize)> {
        let text = run.text();
        self.ligatures
            .iter()
            .enumerate()
            .find(|(_, sequence)| {
                index + sequence.len() <= end
                    && sequence
                        .iter()
                        .enumerate()
                        .all(|(offset, ch)| text.char_at(index + offset) == Some(*ch))
            })
            .and_then(|(ligature, sequence)| Some((u32::try_from(ligature).ok()?, sequence.len())))
    }
}

impl<B: Brush> GlyphSource<B> for FixedAdvanceSource {
    fn layout(&self, run: &AttributedRun<B>, cx: &RenderContext) -> GlyphLayout {
        let default_metrics = self.metrics(run.text().default_attribute().font_size);
        let baseline = run
            .text()
            .spans()
            .map(|(_, attributes)| self.metrics(attributes.font_size).ascent)
            .fold(0.0, f32::max);
        // An empty run keeps the default ascent so the caret has a sensible baseline.
        let baseline = if run.is_empty() {
            f64::from(default_metrics.ascent)
        } else {
            f64::from(baseline)
        };
        let mut builder = GlyphLayoutBuilder::new(run, default_metrics);
        let mut pen = Pen::new(run.direction(), 0.0);
        for (span_index, (range, attributes)) in run.text().spans().enumerate() {
            self.push_span(
                &mut builder,
                run,
                span_index,
                range,
                attributes,
                baseline,
                &mut pen,
                cx,
            );
        }
        builder.build()
    }
}
