// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::Range;

use peniko::kurbo::{BezPath, Point, Shape};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, GlyphId, MetadataProvider};

use super::{
    is_default_ignorable, FixedAdvanceSource, FontMetrics, GlyphLayout, GlyphLayoutBuilder,
    GlyphSource, Pen,
};
use crate::node::RenderContext;
use crate::run::AttributedRun;
use crate::style::{Brush, TextAttributes};

/// A glyph source that reads outlines and metrics from the font binaries attached to
/// each span's [`FontDescriptor`](crate::FontDescriptor).
///
/// Characters are mapped one to one through the font's character map; there is no
/// contextual shaping. Spans without usable font data are laid out by the fallback
/// [`FixedAdvanceSource`].
#[derive(Clone, Debug, Default)]
pub struct OutlineSource {
    fallback: FixedAdvanceSource,
}

impl OutlineSource {
    /// Creates a source with a default fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source used for spans without font data.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FixedAdvanceSource) -> Self {
        self.fallback = fallback;
        self
    }

    fn font<'a, B: Brush>(attributes: &'a TextAttributes<B>) -> Option<FontRef<'a>> {
        let data = attributes.font.data.as_ref()?;
        match FontRef::from_index(data.data.as_ref(), data.index) {
            Ok(font) => Some(font),
            Err(err) => {
                log::warn!("unreadable font for {}: {err}", attributes.font.family);
                None
            }
        }
    }

    fn metrics<B: Brush>(&self, attributes: &TextAttributes<B>) -> FontMetrics {
        match Self::font(attributes) {
            Some(font) => FontMetrics::from_font(&font, attributes.font_size),
            None => self.fallback.metrics(attributes.font_size),
        }
    }

    fn push_span<B: Brush>(
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
        let Some(font) = Self::font(attributes) else {
            self.fallback
                .push_span(builder, run, span_index, range, attributes, baseline, pen, cx);
            return;
        };
        let size = Size::new(attributes.font_size);
        let location = LocationRef::default();
        let metrics = FontMetrics::from_font(&font, attributes.font_size);
        builder.push_segment(range.clone(), span_index, metrics, baseline);
        let charmap = font.charmap();
        let glyph_metrics = font.glyph_metrics(size, location);
        let outlines = font.outline_glyphs();
        let text = run.text();
        for index in range {
            let Some(ch) = text.char_at(index) else {
                break;
            };
            if is_default_ignorable(ch) {
                continue;
            }
            let glyph_id = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
            let width = f64::from(glyph_metrics.advance_width(glyph_id).unwrap_or_default());
            let leading = pen.advance(width);
            let left = leading.min(leading + pen.signed(width));
            let outline = outlines.get(glyph_id).and_then(|glyph| {
                let mut path_pen = PathPen::new(Point::new(left, baseline));
                glyph
                    .draw(DrawSettings::unhinted(size, location), &mut path_pen)
                    .ok()
                    .map(|_| path_pen.path)
            });
            let outline = outline.filter(|path| !path.elements().is_empty());
            let ink = outline.as_ref().map(Shape::bounding_box);
            builder.push_glyph(
                glyph_id.to_u32(),
                Point::new(leading, baseline),
                pen.signed(width),
                index..index + 1,
                ink,
                outline,
            );
        }
    }
}

impl<B: Brush> GlyphSource<B> for OutlineSource {
    fn layout(&self, run: &AttributedRun<B>, cx: &RenderContext) -> GlyphLayout {
        let default_metrics = self.metrics(run.text().default_attribute());
        let baseline = if run.is_empty() {
            default_metrics.ascent
        } else {
            run.text()
                .spans()
                .map(|(_, attributes)| self.metrics(attributes).ascent)
                .fold(0.0, f32::max)
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
                f64::from(baseline),
                &mut pen,
                cx,
            );
        }
        builder.build()
    }
}

/// Collects a glyph outline into a path, flipping from font space (y up) into
/// local space (y down) around `origin`.
struct PathPen {
    origin: Point,
    path: BezPath,
}

impl PathPen {
    fn new(origin: Point) -> Self {
        Self {
            origin,
            path: BezPath::new(),
        }
    }

    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(self.origin.x + f64::from(x), self.origin.y - f64::from(y))
    }
}

impl OutlinePen for PathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let (c, p) = (self.point(cx0, cy0), self.point(x, y));
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let (c0, c1, p) = (
            self.point(cx0, cy0),
            self.point(cx1, cy1),
            self.point(x, y),
        );
        self.path.curve_to(c0, c1, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

#[cfg(test)]
mod tests {
    use super::PathPen;
    use peniko::kurbo::{Point, Shape};
    use skrifa::outline::OutlinePen;

    #[test]
    fn pen_flips_into_local_space() {
        let mut pen = PathPen::new(Point::new(10.0, 20.0));
        pen.move_to(0.0, 0.0);
        pen.line_to(4.0, 8.0);
        pen.line_to(4.0, 0.0);
        pen.close();
        let bbox = pen.path.bounding_box();
        assert_eq!((bbox.x0, bbox.y0, bbox.x1, bbox.y1), (10.0, 12.0, 14.0, 20.0));
    }
}
