// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement rules for underline, overline and strikethrough.

use peniko::kurbo::Rect;

use crate::layout::{GlyphLayout, LayoutSegment};
use crate::run::AttributedRun;
use crate::style::{Brush, Decoration, DecorationKind};

/// One decoration rectangle in local coordinates.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct DecorationRect {
    /// Kind of decoration.
    pub kind: DecorationKind,
    /// Filled area of the decoration.
    pub rect: Rect,
    /// Attribute span whose paint applies.
    pub span_index: usize,
}

/// Computes where decorations are drawn.
///
/// Painter variants differ in this rule and in their glyph source.
pub trait DecorationGeometry {
    /// Emits every rectangle of the given decoration kind.
    fn decoration_rects<B: Brush>(
        &self,
        layout: &GlyphLayout,
        run: &AttributedRun<B>,
        kind: DecorationKind,
        f: &mut dyn FnMut(DecorationRect),
    );
}

/// Each segment is decorated with its own font metrics.
#[derive(Copy, Clone, Default, Debug)]
pub struct PerSegmentDecorations;

impl DecorationGeometry for PerSegmentDecorations {
    fn decoration_rects<B: Brush>(
        &self,
        layout: &GlyphLayout,
        run: &AttributedRun<B>,
        kind: DecorationKind,
        f: &mut dyn FnMut(DecorationRect),
    ) {
        for segment in layout.segments() {
            let attributes = run.span_attributes(segment.span_index);
            let Some(decoration) = attributes.decoration(kind) else {
                continue;
            };
            let Some((x0, x1)) = horizontal_extent(layout, segment.glyph_range.clone()) else {
                continue;
            };
            let (top, bottom) = placement(segment, decoration, kind);
            f(DecorationRect {
                kind,
                rect: Rect::new(x0, top, x1, bottom).abs(),
                span_index: segment.span_index,
            });
        }
    }
}

/// Decorations run as one continuous line across font changes.
///
/// The segment with the largest font size decides position and thickness for the whole
/// run. A line only breaks where the decoration stops, or where its paint changes.
#[derive(Copy, Clone, Default, Debug)]
pub struct UniformDecorations;

impl DecorationGeometry for UniformDecorations {
    fn decoration_rects<B: Brush>(
        &self,
        layout: &GlyphLayout,
        run: &AttributedRun<B>,
        kind: DecorationKind,
        f: &mut dyn FnMut(DecorationRect),
    ) {
        let mut dominant: Option<(&LayoutSegment, &Decoration<B>, f32)> = None;
        for segment in layout.segments() {
            if segment.glyph_range.is_empty() {
                continue;
            }
            let attributes = run.span_attributes(segment.span_index);
            let Some(decoration) = attributes.decoration(kind) else {
                continue;
            };
            if dominant.is_none_or(|(_, _, size)| attributes.font_size > size) {
                dominant = Some((segment, decoration, attributes.font_size));
            }
        }
        let Some((dominant, decoration, _)) = dominant else {
            return;
        };
        let (top, bottom) = placement(dominant, decoration, kind);

        // (first glyph, end glyph, span index) of the line being built.
        let mut line: Option<(usize, usize, usize)> = None;
        let mut flush = |line: Option<(usize, usize, usize)>| {
            if let Some((start, end, span_index)) = line {
                if let Some((x0, x1)) = horizontal_extent(layout, start..end) {
                    f(DecorationRect {
                        kind,
                        rect: Rect::new(x0, top, x1, bottom).abs(),
                        span_index,
                    });
                }
            }
        };
        for segment in layout.segments() {
            if segment.glyph_range.is_empty() {
                continue;
            }
            let attributes = run.span_attributes(segment.span_index);
            if attributes.decoration(kind).is_none() {
                flush(line.take());
                continue;
            }
            line = match line {
                Some((start, end, span_index))
                    if end == segment.glyph_range.start
                        && same_paint(run, span_index, segment.span_index, kind) =>
                {
                    Some((start, segment.glyph_range.end, span_index))
                }
                previous => {
                    flush(previous);
                    Some((
                        segment.glyph_range.start,
                        segment.glyph_range.end,
                        segment.span_index,
                    ))
                }
            };
        }
        flush(line);
    }
}

fn same_paint<B: Brush>(run: &AttributedRun<B>, a: usize, b: usize, kind: DecorationKind) -> bool {
    let (a, b) = (run.span_attributes(a), run.span_attributes(b));
    a.decoration_brush(kind) == b.decoration_brush(kind) && a.stroke == b.stroke
}

/// Top and bottom of a decoration in a segment, honouring style overrides.
pub(crate) fn placement<B: Brush>(
    segment: &LayoutSegment,
    decoration: &Decoration<B>,
    kind: DecorationKind,
) -> (f64, f64) {
    let (offset, size) = segment.metrics.decoration(kind);
    let offset = f64::from(decoration.offset.unwrap_or(offset));
    let size = f64::from(decoration.size.unwrap_or(size).max(0.0));
    let top = segment.baseline - offset;
    (top, top + size)
}

/// Leftmost and rightmost advance edge of a glyph range.
fn horizontal_extent(layout: &GlyphLayout, glyphs: std::ops::Range<usize>) -> Option<(f64, f64)> {
    layout
        .glyphs()
        .get(glyphs)?
        .iter()
        .map(|glyph| {
            let (a, b) = (glyph.leading_edge(), glyph.trailing_edge());
            (a.min(b), a.max(b))
        })
        .reduce(|(x0, x1), (a, b)| (x0.min(a), x1.max(b)))
}
