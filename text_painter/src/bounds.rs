// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::{BezPath, Rect, Shape, Size};

use crate::decoration::{DecorationGeometry, DecorationRect};
use crate::layout::GlyphLayout;
use crate::run::AttributedRun;
use crate::style::{Brush, DecorationKind};
use crate::util::union_rect;

/// Derives the nested envelopes of a laid out run.
///
/// `bounds() ⊆ decorated_bounds() ⊆ painted_bounds()` always holds. A run without ink
/// has degenerate bounds at the layout origin. All rectangles are normalized.
#[derive(Debug)]
pub struct BoundsCalculator<'a, B: Brush, D> {
    layout: &'a GlyphLayout,
    run: &'a AttributedRun<B>,
    decorations: &'a D,
}

impl<'a, B: Brush, D: DecorationGeometry> BoundsCalculator<'a, B, D> {
    /// Creates a calculator for `layout`, which must have been built from `run`.
    pub fn new(layout: &'a GlyphLayout, run: &'a AttributedRun<B>, decorations: &'a D) -> Self {
        Self {
            layout,
            run,
            decorations,
        }
    }

    fn anchor(&self) -> Rect {
        Rect::from_origin_size(self.layout.origin(), Size::ZERO)
    }

    /// Calls `f` with every decoration rectangle in paint order of kinds.
    pub fn for_each_decoration(&self, mut f: impl FnMut(DecorationRect)) {
        for kind in DecorationKind::ALL {
            self.decorations
                .decoration_rects(self.layout, self.run, kind, &mut f);
        }
    }

    /// Union of glyph ink.
    pub fn bounds(&self) -> Rect {
        self.layout
            .glyphs()
            .iter()
            .filter_map(|glyph| glyph.ink)
            .fold(None, union_rect)
            .unwrap_or_else(|| self.anchor())
            .abs()
    }

    /// Glyph bounds extended by every decoration.
    pub fn decorated_bounds(&self) -> Rect {
        let mut bounds = self.bounds();
        self.for_each_decoration(|decoration| bounds = bounds.union(decoration.rect));
        bounds.abs()
    }

    /// Decorated bounds extended by half the stroke width of stroked glyphs and
    /// decorations.
    pub fn painted_bounds(&self) -> Rect {
        let mut bounds = self.decorated_bounds();
        for glyph in self.layout.glyphs() {
            let (Some(ink), Some(segment)) = (glyph.ink, self.layout.segment_for(glyph)) else {
                continue;
            };
            let extent = self.run.span_attributes(segment.span_index).stroke_extent();
            if extent > 0.0 {
                bounds = bounds.union(ink.inflate(extent, extent));
            }
        }
        self.for_each_decoration(|decoration| {
            let extent = self.run.span_attributes(decoration.span_index).stroke_extent();
            if extent > 0.0 {
                bounds = bounds.union(decoration.rect.inflate(extent, extent));
            }
        });
        bounds.abs()
    }

    /// Glyph outlines as one path.
    pub fn shape(&self) -> BezPath {
        let mut path = BezPath::new();
        for outline in self
            .layout
            .glyphs()
            .iter()
            .filter_map(|glyph| glyph.outline.as_ref())
        {
            path.extend(outline.iter());
        }
        path
    }

    /// Glyph outlines together with decoration rectangles.
    pub fn decorated_shape(&self) -> BezPath {
        let mut path = self.shape();
        self.for_each_decoration(|decoration| path.extend(decoration.rect.path_elements(0.1)));
        path
    }
}
