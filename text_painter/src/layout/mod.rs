// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The glyph layout boundary.
//!
//! A [`GlyphSource`] turns a run into a [`GlyphLayout`]: positioned glyph boxes in logical
//! order, grouped into [`LayoutSegment`]s that share attributes and font metrics. The
//! painter never shapes text itself; it only requires that the same run and context always
//! produce the same layout.

mod fixed;
mod metrics;
mod outline;

use std::ops::Range;

use peniko::kurbo::{BezPath, Point, Rect};

use crate::node::RenderContext;
use crate::run::{AttributedRun, Direction, RunGeneration, RunId};
use crate::style::Brush;

pub use fixed::FixedAdvanceSource;
pub use metrics::FontMetrics;
pub use outline::OutlineSource;

/// Produces glyph layouts for runs.
pub trait GlyphSource<B: Brush> {
    /// Lays out `run` for the given rendering context.
    ///
    /// Must be deterministic: the same run and context yield the same layout.
    fn layout(&self, run: &AttributedRun<B>, cx: &RenderContext) -> GlyphLayout;
}

/// One glyph's geometry, back-referenced to the characters it represents.
#[derive(Clone, PartialEq, Debug)]
pub struct GlyphBox {
    /// Font-specific glyph identifier.
    pub id: u32,
    /// Pen position on the baseline at the glyph's leading edge.
    pub origin: Point,
    /// Signed advance along the baseline. Negative when the pen moves left.
    pub advance: f64,
    /// Characters represented by this glyph.
    pub text_range: Range<usize>,
    /// Index of the segment this glyph belongs to.
    pub segment: usize,
    /// Ink extent, `None` for glyphs with nothing to draw.
    pub ink: Option<Rect>,
    /// Positioned outline in local coordinates.
    pub outline: Option<BezPath>,
}

impl GlyphBox {
    /// The x coordinate of the leading edge.
    pub fn leading_edge(&self) -> f64 {
        self.origin.x
    }

    /// The x coordinate of the trailing edge.
    pub fn trailing_edge(&self) -> f64 {
        self.origin.x + self.advance
    }
}

/// A contiguous range of characters laid out with one attribute set.
#[derive(Clone, PartialEq, Debug)]
pub struct LayoutSegment {
    /// Characters covered by the segment.
    pub text_range: Range<usize>,
    /// Glyphs produced for the segment.
    pub glyph_range: Range<usize>,
    /// Index of the attribute span in the run.
    pub span_index: usize,
    /// Metrics of the segment's font at its size.
    pub metrics: FontMetrics,
    /// Baseline y coordinate.
    pub baseline: f64,
}

impl LayoutSegment {
    /// Top of the selection extent.
    pub fn ascent_line(&self) -> f64 {
        self.baseline - f64::from(self.metrics.ascent)
    }

    /// Bottom of the selection extent.
    pub fn descent_line(&self) -> f64 {
        self.baseline + f64::from(self.metrics.descent)
    }
}

/// Positioned glyphs for one run snapshot.
#[derive(Clone, Debug)]
pub struct GlyphLayout {
    run: RunId,
    generation: RunGeneration,
    text_len: usize,
    direction: Direction,
    origin: Point,
    default_metrics: FontMetrics,
    segments: Vec<LayoutSegment>,
    glyphs: Vec<GlyphBox>,
}

impl GlyphLayout {
    /// The lineage this layout was built for.
    pub fn run_id(&self) -> RunId {
        self.run
    }

    /// The run generation this layout was built for.
    pub fn generation(&self) -> RunGeneration {
        self.generation
    }

    /// Number of characters in the run.
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    /// Base direction of the run.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Anchor of the layout. Degenerate bounds collapse to this point.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Metrics of the run's default attributes.
    pub fn default_metrics(&self) -> &FontMetrics {
        &self.default_metrics
    }

    /// Segments in logical order.
    pub fn segments(&self) -> &[LayoutSegment] {
        &self.segments
    }

    /// Glyphs in logical order.
    pub fn glyphs(&self) -> &[GlyphBox] {
        &self.glyphs
    }

    /// Returns `true` if there are no glyphs.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Returns the segment a glyph belongs to.
    pub fn segment_for(&self, glyph: &GlyphBox) -> Option<&LayoutSegment> {
        self.segments.get(glyph.segment)
    }

    /// Advance rectangle of a glyph: its advance horizontally, the segment's
    /// ascent to descent vertically, normalized.
    pub fn advance_rect(&self, glyph: &GlyphBox) -> Rect {
        let (top, bottom) = self
            .segment_for(glyph)
            .map(|segment| (segment.ascent_line(), segment.descent_line()))
            .unwrap_or_else(|| self.default_extent());
        Rect::new(glyph.leading_edge(), top, glyph.trailing_edge(), bottom).abs()
    }

    /// Vertical extent used when there is no segment to measure.
    pub(crate) fn default_extent(&self) -> (f64, f64) {
        let baseline = self.origin.y + f64::from(self.default_metrics.ascent);
        (self.origin.y, baseline + f64::from(self.default_metrics.descent))
    }

    /// Index of the first glyph whose characters include `index`.
    pub fn glyph_for_char(&self, index: usize) -> Option<usize> {
        self.glyphs
            .iter()
            .position(|glyph| glyph.text_range.contains(&index))
    }
}

/// Builds a [`GlyphLayout`] for one run snapshot.
///
/// Glyphs must be pushed in logical order and stay within the run's text.
#[derive(Debug)]
pub struct GlyphLayoutBuilder {
    layout: GlyphLayout,
    last_start: usize,
}

impl GlyphLayoutBuilder {
    /// Starts a layout for `run`. `default_metrics` measures the run's default attributes.
    pub fn new<B: Brush>(run: &AttributedRun<B>, default_metrics: FontMetrics) -> Self {
        Self {
            layout: GlyphLayout {
                run: run.id(),
                generation: run.generation(),
                text_len: run.len(),
                direction: run.direction(),
                origin: Point::ZERO,
                default_metrics,
                segments: Vec::new(),
                glyphs: Vec::new(),
            },
            last_start: 0,
        }
    }

    /// Sets the layout origin.
    #[must_use]
    pub fn origin(mut self, origin: Point) -> Self {
        self.layout.origin = origin;
        self
    }

    /// Starts a new segment. Subsequent glyphs belong to it.
    pub fn push_segment(
        &mut self,
        text_range: Range<usize>,
        span_index: usize,
        metrics: FontMetrics,
        baseline: f64,
    ) -> usize {
        let start = self.layout.glyphs.len();
        self.layout.segments.push(LayoutSegment {
            text_range,
            glyph_range: start..start,
            span_index,
            metrics,
            baseline,
        });
        self.layout.segments.len() - 1
    }

    /// Appends a glyph to the current segment.
    ///
    /// Glyphs out of order, out of bounds or pushed before any segment are dropped.
    pub fn push_glyph(
        &mut self,
        id: u32,
        origin: Point,
        advance: f64,
        text_range: Range<usize>,
        ink: Option<Rect>,
        outline: Option<BezPath>,
    ) -> bool {
        let Some(segment_index) = self.layout.segments.len().checked_sub(1) else {
            log::warn!("glyph {id} pushed before any segment, dropping it");
            return false;
        };
        if text_range.start > text_range.end
            || text_range.end > self.layout.text_len
            || text_range.start < self.last_start
        {
            log::warn!(
                "glyph {id} covers {text_range:?}, which is out of order or out of bounds for len {}",
                self.layout.text_len
            );
            return false;
        }
        self.last_start = text_range.start;
        self.layout.glyphs.push(GlyphBox {
            id,
            origin,
            advance,
            text_range,
            segment: segment_index,
            ink: ink.map(|rect| rect.abs()),
            outline,
        });
        self.layout.segments[segment_index].glyph_range.end = self.layout.glyphs.len();
        true
    }

    /// Finishes the layout.
    pub fn build(self) -> GlyphLayout {
        log::trace!(
            "built layout for {} at {}: {} segments, {} glyphs",
            self.layout.run,
            self.layout.generation,
            self.layout.segments.len(),
            self.layout.glyphs.len()
        );
        self.layout
    }
}

/// Characters that never produce a glyph.
pub(crate) fn is_default_ignorable(ch: char) -> bool {
    matches!(
        ch,
        '\u{00AD}' | '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}' | '\u{FEFF}'
    )
}

/// Moves along the baseline in the run's direction.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Pen {
    pub(crate) x: f64,
    sign: f64,
}

impl Pen {
    pub(crate) fn new(direction: Direction, x: f64) -> Self {
        Self {
            x,
            sign: if direction.is_rtl() { -1.0 } else { 1.0 },
        }
    }

    /// Signed advance for an unsigned width.
    pub(crate) fn signed(&self, width: f64) -> f64 {
        width * self.sign
    }

    /// Advances by an unsigned width, returning the glyph's leading edge.
    pub(crate) fn advance(&mut self, width: f64) -> f64 {
        let leading = self.x;
        self.x += self.signed(width);
        leading
    }
}
