// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use peniko::kurbo::{BezPath, Rect, Stroke};
use smallvec::SmallVec;

use crate::bounds::BoundsCalculator;
use crate::cache::LayoutCache;
use crate::decoration::{DecorationGeometry, DecorationRect, PerSegmentDecorations};
use crate::error::Error;
use crate::layout::{GlyphLayout, GlyphSource};
use crate::node::{RenderContext, TextNode};
use crate::run::{AttributedRun, RunGeneration, RunId};
use crate::selection::{SelectionController, SelectionMark, SelectionRange};
use crate::style::{Brush, DecorationKind, TextAttributes};
use crate::surface::{PaintGlyph, TextSurface};

static NEXT_PAINTER: AtomicU64 = AtomicU64::new(1);

/// Number of run lineages a painter remembers by default.
const DEFAULT_CAPACITY: usize = 16;

/// Identifies a painter instance. Marks carry the id of the painter that made them.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct PainterId(u64);

impl PainterId {
    fn next() -> Self {
        Self(NEXT_PAINTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    pub fn to_u64(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for PainterId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "painter #{}", self.0)
    }
}

/// Renders a node's run and answers measurement and selection queries about it.
///
/// All geometry is in the node's local coordinates. Measurement never needs a surface,
/// and painting never creates marks.
pub trait TextPainter<B: Brush> {
    /// Draws the node's glyphs and decorations into `surface`.
    fn paint(&self, node: &dyn TextNode<B>, surface: &mut dyn TextSurface<B>);

    /// The mark nearest to a point.
    fn select_at(&self, x: f64, y: f64, node: &dyn TextNode<B>) -> SelectionMark;

    /// The mark nearest to a point, ending a selection started at `begin`.
    fn select_to(
        &self,
        x: f64,
        y: f64,
        begin: &SelectionMark,
        node: &dyn TextNode<B>,
    ) -> SelectionMark;

    /// A range covering the whole run. The point is ignored.
    fn select_all(&self, x: f64, y: f64, node: &dyn TextNode<B>) -> SelectionRange;

    /// The mark before the first character. The point is ignored.
    fn select_first(&self, x: f64, y: f64, node: &dyn TextNode<B>) -> SelectionMark;

    /// The mark after the last character. The point is ignored.
    fn select_last(&self, x: f64, y: f64, node: &dyn TextNode<B>) -> SelectionMark;

    /// Character ranges between two marks, in ascending order.
    ///
    /// Fails when a mark did not come from this painter, belongs to another run or was
    /// made against an older snapshot than the node's current run.
    fn get_selected(
        &self,
        node: &dyn TextNode<B>,
        begin: &SelectionMark,
        end: &SelectionMark,
    ) -> Result<SmallVec<[Range<usize>; 1]>, Error>;

    /// Highlight region between two marks. Empty when both sit at the same index.
    fn get_highlight_shape(
        &self,
        begin: &SelectionMark,
        end: &SelectionMark,
    ) -> Result<BezPath, Error>;

    /// Caret rectangle of the given width at a mark.
    fn caret_geometry(&self, mark: &SelectionMark, width: f64) -> Result<Rect, Error>;

    /// Glyph outlines.
    fn get_shape(&self, node: &dyn TextNode<B>) -> BezPath;

    /// Glyph outlines and decorations.
    fn get_decorated_shape(&self, node: &dyn TextNode<B>) -> BezPath;

    /// Rectangle enclosing glyph ink.
    fn get_bounds(&self, node: &dyn TextNode<B>) -> Rect;

    /// Glyph bounds extended by decorations.
    fn get_decorated_bounds(&self, node: &dyn TextNode<B>) -> Rect;

    /// Decorated bounds extended by stroke paint.
    fn get_painted_bounds(&self, node: &dyn TextNode<B>) -> Rect;
}

/// A painter over vector glyph outlines.
///
/// Variants differ in where glyphs come from (`S`) and how decorations are placed (`D`).
pub struct VectorTextPainter<S, D = PerSegmentDecorations> {
    controller: SelectionController,
    source: S,
    decorations: D,
    cache: Mutex<LayoutCache>,
}

impl<S> VectorTextPainter<S> {
    /// Creates a painter laying out with `source` and decorating each segment with
    /// its own metrics.
    pub fn new(source: S) -> Self {
        Self {
            controller: SelectionController::new(PainterId::next()),
            source,
            decorations: PerSegmentDecorations,
            cache: Mutex::new(LayoutCache::new(DEFAULT_CAPACITY)),
        }
    }
}

impl<S, D> VectorTextPainter<S, D> {
    /// Replaces the decoration rule.
    #[must_use]
    pub fn with_decorations<E: DecorationGeometry>(
        self,
        decorations: E,
    ) -> VectorTextPainter<S, E> {
        VectorTextPainter {
            controller: self.controller,
            source: self.source,
            decorations,
            cache: self.cache,
        }
    }

    /// Sets how many run lineages the painter remembers.
    ///
    /// Marks for a forgotten lineage are no longer recognized as stale.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.cache = Mutex::new(LayoutCache::new(capacity));
        self
    }

    /// This painter's id.
    pub fn id(&self) -> PainterId {
        self.controller.painter()
    }

    /// The glyph source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The decoration rule.
    pub fn decorations(&self) -> &D {
        &self.decorations
    }

    /// Highlight region between two marks.
    ///
    /// Marks carry their layout, so this needs no node. Fails when a newer generation of
    /// the marks' run has been laid out since they were made.
    pub fn get_highlight_shape(
        &self,
        begin: &SelectionMark,
        end: &SelectionMark,
    ) -> Result<BezPath, Error> {
        let latest = self.latest_generation(begin.run_id());
        self.controller.highlight_shape(begin, end, latest)
    }

    /// Caret rectangle of the given width at a mark.
    pub fn caret_geometry(&self, mark: &SelectionMark, width: f64) -> Result<Rect, Error> {
        let latest = self.latest_generation(mark.run_id());
        self.controller.caret_geometry(mark, width, latest)
    }

    fn latest_generation(&self, run: RunId) -> Option<RunGeneration> {
        self.lock_cache().latest_generation(run)
    }

    fn lock_cache(&self) -> MutexGuard<'_, LayoutCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S, D: DecorationGeometry> VectorTextPainter<S, D> {
    /// The layout of a node's current run.
    pub fn layout<B: Brush>(&self, node: &dyn TextNode<B>) -> Arc<GlyphLayout>
    where
        S: GlyphSource<B>,
    {
        self.layout_run(&node.run(), node.render_context())
    }

    fn layout_run<B: Brush>(
        &self,
        run: &AttributedRun<B>,
        cx: RenderContext,
    ) -> Arc<GlyphLayout>
    where
        S: GlyphSource<B>,
    {
        let cached = self.lock_cache().get(run.id(), run.generation(), cx);
        if let Some(layout) = cached {
            return layout;
        }
        // The lock is not held while laying out.
        let layout = self.source.layout(run, &cx);
        self.lock_cache().insert(cx, layout)
    }

    fn measure<B: Brush, T>(
        &self,
        node: &dyn TextNode<B>,
        f: impl FnOnce(&BoundsCalculator<'_, B, D>) -> T,
    ) -> T
    where
        S: GlyphSource<B>,
    {
        let run = node.run();
        let layout = self.layout_run(&run, node.render_context());
        f(&BoundsCalculator::new(&layout, &run, &self.decorations))
    }
}

impl<B: Brush, S: GlyphSource<B>, D: DecorationGeometry> TextPainter<B>
    for VectorTextPainter<S, D>
{
    fn paint(&self, node: &dyn TextNode<B>, surface: &mut dyn TextSurface<B>) {
        let run = node.run();
        let layout = self.layout_run(&run, node.render_context());
        let mut decorations = Vec::new();
        BoundsCalculator::new(&layout, &run, &self.decorations)
            .for_each_decoration(|decoration| decorations.push(decoration));

        surface.set_transform(node.transform());
        let mut commands = 0_usize;
        for (segment_index, segment) in layout.segments().iter().enumerate() {
            let attributes = run.span_attributes(segment.span_index);
            // A decoration is drawn with the first segment of its span.
            let owned = |decoration: &&DecorationRect| {
                layout
                    .segments()
                    .iter()
                    .position(|segment| segment.span_index == decoration.span_index)
                    == Some(segment_index)
            };
            let stroke_style = attributes
                .stroke
                .as_ref()
                .map(|stroke| (Stroke::new(f64::from(stroke.width)), &stroke.brush));
            let stroke = stroke_style.as_ref().map(|(style, brush)| (style, *brush));

            for kind in [DecorationKind::Underline, DecorationKind::Overline] {
                for decoration in decorations.iter().filter(|d| d.kind == kind).filter(owned) {
                    commands += draw_decoration(surface, attributes, decoration, stroke);
                }
            }
            let glyphs = layout
                .glyphs()
                .get(segment.glyph_range.clone())
                .unwrap_or_default();
            for glyph in glyphs {
                let Some(outline) = glyph.outline.as_ref() else {
                    continue;
                };
                let glyph = PaintGlyph {
                    id: glyph.id,
                    outline,
                };
                if let Some(fill) = attributes.fill.as_ref() {
                    surface.fill_glyph(&glyph, fill);
                    commands += 1;
                }
                if let Some((style, brush)) = stroke {
                    surface.stroke_glyph(&glyph, style, brush);
                    commands += 1;
                }
            }
            for decoration in decorations
                .iter()
                .filter(|d| d.kind == DecorationKind::Strikethrough)
                .filter(owned)
            {
                commands += draw_decoration(surface, attributes, decoration, stroke);
            }
        }
        log::trace!(
            "{} painted {} at {} with {commands} commands",
            self.id(),
            run.id(),
            run.generation()
        );
    }

    fn select_at(&self, x: f64, y: f64, node: &dyn TextNode<B>) -> SelectionMark {
        self.controller.select_at(x, y, &self.layout(node))
    }

    fn select_to(
        &self,
        x: f64,
        y: f64,
        begin: &SelectionMark,
        node: &dyn TextNode<B>,
    ) -> SelectionMark {
        self.controller.select_to(x, y, begin, &self.layout(node))
    }

    fn select_all(&self, _x: f64, _y: f64, node: &dyn TextNode<B>) -> SelectionRange {
        self.controller.select_all(&self.layout(node))
    }

    fn select_first(&self, _x: f64, _y: f64, node: &dyn TextNode<B>) -> SelectionMark {
        self.controller.select_first(&self.layout(node))
    }

    fn select_last(&self, _x: f64, _y: f64, node: &dyn TextNode<B>) -> SelectionMark {
        self.controller.select_last(&self.layout(node))
    }

    fn get_selected(
        &self,
        node: &dyn TextNode<B>,
        begin: &SelectionMark,
        end: &SelectionMark,
    ) -> Result<SmallVec<[Range<usize>; 1]>, Error> {
        self.controller.get_selected(&self.layout(node), begin, end)
    }

    fn get_highlight_shape(
        &self,
        begin: &SelectionMark,
        end: &SelectionMark,
    ) -> Result<BezPath, Error> {
        Self::get_highlight_shape(self, begin, end)
    }

    fn caret_geometry(&self, mark: &SelectionMark, width: f64) -> Result<Rect, Error> {
        Self::caret_geometry(self, mark, width)
    }

    fn get_shape(&self, node: &dyn TextNode<B>) -> BezPath {
        self.measure(node, |bounds| bounds.shape())
    }

    fn get_decorated_shape(&self, node: &dyn TextNode<B>) -> BezPath {
        self.measure(node, |bounds| bounds.decorated_shape())
    }

    fn get_bounds(&self, node: &dyn TextNode<B>) -> Rect {
        self.measure(node, |bounds| bounds.bounds())
    }

    fn get_decorated_bounds(&self, node: &dyn TextNode<B>) -> Rect {
        self.measure(node, |bounds| bounds.decorated_bounds())
    }

    fn get_painted_bounds(&self, node: &dyn TextNode<B>) -> Rect {
        self.measure(node, |bounds| bounds.painted_bounds())
    }
}

impl<S: core::fmt::Debug, D: core::fmt::Debug> core::fmt::Debug for VectorTextPainter<S, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VectorTextPainter")
            .field("id", &self.id())
            .field("source", &self.source)
            .field("decorations", &self.decorations)
            .finish_non_exhaustive()
    }
}

/// Draws one decoration, returning the number of commands issued.
fn draw_decoration<B: Brush>(
    surface: &mut dyn TextSurface<B>,
    attributes: &TextAttributes<B>,
    decoration: &DecorationRect,
    stroke: Option<(&Stroke, &B)>,
) -> usize {
    let mut commands = 0;
    if let Some(brush) = attributes.decoration_brush(decoration.kind) {
        surface.fill_rect(decoration.rect, brush);
        commands += 1;
    }
    if let Some((style, brush)) = stroke {
        surface.stroke_rect(decoration.rect, style, brush);
        commands += 1;
    }
    commands
}
