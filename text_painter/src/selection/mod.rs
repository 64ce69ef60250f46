// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection marks and the controller that produces and interprets them.
//!
//! The controller keeps no state between calls. A drag is a [`SelectionController::select_at`]
//! followed by any number of [`SelectionController::select_to`] calls; the caller holds on to
//! the marks.

mod hit;

use core::cmp::Ordering;
use std::ops::Range;
use std::sync::Arc;

use peniko::kurbo::{BezPath, Rect, Shape};
use smallvec::SmallVec;

use crate::error::Error;
use crate::layout::GlyphLayout;
use crate::painter::PainterId;
use crate::run::{RunGeneration, RunId};
use crate::util::nearly_eq;

/// Which edge of a glyph a caret binds to.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub enum Affinity {
    /// The edge the pen starts from.
    #[default]
    Leading,
    /// The edge the pen ends at.
    Trailing,
}

/// An opaque caret position within one run snapshot.
///
/// Only marks from the same painter, lineage and generation can be compared or
/// combined.
#[derive(Clone)]
pub struct SelectionMark {
    painter: PainterId,
    run: RunId,
    generation: RunGeneration,
    index: usize,
    affinity: Affinity,
    caret: usize,
    layout: Arc<GlyphLayout>,
}

impl SelectionMark {
    /// Index of the first character of the glyph the mark binds to.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Caret position as a character boundary.
    ///
    /// This is [`index`](Self::index) for leading marks. A trailing mark sits after the
    /// last character of its glyph.
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Edge of the glyph the caret binds to.
    pub fn affinity(&self) -> Affinity {
        self.affinity
    }

    /// Painter that produced the mark.
    pub fn painter(&self) -> PainterId {
        self.painter
    }

    /// Lineage of the run the mark was made against.
    pub fn run_id(&self) -> RunId {
        self.run
    }

    /// Generation of the run the mark was made against.
    pub fn generation(&self) -> RunGeneration {
        self.generation
    }

    /// Layout the mark was produced against.
    pub fn layout(&self) -> &GlyphLayout {
        &self.layout
    }

    /// Orders two marks by index, then affinity.
    ///
    /// Fails with [`ErrorKind::ForeignMark`](crate::ErrorKind::ForeignMark) when the marks
    /// belong to different painters, lineages or generations.
    pub fn compare(&self, other: &Self) -> Result<Ordering, Error> {
        if self.painter != other.painter || !self.same_snapshot(other) {
            return Err(Error::foreign_mark(
                self.painter,
                other.tag(),
                Some(self.tag()),
            ));
        }
        Ok(self.position().cmp(&other.position()))
    }

    fn tag(&self) -> (RunId, RunGeneration) {
        (self.run, self.generation)
    }

    fn position(&self) -> (usize, Affinity) {
        (self.index, self.affinity)
    }

    fn same_snapshot(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }
}

impl PartialEq for SelectionMark {
    fn eq(&self, other: &Self) -> bool {
        self.painter == other.painter
            && self.same_snapshot(other)
            && self.position() == other.position()
    }
}

impl PartialOrd for SelectionMark {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl core::fmt::Debug for SelectionMark {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SelectionMark")
            .field("painter", &self.painter)
            .field("run", &self.run)
            .field("generation", &self.generation)
            .field("index", &self.index)
            .field("affinity", &self.affinity)
            .field("caret", &self.caret)
            .finish_non_exhaustive()
    }
}

/// A pair of marks in input order.
#[derive(Clone, PartialEq, Debug)]
pub struct SelectionRange {
    /// Where the selection started.
    pub begin: SelectionMark,
    /// Where the selection ends.
    pub end: SelectionMark,
}

impl SelectionRange {
    /// Creates a range from two marks.
    pub fn new(begin: SelectionMark, end: SelectionMark) -> Self {
        Self { begin, end }
    }

    /// Returns the range with `begin.index() <= end.index()`.
    ///
    /// Only indices are compared; affinities and tags are carried along unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.end.index < self.begin.index {
            Self {
                begin: self.end,
                end: self.begin,
            }
        } else {
            self
        }
    }

    /// Returns `true` if both carets sit at the same character boundary.
    pub fn is_collapsed(&self) -> bool {
        self.begin.caret == self.end.caret
    }
}

/// Turns pointer positions into marks, and marks into index ranges and geometry.
#[derive(Copy, Clone, Debug)]
pub struct SelectionController {
    painter: PainterId,
}

impl SelectionController {
    /// Creates a controller issuing marks on behalf of `painter`.
    pub fn new(painter: PainterId) -> Self {
        Self { painter }
    }

    /// The painter this controller issues marks for.
    pub fn painter(&self) -> PainterId {
        self.painter
    }

    fn mark(
        &self,
        layout: &Arc<GlyphLayout>,
        glyph: Range<usize>,
        affinity: Affinity,
    ) -> SelectionMark {
        let caret = match affinity {
            Affinity::Leading => glyph.start,
            Affinity::Trailing => glyph.end,
        };
        SelectionMark {
            painter: self.painter,
            run: layout.run_id(),
            generation: layout.generation(),
            index: glyph.start,
            affinity,
            caret,
            layout: layout.clone(),
        }
    }

    /// Returns the mark nearest to a point.
    ///
    /// The first glyph whose advance rectangle contains the point wins, else the nearest
    /// one. Points up to the middle of the advance are leading. Both affinities report
    /// the glyph's first character as the index, while a trailing caret sits after the
    /// glyph. An empty layout yields a leading mark at index 0.
    pub fn select_at(&self, x: f64, y: f64, layout: &Arc<GlyphLayout>) -> SelectionMark {
        let (glyph, affinity) = hit::hit_test(layout, x, y);
        self.mark(layout, glyph, affinity)
    }

    /// Extends a selection started at `begin` to a point.
    ///
    /// The hit test is the one of [`select_at`](Self::select_at); `begin` is not
    /// consulted beyond diagnostics and the result is not normalized.
    pub fn select_to(
        &self,
        x: f64,
        y: f64,
        begin: &SelectionMark,
        layout: &Arc<GlyphLayout>,
    ) -> SelectionMark {
        if begin.tag() != (layout.run_id(), layout.generation()) {
            log::debug!(
                "extending a selection begun on {} at {} over {} at {}",
                begin.run,
                begin.generation,
                layout.run_id(),
                layout.generation()
            );
        }
        self.select_at(x, y, layout)
    }

    /// The mark before the first character.
    pub fn select_first(&self, layout: &Arc<GlyphLayout>) -> SelectionMark {
        self.mark(layout, 0..0, Affinity::Leading)
    }

    /// The mark after the last character.
    pub fn select_last(&self, layout: &Arc<GlyphLayout>) -> SelectionMark {
        let len = layout.text_len();
        self.mark(layout, len..len, Affinity::Trailing)
    }

    /// A range covering the whole run.
    pub fn select_all(&self, layout: &Arc<GlyphLayout>) -> SelectionRange {
        SelectionRange::new(self.select_first(layout), self.select_last(layout))
    }

    /// Checks that two marks come from this controller and the same snapshot.
    pub(crate) fn check_pair(
        &self,
        begin: &SelectionMark,
        end: &SelectionMark,
    ) -> Result<(), Error> {
        for mark in [begin, end] {
            if mark.painter != self.painter {
                log::warn!(
                    "{} rejected a mark issued by {} for {}",
                    self.painter,
                    mark.painter,
                    mark.run
                );
                return Err(Error::foreign_mark(self.painter, mark.tag(), None));
            }
        }
        if !begin.same_snapshot(end) {
            log::warn!(
                "{} rejected a selection spanning {} at {} and {} at {}",
                self.painter,
                begin.run,
                begin.generation,
                end.run,
                end.generation
            );
            return Err(Error::mismatched_marks(
                self.painter,
                end.tag(),
                begin.tag(),
            ));
        }
        Ok(())
    }

    /// Checks that a mark was made against `layout`'s snapshot.
    pub(crate) fn check_current(
        &self,
        mark: &SelectionMark,
        layout: &GlyphLayout,
    ) -> Result<(), Error> {
        let current = (layout.run_id(), layout.generation());
        if mark.run != current.0 {
            log::warn!(
                "{} rejected a mark for {} queried against {}",
                self.painter,
                mark.run,
                current.0
            );
            return Err(Error::foreign_mark(self.painter, mark.tag(), Some(current)));
        }
        if mark.generation != current.1 {
            log::warn!(
                "{} rejected a mark for {} at {}, run is at {}",
                self.painter,
                mark.run,
                mark.generation,
                current.1
            );
            return Err(Error::stale_mark(self.painter, mark.tag(), current));
        }
        Ok(())
    }

    /// Checks that no newer generation than the mark's has been seen.
    pub(crate) fn check_latest(
        &self,
        mark: &SelectionMark,
        latest: Option<RunGeneration>,
    ) -> Result<(), Error> {
        match latest {
            Some(latest) if latest > mark.generation => {
                log::warn!(
                    "{} rejected a mark for {} at {}, superseded by {}",
                    self.painter,
                    mark.run,
                    mark.generation,
                    latest
                );
                Err(Error::stale_mark(
                    self.painter,
                    mark.tag(),
                    (mark.run, latest),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Character ranges between two marks, against the run `layout` was built for.
    ///
    /// The result runs between the two carets, `[min, max)`, and is empty when they
    /// coincide.
    pub fn get_selected(
        &self,
        layout: &GlyphLayout,
        begin: &SelectionMark,
        end: &SelectionMark,
    ) -> Result<SmallVec<[Range<usize>; 1]>, Error> {
        self.check_pair(begin, end)?;
        self.check_current(begin, layout)?;
        let range = caret_range(begin, end, layout.text_len());
        let mut ranges = SmallVec::new();
        if !range.is_empty() {
            ranges.push(range);
        }
        Ok(ranges)
    }

    /// The highlight region between two marks.
    ///
    /// This is the union of the advance rectangles of every glyph overlapping the
    /// selected characters, each spanning its segment's ascent to descent. `latest` is
    /// the newest generation known for the marks' lineage.
    pub fn highlight_shape(
        &self,
        begin: &SelectionMark,
        end: &SelectionMark,
        latest: Option<RunGeneration>,
    ) -> Result<BezPath, Error> {
        self.check_pair(begin, end)?;
        self.check_latest(begin, latest)?;
        let layout = &begin.layout;
        let range = caret_range(begin, end, layout.text_len());
        let mut path = BezPath::new();
        if range.is_empty() {
            return Ok(path);
        }
        let mut current: Option<Rect> = None;
        for glyph in layout.glyphs().iter().filter(|glyph| {
            glyph.text_range.start < range.end && glyph.text_range.end > range.start
        }) {
            let rect = layout.advance_rect(glyph);
            current = match current {
                Some(acc) if adjoins(acc, rect) => Some(acc.union(rect)),
                Some(acc) => {
                    path.extend(acc.path_elements(0.1));
                    Some(rect)
                }
                None => Some(rect),
            };
        }
        if let Some(acc) = current {
            path.extend(acc.path_elements(0.1));
        }
        Ok(path)
    }

    /// Caret rectangle of `width` at a mark's edge, spanning its segment's ascent
    /// to descent.
    pub fn caret_geometry(
        &self,
        mark: &SelectionMark,
        width: f64,
        latest: Option<RunGeneration>,
    ) -> Result<Rect, Error> {
        self.check_pair(mark, mark)?;
        self.check_latest(mark, latest)?;
        let layout = &mark.layout;
        let glyphs = layout.glyphs();
        let trailing = match mark.affinity {
            Affinity::Trailing => layout
                .glyph_for_char(mark.index)
                .and_then(|index| glyphs.get(index)),
            Affinity::Leading => None,
        };
        // Characters without glyphs put the caret before the next glyph, and past the
        // last glyph it sits at the end of the run.
        let at = trailing
            .map(|glyph| (glyph, true))
            .or_else(|| {
                glyphs
                    .iter()
                    .find(|glyph| glyph.text_range.start >= mark.caret)
                    .map(|glyph| (glyph, false))
            })
            .or_else(|| glyphs.last().map(|glyph| (glyph, true)));
        let (x, (top, bottom)) = match at {
            Some((glyph, at_end)) => (
                if at_end {
                    glyph.trailing_edge()
                } else {
                    glyph.leading_edge()
                },
                layout
                    .segment_for(glyph)
                    .map(|segment| (segment.ascent_line(), segment.descent_line()))
                    .unwrap_or_else(|| layout.default_extent()),
            ),
            None => (layout.origin().x, layout.default_extent()),
        };
        Ok(Rect::new(x, top, x + width, bottom).abs())
    }
}

/// Caret positions of two marks as an ascending character range.
fn caret_range(a: &SelectionMark, b: &SelectionMark, len: usize) -> Range<usize> {
    let (a, b) = (a.caret.min(len), b.caret.min(len));
    a.min(b)..a.max(b)
}

/// Whether two highlight rectangles touch horizontally with the same vertical extent.
fn adjoins(a: Rect, b: Rect) -> bool {
    nearly_eq(a.y0, b.y0)
        && nearly_eq(a.y1, b.y1)
        && (nearly_eq(a.x1, b.x0) || nearly_eq(b.x1, a.x0))
}
