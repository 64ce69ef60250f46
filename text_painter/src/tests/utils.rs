// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use attributed_text::AttributedText;
use peniko::kurbo::{BezPath, PathEl, Rect};

use crate::{
    Affinity, ColorBrush, Direction, FixedAdvanceSource, SelectionMark, StaticTextNode,
    TextAttributes, TextNode, TextPainter, VectorTextPainter,
};

/// Advance of one glyph at the default size with the default proportions.
pub(crate) const W: f64 = 8.0;
/// Ascent at the default size.
pub(crate) const ASCENT: f64 = 12.0;
/// Descent at the default size.
pub(crate) const DESCENT: f64 = 4.0;

/// A y coordinate inside every default-sized glyph box.
const INSIDE_Y: f64 = 6.0;

pub(crate) fn attrs() -> TextAttributes<ColorBrush> {
    TextAttributes::default()
}

/// A node and a fixed-advance painter to query it with.
pub(crate) struct PainterTest {
    pub(crate) node: StaticTextNode<ColorBrush>,
    pub(crate) painter: VectorTextPainter<FixedAdvanceSource>,
}

impl PainterTest {
    /// Plain text with default attributes.
    pub(crate) fn new(text: &str) -> Self {
        Self::with_attributes(text, attrs())
    }

    pub(crate) fn with_attributes(text: &str, attributes: TextAttributes<ColorBrush>) -> Self {
        Self::from_node(StaticTextNode::plain(text, attributes))
    }

    pub(crate) fn from_text(text: AttributedText<TextAttributes<ColorBrush>>) -> Self {
        Self::from_node(StaticTextNode::new(crate::AttributedRun::new(text)))
    }

    pub(crate) fn rtl(text: &str) -> Self {
        Self::from_node(StaticTextNode::new(
            crate::AttributedRun::plain(text, attrs()).with_direction(Direction::Rtl),
        ))
    }

    pub(crate) fn from_node(node: StaticTextNode<ColorBrush>) -> Self {
        Self {
            node,
            painter: VectorTextPainter::new(FixedAdvanceSource::new()),
        }
    }

    /// Clicks inside the default-sized glyph at `index`, on the side of `affinity`.
    ///
    /// Only valid for left-to-right text with one glyph per character.
    pub(crate) fn click(&self, index: usize, affinity: Affinity) -> SelectionMark {
        let offset = match affinity {
            Affinity::Leading => 0.25,
            Affinity::Trailing => 0.75,
        };
        let x = (index as f64 + offset) * W;
        self.painter.select_at(x, INSIDE_Y, self.node())
    }

    /// Drags from one glyph to another, leading side each.
    pub(crate) fn drag(&self, from: usize, to: usize) -> (SelectionMark, SelectionMark) {
        let begin = self.click(from, Affinity::Leading);
        let x = (to as f64 + 0.25) * W;
        let end = self.painter.select_to(x, INSIDE_Y, &begin, self.node());
        (begin, end)
    }

    pub(crate) fn selected(
        &self,
        begin: &SelectionMark,
        end: &SelectionMark,
    ) -> Vec<std::ops::Range<usize>> {
        self.painter
            .get_selected(self.node(), begin, end)
            .expect("marks should be valid")
            .into_vec()
    }

    pub(crate) fn node(&self) -> &dyn TextNode<ColorBrush> {
        &self.node
    }

    pub(crate) fn text_len(&self) -> usize {
        self.node.run().len()
    }
}

#[track_caller]
pub(crate) fn assert_near(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[track_caller]
pub(crate) fn assert_rect_eq(actual: Rect, expected: Rect) {
    for (a, e) in [
        (actual.x0, expected.x0),
        (actual.y0, expected.y0),
        (actual.x1, expected.x1),
        (actual.y1, expected.y1),
    ] {
        assert!(
            (a - e).abs() < 1e-6,
            "expected {expected:?}, got {actual:?}"
        );
    }
}

pub(crate) fn contains(outer: Rect, inner: Rect) -> bool {
    const EPSILON: f64 = 1e-9;
    outer.x0 <= inner.x0 + EPSILON
        && outer.y0 <= inner.y0 + EPSILON
        && outer.x1 + EPSILON >= inner.x1
        && outer.y1 + EPSILON >= inner.y1
}

/// Number of closed subpaths in a path.
pub(crate) fn subpaths(path: &BezPath) -> usize {
    path.elements()
        .iter()
        .filter(|el| matches!(el, PathEl::MoveTo(_)))
        .count()
}
