// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::Range;

use peniko::kurbo::Point;

use super::Affinity;
use crate::layout::GlyphLayout;
use crate::util::{contains_inclusive, distance_to_rect};

/// Maps a point to the characters of the glyph it hits, and the side it hits.
///
/// The first glyph in logical order whose advance rectangle contains the point wins.
/// Otherwise the glyph with the nearest rectangle wins, earlier glyphs winning ties.
/// Within the glyph, points up to the middle of the advance are leading and points past
/// it are trailing. An empty layout hits `0..0`.
pub(crate) fn hit_test(layout: &GlyphLayout, x: f64, y: f64) -> (Range<usize>, Affinity) {
    let point = Point::new(x, y);
    let mut nearest: Option<(usize, f64)> = None;
    for (index, glyph) in layout.glyphs().iter().enumerate() {
        let rect = layout.advance_rect(glyph);
        if contains_inclusive(rect, point) {
            nearest = Some((index, 0.0));
            break;
        }
        let distance = distance_to_rect(point, rect);
        if nearest.is_none_or(|(_, best)| distance < best) {
            nearest = Some((index, distance));
        }
    }
    let Some(glyph) = nearest.and_then(|(index, _)| layout.glyphs().get(index)) else {
        return (0..0, Affinity::Leading);
    };
    let progress = if glyph.advance == 0.0 {
        0.0
    } else {
        (x - glyph.origin.x) / glyph.advance
    };
    let affinity = if progress <= 0.5 {
        Affinity::Leading
    } else {
        Affinity::Trailing
    };
    (glyph.text_range.clone(), affinity)
}
