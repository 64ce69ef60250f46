// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Misc helpers.

use peniko::kurbo::{Point, Rect};

pub(crate) fn nearly_eq(x: f64, y: f64) -> bool {
    (x - y).abs() < 1e-9
}

/// Union of two optional rectangles.
pub(crate) fn union_rect(acc: Option<Rect>, rect: Rect) -> Option<Rect> {
    Some(match acc {
        Some(acc) => acc.union(rect),
        None => rect,
    })
}

/// Euclidean distance from `point` to the closest point of `rect`.
///
/// Zero when the point is inside or on the edge.
pub(crate) fn distance_to_rect(point: Point, rect: Rect) -> f64 {
    let dx = (rect.x0 - point.x).max(0.0).max(point.x - rect.x1);
    let dy = (rect.y0 - point.y).max(0.0).max(point.y - rect.y1);
    dx.hypot(dy)
}

/// Inclusive containment, so points on a shared edge hit both neighbours.
pub(crate) fn contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}
