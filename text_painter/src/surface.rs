// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing targets.

use peniko::kurbo::{Affine, BezPath, Rect, Stroke};

use crate::style::Brush;

/// A glyph ready to be drawn.
#[derive(Copy, Clone, Debug)]
pub struct PaintGlyph<'a> {
    /// Font-specific glyph identifier.
    pub id: u32,
    /// Positioned outline in local coordinates.
    pub outline: &'a BezPath,
}

/// Trait for surfaces that accept text drawing primitives.
///
/// Geometry is in the node's local coordinates; the transform set last maps it to
/// the device.
pub trait TextSurface<B: Brush> {
    /// Sets the local-to-device transform for subsequent commands.
    fn set_transform(&mut self, transform: Affine);

    /// Fills a glyph outline.
    fn fill_glyph(&mut self, glyph: &PaintGlyph<'_>, brush: &B);

    /// Strokes a glyph outline.
    fn stroke_glyph(&mut self, glyph: &PaintGlyph<'_>, stroke: &Stroke, brush: &B);

    /// Fills a rectangle. Used for decorations.
    fn fill_rect(&mut self, rect: Rect, brush: &B);

    /// Strokes a rectangle. Used for decorations of stroked text.
    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke, brush: &B);
}

/// A recorded drawing command.
#[derive(Clone, PartialEq, Debug)]
pub enum DrawCommand<B: Brush> {
    /// See [`TextSurface::set_transform`].
    SetTransform(Affine),
    /// See [`TextSurface::fill_glyph`].
    FillGlyph {
        /// Glyph identifier.
        id: u32,
        /// Outline in local coordinates.
        outline: BezPath,
        /// Fill paint.
        brush: B,
    },
    /// See [`TextSurface::stroke_glyph`].
    StrokeGlyph {
        /// Glyph identifier.
        id: u32,
        /// Outline in local coordinates.
        outline: BezPath,
        /// Stroke style.
        stroke: Stroke,
        /// Stroke paint.
        brush: B,
    },
    /// See [`TextSurface::fill_rect`].
    FillRect {
        /// Rectangle in local coordinates.
        rect: Rect,
        /// Fill paint.
        brush: B,
    },
    /// See [`TextSurface::stroke_rect`].
    StrokeRect {
        /// Rectangle in local coordinates.
        rect: Rect,
        /// Stroke style.
        stroke: Stroke,
        /// Stroke paint.
        brush: B,
    },
}

/// A surface that records what is drawn on it.
#[derive(Clone, Debug)]
pub struct Recording<B: Brush> {
    commands: Vec<DrawCommand<B>>,
}

impl<B: Brush> Default for Recording<B> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
        }
    }
}

impl<B: Brush> Recording<B> {
    /// Creates an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands in the order they were issued.
    pub fn commands(&self) -> &[DrawCommand<B>] {
        &self.commands
    }

    /// Takes the recorded commands.
    pub fn into_commands(self) -> Vec<DrawCommand<B>> {
        self.commands
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Forgets all commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl<B: Brush> TextSurface<B> for Recording<B> {
    fn set_transform(&mut self, transform: Affine) {
        self.commands.push(DrawCommand::SetTransform(transform));
    }

    fn fill_glyph(&mut self, glyph: &PaintGlyph<'_>, brush: &B) {
        self.commands.push(DrawCommand::FillGlyph {
            id: glyph.id,
            outline: glyph.outline.clone(),
            brush: brush.clone(),
        });
    }

    fn stroke_glyph(&mut self, glyph: &PaintGlyph<'_>, stroke: &Stroke, brush: &B) {
        self.commands.push(DrawCommand::StrokeGlyph {
            id: glyph.id,
            outline: glyph.outline.clone(),
            stroke: stroke.clone(),
            brush: brush.clone(),
        });
    }

    fn fill_rect(&mut self, rect: Rect, brush: &B) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            brush: brush.clone(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke, brush: &B) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            stroke: stroke.clone(),
            brush: brush.clone(),
        });
    }
}
