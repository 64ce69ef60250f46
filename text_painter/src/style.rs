// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved styling.
//!
//! Nothing here cascades or inherits: a [`TextAttributes`] value is the complete,
//! already-resolved attribute set of one character.

use std::sync::Arc;

use peniko::{Color, FontData};

/// Trait for types that represent the color of glyphs or decorations.
pub trait Brush: Clone + PartialEq + Default + core::fmt::Debug {}

impl<T: Clone + PartialEq + Default + core::fmt::Debug> Brush for T {}

/// A solid color brush.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorBrush {
    /// The color to paint with.
    pub color: Color,
}

impl ColorBrush {
    /// Creates a brush painting with `color`.
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Default for ColorBrush {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
        }
    }
}

/// Visual weight class of a font, on the usual 1 to 1000 scale.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
pub struct FontWeight(f32);

impl FontWeight {
    /// Weight value of 400.
    pub const NORMAL: Self = Self(400.0);
    /// Weight value of 700.
    pub const BOLD: Self = Self(700.0);

    /// Creates a new weight attribute with the given value.
    pub fn new(weight: f32) -> Self {
        Self(weight)
    }

    /// Returns the underlying weight value.
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Visual style or "slope" of a font.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub enum FontStyle {
    /// An upright or "roman" style.
    #[default]
    Normal,
    /// Generally a slanted style, originally based on semi-cursive forms.
    Italic,
    /// A slanted style, with an optional angle in degrees.
    Oblique(Option<f32>),
}

/// The font a character is drawn with.
///
/// `family` is informational for glyph sources that only need a name; sources that
/// read outlines use `data`.
#[derive(Clone, PartialEq, Debug)]
pub struct FontDescriptor {
    /// Family name.
    pub family: Arc<str>,
    /// Weight.
    pub weight: FontWeight,
    /// Style.
    pub style: FontStyle,
    /// The font binary, when one was resolved.
    pub data: Option<FontData>,
}

impl FontDescriptor {
    /// Creates a descriptor for a family with normal weight and style and no font data.
    pub fn new(family: impl Into<Arc<str>>) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::default(),
            style: FontStyle::default(),
            data: None,
        }
    }

    /// Attaches a font binary.
    #[must_use]
    pub fn with_data(mut self, data: FontData) -> Self {
        self.data = Some(data);
        self
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new("sans-serif")
    }
}

/// The kind of a text decoration.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DecorationKind {
    /// A line below the baseline.
    Underline,
    /// A line at the ascent.
    Overline,
    /// A line through the glyphs.
    Strikethrough,
}

impl DecorationKind {
    /// All decoration kinds in paint order.
    pub const ALL: [Self; 3] = [Self::Underline, Self::Overline, Self::Strikethrough];
}

/// An active decoration.
///
/// `offset` and `size` override the font metrics when present.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Decoration<B: Brush> {
    /// Brush for the decoration. Falls back to the glyph fill.
    pub brush: Option<B>,
    /// Offset of the top of the decoration from the baseline, positive upwards.
    pub offset: Option<f32>,
    /// Thickness of the decoration.
    pub size: Option<f32>,
}

/// Outline paint applied to glyphs and decorations.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct TextStroke<B: Brush> {
    /// Brush for the stroke.
    pub brush: B,
    /// Stroke width in user units.
    pub width: f32,
}

/// Resolved attributes of one character.
#[derive(Clone, PartialEq, Debug)]
pub struct TextAttributes<B: Brush = ColorBrush> {
    /// Font reference.
    pub font: FontDescriptor,
    /// Font size.
    pub font_size: f32,
    /// Fill paint for glyphs. `None` leaves glyph interiors unpainted.
    pub fill: Option<B>,
    /// Outline paint for glyphs and decorations.
    pub stroke: Option<TextStroke<B>>,
    /// Underline decoration.
    pub underline: Option<Decoration<B>>,
    /// Overline decoration.
    pub overline: Option<Decoration<B>>,
    /// Strikethrough decoration.
    pub strikethrough: Option<Decoration<B>>,
}

impl<B: Brush> TextAttributes<B> {
    /// Returns the decoration of the given kind, if active.
    pub fn decoration(&self, kind: DecorationKind) -> Option<&Decoration<B>> {
        match kind {
            DecorationKind::Underline => self.underline.as_ref(),
            DecorationKind::Overline => self.overline.as_ref(),
            DecorationKind::Strikethrough => self.strikethrough.as_ref(),
        }
    }

    /// Returns `true` if any decoration is active.
    pub fn has_decoration(&self) -> bool {
        DecorationKind::ALL
            .iter()
            .any(|kind| self.decoration(*kind).is_some())
    }

    /// Half the stroke width, or zero when the text is not stroked.
    pub fn stroke_extent(&self) -> f64 {
        self.stroke
            .as_ref()
            .map(|stroke| f64::from(stroke.width.max(0.0)) * 0.5)
            .unwrap_or_default()
    }

    /// The brush a decoration of the given kind is painted with.
    pub fn decoration_brush(&self, kind: DecorationKind) -> Option<&B> {
        self.decoration(kind)
            .and_then(|decoration| decoration.brush.as_ref())
            .or(self.fill.as_ref())
    }

    /// Sets the font size.
    #[must_use]
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Activates a decoration of the given kind using font metrics.
    #[must_use]
    pub fn with_decoration(mut self, kind: DecorationKind) -> Self {
        let decoration = Some(Decoration::default());
        match kind {
            DecorationKind::Underline => self.underline = decoration,
            DecorationKind::Overline => self.overline = decoration,
            DecorationKind::Strikethrough => self.strikethrough = decoration,
        }
        self
    }

    /// Sets the outline paint.
    #[must_use]
    pub fn with_stroke(mut self, brush: B, width: f32) -> Self {
        self.stroke = Some(TextStroke { brush, width });
        self
    }
}

impl<B: Brush> Default for TextAttributes<B> {
    fn default() -> Self {
        Self {
            font: FontDescriptor::default(),
            font_size: 16.0,
            fill: Some(B::default()),
            stroke: None,
            underline: None,
            overline: None,
            strikethrough: None,
        }
    }
}
