// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text Painter renders runs of attributed characters as vector geometry and supports
//! interactive selection over them.
//!
//! The pieces, leaf first:
//!
//! - [`AttributedRun`]: an immutable snapshot of characters with resolved style attributes.
//! - [`GlyphSource`]: the boundary to a shaping engine, producing a [`GlyphLayout`].
//! - [`BoundsCalculator`]: glyph, decorated and painted bounds derived from a layout.
//! - [`SelectionMark`] and [`SelectionController`]: pointer hit testing, index ranges and
//!   highlight geometry.
//! - [`TextPainter`]: the façade a text node talks to, implemented by [`VectorTextPainter`].
//!
//! All geometry is in the node's local user space with y pointing down. Marks are tagged
//! with the painter that created them and the run generation they were made against, so
//! mixing marks across painters or using them after the run changed fails loudly.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use peniko;
pub use peniko::kurbo;

mod bounds;
mod cache;
mod decoration;
mod error;
mod painter;
mod util;

pub mod layout;
pub mod node;
pub mod run;
pub mod selection;
pub mod style;
pub mod surface;

#[cfg(test)]
mod tests;

pub use bounds::BoundsCalculator;
pub use decoration::{
    DecorationGeometry, DecorationRect, PerSegmentDecorations, UniformDecorations,
};
pub use error::{Error, ErrorKind};
pub use layout::{
    FixedAdvanceSource, FontMetrics, GlyphBox, GlyphLayout, GlyphLayoutBuilder, GlyphSource,
    LayoutSegment, OutlineSource,
};
pub use node::{RenderContext, StaticTextNode, TextNode};
pub use painter::{PainterId, TextPainter, VectorTextPainter};
pub use run::{AttributedRun, Direction, RunGeneration, RunId};
pub use selection::{Affinity, SelectionController, SelectionMark, SelectionRange};
pub use style::{
    Brush, ColorBrush, Decoration, DecorationKind, FontDescriptor, FontStyle, FontWeight,
    TextAttributes, TextStroke,
};
pub use surface::{DrawCommand, PaintGlyph, Recording, TextSurface};
