// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immutable run snapshots.
//!
//! A run is recomputed as a whole whenever a node's content or resolved style changes.
//! Each snapshot carries the lineage it belongs to ([`RunId`]) and a process-wide unique,
//! strictly increasing [`RunGeneration`]. Selection marks are tagged with both.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use attributed_text::AttributedText;

use crate::style::{Brush, TextAttributes};

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Identifies the lineage of a node's text, stable across revisions.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RunId(u64);

impl RunId {
    fn next() -> Self {
        Self(NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    pub fn to_u64(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for RunId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "run #{}", self.0)
    }
}

/// A snapshot counter. Later snapshots always have greater generations.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RunGeneration(u64);

impl RunGeneration {
    fn next() -> Self {
        Self(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw counter value.
    pub fn to_u64(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for RunGeneration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "generation {}", self.0)
    }
}

/// Base direction of a run.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum Direction {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

impl Direction {
    /// Returns `true` for right to left.
    pub fn is_rtl(self) -> bool {
        self == Self::Rtl
    }
}

/// An ordered sequence of characters, each carrying resolved [`TextAttributes`].
#[derive(Clone, Debug)]
pub struct AttributedRun<B: Brush> {
    text: AttributedText<TextAttributes<B>>,
    direction: Direction,
    id: RunId,
    generation: RunGeneration,
}

impl<B: Brush> AttributedRun<B> {
    /// Starts a new lineage from already attributed text.
    pub fn new(text: AttributedText<TextAttributes<B>>) -> Self {
        Self {
            text,
            direction: Direction::Ltr,
            id: RunId::next(),
            generation: RunGeneration::next(),
        }
    }

    /// Starts a new lineage where every character carries `attributes`.
    pub fn plain(text: &str, attributes: TextAttributes<B>) -> Self {
        Self::new(AttributedText::new(text, attributes))
    }

    /// Sets the base direction.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Builds the next snapshot of this lineage from new content.
    ///
    /// Marks made against `self` must not be used with the result.
    #[must_use]
    pub fn revise(&self, text: AttributedText<TextAttributes<B>>) -> Self {
        Self {
            text,
            direction: self.direction,
            id: self.id,
            generation: RunGeneration::next(),
        }
    }

    /// The lineage of this run.
    pub fn id(&self) -> RunId {
        self.id
    }

    /// The generation of this snapshot.
    pub fn generation(&self) -> RunGeneration {
        self.generation
    }

    /// Base direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The attributed characters.
    pub fn text(&self) -> &AttributedText<TextAttributes<B>> {
        &self.text
    }

    /// The plain text.
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the run has no characters.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Attributes of the span at `span_index`, falling back to the run default.
    pub fn span_attributes(&self, span_index: usize) -> &TextAttributes<B> {
        self.text
            .span(span_index)
            .map(|(_, attributes)| attributes)
            .unwrap_or_else(|| self.text.default_attribute())
    }

    /// Wraps the snapshot for sharing with a painter.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
