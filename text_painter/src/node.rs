// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node abstraction the painter reads from.

use std::sync::Arc;

use attributed_text::AttributedText;
use peniko::kurbo::Affine;

use crate::run::AttributedRun;
use crate::style::{Brush, TextAttributes};

/// Rendering and measurement parameters.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct RenderContext {
    /// Device pixels per user unit.
    pub scale: f32,
    /// Whether glyph sources may hint outlines.
    pub hinting: bool,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            scale: 1.0,
            hinting: false,
        }
    }
}

/// A scene node that owns a text run.
pub trait TextNode<B: Brush> {
    /// The current run snapshot.
    fn run(&self) -> Arc<AttributedRun<B>>;

    /// Node-to-device transform.
    fn transform(&self) -> Affine {
        Affine::IDENTITY
    }

    /// Rendering and measurement context.
    fn render_context(&self) -> RenderContext {
        RenderContext::default()
    }
}

/// A text node holding its run directly.
#[derive(Clone, Debug)]
pub struct StaticTextNode<B: Brush> {
    run: Arc<AttributedRun<B>>,
    transform: Affine,
    context: RenderContext,
}

impl<B: Brush> StaticTextNode<B> {
    /// Creates a node for `run`.
    pub fn new(run: AttributedRun<B>) -> Self {
        Self {
            run: Arc::new(run),
            transform: Affine::IDENTITY,
            context: RenderContext::default(),
        }
    }

    /// Creates a node with a fresh run where every character carries `attributes`.
    pub fn plain(text: &str, attributes: TextAttributes<B>) -> Self {
        Self::new(AttributedRun::plain(text, attributes))
    }

    /// Sets the node-to-device transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the rendering context.
    #[must_use]
    pub fn with_render_context(mut self, context: RenderContext) -> Self {
        self.context = context;
        self
    }

    /// Replaces the content, producing the next generation of the same lineage.
    pub fn set_text(&mut self, text: AttributedText<TextAttributes<B>>) {
        self.run = Arc::new(self.run.revise(text));
    }

    /// Replaces the run snapshot wholesale.
    pub fn set_run(&mut self, run: Arc<AttributedRun<B>>) {
        self.run = run;
    }
}

impl<B: Brush> TextNode<B> for StaticTextNode<B> {
    fn run(&self) -> Arc<AttributedRun<B>> {
        self.run.clone()
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn render_context(&self) -> RenderContext {
        self.context
    }
}
