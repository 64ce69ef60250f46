// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Range;

use crate::Error;

/// A block of text where every character carries exactly one attribute.
///
/// Indices are character indices. Spans are kept sorted, non-overlapping and
/// maximal: two neighbouring spans never hold equal attributes.
#[derive(Clone, Debug)]
pub struct AttributedText<Attr: Debug> {
    text: Arc<str>,
    /// Byte offset of each character, followed by the byte length of the text.
    offsets: Vec<usize>,
    spans: Vec<(Range<usize>, Attr)>,
    default: Attr,
}

impl<Attr: Debug + Clone + PartialEq> AttributedText<Attr> {
    /// Create an `AttributedText` where every character carries `default`.
    pub fn new(text: impl Into<Arc<str>>, default: Attr) -> Self {
        let text = text.into();
        let mut offsets: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
        let len = offsets.len();
        offsets.push(text.len());
        let spans = if len == 0 {
            Vec::new()
        } else {
            alloc::vec![(0..len, default.clone())]
        };
        Self {
            text,
            offsets,
            spans,
            default,
        }
    }

    /// Replace the attribute on `range` (in characters) with `attribute`.
    ///
    /// The last application wins. An empty, in-bounds range is accepted and
    /// leaves the text unchanged.
    pub fn apply_attribute(&mut self, range: Range<usize>, attribute: Attr) -> Result<(), Error> {
        let len = self.len();
        if range.start > range.end {
            return Err(Error::invalid_range(range.start, range.end, len));
        }
        if range.start > len || range.end > len {
            return Err(Error::invalid_bounds(range.start, range.end, len));
        }
        if range.is_empty() {
            return Ok(());
        }
        let mut spans = Vec::with_capacity(self.spans.len() + 2);
        let mut inserted = false;
        for (span, attr) in self.spans.drain(..) {
            if span.end <= range.start {
                spans.push((span, attr));
                continue;
            }
            if span.start < range.start {
                spans.push((span.start..range.start, attr.clone()));
            }
            if !inserted {
                spans.push((range.clone(), attribute.clone()));
                inserted = true;
            }
            if span.end > range.end {
                spans.push((span.start.max(range.end)..span.end, attr));
            }
        }
        self.spans = coalesce(spans);
        Ok(())
    }
}

impl<Attr: Debug> AttributedText<Attr> {
    /// Borrow the underlying text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns a shared handle to the underlying text.
    pub fn text(&self) -> &Arc<str> {
        &self.text
    }

    /// Returns the length of the text, in characters.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns `true` if the text has no characters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the character at `index`.
    pub fn char_at(&self, index: usize) -> Option<char> {
        let start = *self.offsets.get(index)?;
        self.text.get(start..)?.chars().next()
    }

    /// Returns the byte offset of the character at `index`.
    ///
    /// `index == len()` maps to the byte length of the text.
    pub fn byte_offset(&self, index: usize) -> Option<usize> {
        self.offsets.get(index).copied()
    }

    /// Returns the attribute the text was created with.
    ///
    /// This is the attribute of every character that was never overwritten, and
    /// is what measurement falls back to for an empty text.
    pub fn default_attribute(&self) -> &Attr {
        &self.default
    }

    /// Returns the attribute of the character at `index`.
    pub fn attribute_at(&self, index: usize) -> Option<&Attr> {
        let span = self.span_index_at(index)?;
        Some(&self.spans[span].1)
    }

    /// Returns the index of the span containing the character at `index`.
    pub fn span_index_at(&self, index: usize) -> Option<usize> {
        if index >= self.len() {
            return None;
        }
        Some(self.spans.partition_point(|(range, _)| range.end <= index))
    }

    /// Returns the span at `span_index`.
    pub fn span(&self, span_index: usize) -> Option<(&Range<usize>, &Attr)> {
        self.spans
            .get(span_index)
            .map(|(range, attr)| (range, attr))
    }

    /// Returns the number of spans.
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// Iterate over the maximal attribute spans in ascending index order.
    pub fn spans(&self) -> Spans<'_, Attr> {
        Spans {
            inner: self.spans.iter(),
        }
    }
}

/// Iterator over the spans of an [`AttributedText`].
#[derive(Clone, Debug)]
pub struct Spans<'a, Attr> {
    inner: core::slice::Iter<'a, (Range<usize>, Attr)>,
}

impl<'a, Attr> Iterator for Spans<'a, Attr> {
    type Item = (Range<usize>, &'a Attr);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(range, attr)| (range.clone(), attr))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<Attr> ExactSizeIterator for Spans<'_, Attr> {}

fn coalesce<Attr: PartialEq>(spans: Vec<(Range<usize>, Attr)>) -> Vec<(Range<usize>, Attr)> {
    let mut out: Vec<(Range<usize>, Attr)> = Vec::with_capacity(spans.len());
    for (range, attr) in spans {
        if range.is_empty() {
            continue;
        }
        if let Some((last_range, last_attr)) = out.last_mut() {
            if *last_attr == attr && last_range.end == range.start {
                last_range.end = range.end;
                continue;
            }
        }
        out.push((range, attr));
    }
    out
}
