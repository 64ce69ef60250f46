// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use crate::layout::GlyphLayout;
use crate::node::RenderContext;
use crate::run::{RunGeneration, RunId};

/// An entry in the cache.
struct Entry {
    epoch: u64,
    id: RunId,
    context: RenderContext,
    layout: Arc<GlyphLayout>,
}

/// The newest layout of each recently seen run lineage.
///
/// This cache uses a linear scan of its entries to find a given lineage and is
/// optimised for a low number of entries. Besides reusing layouts it doubles as the
/// registry of the latest generation seen per lineage, which is how stale marks are
/// detected.
pub(crate) struct LayoutCache {
    entries: Vec<Entry>,
    epoch: u64,
    max_entries: usize,
}

impl LayoutCache {
    pub(crate) fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            epoch: 0,
            max_entries: max_entries.max(1),
        }
    }

    /// Returns the cached layout for a snapshot if it was built in `context`.
    pub(crate) fn get(
        &mut self,
        id: RunId,
        generation: RunGeneration,
        context: RenderContext,
    ) -> Option<Arc<GlyphLayout>> {
        self.epoch += 1;
        let epoch = self.epoch;
        let entry = self.entries.iter_mut().find(|entry| {
            entry.id == id && entry.layout.generation() == generation && entry.context == context
        })?;
        entry.epoch = epoch;
        Some(entry.layout.clone())
    }

    /// Records a layout built in `context` and returns the handle to use.
    ///
    /// A newer generation replaces the entry. An older one is returned without being
    /// cached so the lineage keeps its latest generation. When an equal layout was
    /// stored in the meantime, that one is returned.
    pub(crate) fn insert(
        &mut self,
        context: RenderContext,
        layout: GlyphLayout,
    ) -> Arc<GlyphLayout> {
        self.epoch += 1;
        let epoch = self.epoch;
        let (id, generation) = (layout.run_id(), layout.generation());
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            let layout = Arc::new(layout);
            self.push(Entry {
                epoch,
                id,
                context,
                layout: layout.clone(),
            });
            return layout;
        };
        let cached = entry.layout.generation();
        if generation < cached {
            log::trace!("{id} at {generation} is older than cached {cached}, not caching");
            return Arc::new(layout);
        }
        if generation > cached {
            log::debug!("{id} advanced from {cached} to {generation}");
        } else if entry.context == context {
            entry.epoch = epoch;
            return entry.layout.clone();
        }
        let layout = Arc::new(layout);
        entry.epoch = epoch;
        entry.context = context;
        entry.layout = layout.clone();
        layout
    }

    /// The latest generation seen for a lineage, if it is still tracked.
    pub(crate) fn latest_generation(&self, id: RunId) -> Option<RunGeneration> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.layout.generation())
    }

    fn push(&mut self, entry: Entry) {
        if self.entries.len() < self.max_entries {
            self.entries.push(entry);
            return;
        }
        let Some(oldest) = self
            .entries
            .iter_mut()
            .min_by_key(|existing| existing.epoch)
        else {
            return;
        };
        log::debug!("evicting {} from the layout cache", oldest.id);
        *oldest = entry;
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}
