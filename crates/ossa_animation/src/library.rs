use std::sync::Arc;

use ossa_core::Result;

use crate::builder::{BoneSlotMap, ClipBuilder};
use crate::clip::ClipStore;
use crate::source::ClipSource;

#[derive(Debug, Clone)]
struct LibraryEntry {
    store: Arc<ClipStore>,
    slots: BoneSlotMap,
}

/// The ordered clips available to one kind of animated instance.
///
/// A clip's position in the library is its clip index, the value passed to
/// `play` / `cross_fade`. Stores are reference counted so the same clip can be
/// shared by several libraries; the library itself is shared by every instance
/// spawned from it.
#[derive(Debug, Clone, Default)]
pub struct ClipLibrary {
    entries: Vec<LibraryEntry>,
}

impl ClipLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a built clip and returns its clip index.
    pub fn push(&mut self, store: impl Into<Arc<ClipStore>>, slots: BoneSlotMap) -> usize {
        self.entries.push(LibraryEntry {
            store: store.into(),
            slots,
        });
        self.entries.len() - 1
    }

    /// Builds and registers a clip. On error nothing is registered.
    pub fn push_builder(&mut self, builder: ClipBuilder) -> Result<usize> {
        let (store, slots) = builder.build()?;
        Ok(self.push(store, slots))
    }

    /// Builds and registers a serialized clip. On error nothing is registered.
    pub fn push_source(&mut self, source: ClipSource) -> Result<usize> {
        let (store, slots) = source.build()?;
        Ok(self.push(store, slots))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn clip(&self, index: usize) -> Option<&Arc<ClipStore>> {
        self.entries.get(index).map(|e| &e.store)
    }

    #[inline]
    #[must_use]
    pub fn slot_map(&self, index: usize) -> Option<&BoneSlotMap> {
        self.entries.get(index).map(|e| &e.slots)
    }

    /// Finds a clip index by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.store.name() == name)
    }

    pub fn clips(&self) -> impl Iterator<Item = &Arc<ClipStore>> {
        self.entries.iter().map(|e| &e.store)
    }

    pub fn slot_maps(&self) -> impl Iterator<Item = &BoneSlotMap> {
        self.entries.iter().map(|e| &e.slots)
    }
}
