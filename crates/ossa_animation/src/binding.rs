use std::collections::HashMap;
use std::hash::BuildHasher;

use ossa_core::BoneHandle;
use ossa_core::interner::{self, Symbol};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::library::ClipLibrary;

/// Per-clip slot indices, inline for the common case of a handful of clips.
pub type ClipSlots = SmallVec<[Option<u32>; 8]>;

/// Maps one scene bone to its bone slot in every clip of a library.
///
/// `slots[clip]` is `None` when that clip does not animate the bone. Built once
/// when a hierarchy is attached and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoneBinding {
    pub bone: BoneHandle,
    pub slots: ClipSlots,
}

impl BoneBinding {
    #[inline]
    #[must_use]
    pub fn slot(&self, clip: usize) -> Option<usize> {
        self.slots.get(clip).copied().flatten().map(|s| s as usize)
    }
}

/// Resolves bone paths to bone handles; implemented by the host scene.
pub trait BoneResolver {
    fn resolve_bone(&self, path: &str) -> Option<BoneHandle>;
}

impl<S: BuildHasher> BoneResolver for HashMap<String, BoneHandle, S> {
    fn resolve_bone(&self, path: &str) -> Option<BoneHandle> {
        self.get(path).copied()
    }
}

pub struct Binder;

impl Binder {
    /// Builds one binding for every bone path animated by any clip in `library`.
    ///
    /// Paths the resolver cannot find are skipped. Bindings are ordered by
    /// first appearance across the clips, so the result is deterministic.
    pub fn bind(resolver: &impl BoneResolver, library: &ClipLibrary) -> Vec<BoneBinding> {
        let clip_count = library.len();
        let mut seen: FxHashSet<Symbol> = FxHashSet::default();
        let mut bindings = Vec::new();

        for slot_map in library.slot_maps() {
            for (_, symbol) in slot_map.iter() {
                if !seen.insert(symbol) {
                    continue;
                }

                let path = interner::resolve(symbol);
                let Some(bone) = resolver.resolve_bone(path) else {
                    log::warn!("Animated bone '{path}' not found in hierarchy, skipping");
                    continue;
                };

                let slots = (0..clip_count)
                    .map(|clip| {
                        library
                            .slot_map(clip)
                            .and_then(|m| m.slot_of_symbol(symbol))
                            .map(|s| s as u32)
                    })
                    .collect();

                bindings.push(BoneBinding { bone, slots });
            }
        }

        bindings
    }
}
