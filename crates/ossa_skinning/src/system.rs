use ossa_core::SkinKey;
use slotmap::SlotMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::skeleton::Skeleton;
use crate::world::WorldTransformSource;

/// Skin stage: rebuilds the skin matrices of every skeleton.
///
/// Each skeleton only writes its own buffer, so skeletons are processed
/// independently; with the `parallel` feature and at least `parallel_min_len`
/// skeletons the work is spread over the rayon pool.
pub struct SkinningSystem;

impl SkinningSystem {
    /// Returns the number of skeletons whose root could be resolved.
    pub fn update<W>(
        skeletons: &mut SlotMap<SkinKey, Skeleton>,
        world: &W,
        parallel_min_len: usize,
    ) -> usize
    where
        W: WorldTransformSource + Sync,
    {
        #[cfg(feature = "parallel")]
        if skeletons.len() >= parallel_min_len {
            return skeletons
                .values_mut()
                .par_bridge()
                .map(|skeleton| usize::from(skeleton.compute_skin_matrices(world)))
                .sum();
        }

        #[cfg(not(feature = "parallel"))]
        let _ = parallel_min_len;

        skeletons
            .values_mut()
            .map(|skeleton| usize::from(skeleton.compute_skin_matrices(world)))
            .sum()
    }
}
