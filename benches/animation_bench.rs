//! Animation pipeline benchmarks
//!
//! Sampling cost for short (linear scan) and long (binary search) tracks, and
//! the full pose + drive tick over a crowd.

use std::collections::HashMap;
use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use glam::{Quat, Vec3};
use slotmap::SlotMap;

use ossa::animation::{AnimationSettings, ClipBuilder, ClipLibrary, KeyframeTrack};
use ossa::{AnimationWorld, BoneHandle};

fn rotation_track(keys: usize) -> KeyframeTrack<Quat> {
    KeyframeTrack::from_keyframes(
        (0..keys).map(|i| (i as f32 / 30.0, Quat::from_rotation_y(i as f32 * 0.05))),
    )
    .unwrap()
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("track_sampling");

    for keys in [8, 16, 64, 512] {
        let track = rotation_track(keys);
        let duration = keys as f32 / 30.0;
        group.bench_with_input(BenchmarkId::from_parameter(keys), &track, |b, track| {
            let mut t = 0.0_f32;
            b.iter(|| {
                t = (t + 0.013) % duration;
                black_box(track.sample(black_box(t), duration))
            });
        });
    }

    group.finish();
}

fn crowd_library(bones: usize) -> Arc<ClipLibrary> {
    let mut clips = ClipLibrary::new();
    for (name, phase) in [("walk", 0.0_f32), ("run", 1.0)] {
        let mut builder = ClipBuilder::new(name, 1.0);
        for bone in 0..bones {
            let path = format!("bone_{bone}");
            let rotations: Vec<(f32, Quat)> = (0..31)
                .map(|k| {
                    let t = k as f32 / 30.0;
                    (t, Quat::from_rotation_x((t * 6.0 + phase + bone as f32).sin() * 0.4))
                })
                .collect();
            builder
                .add_rotation_keys(&path, &rotations)
                .unwrap()
                .add_position_keys(&path, &[(0.0, Vec3::ZERO), (0.5, Vec3::Y * 0.1)])
                .unwrap();
        }
        clips.push_builder(builder).unwrap();
    }
    Arc::new(clips)
}

fn bench_crowd_tick(c: &mut Criterion) {
    const BONES: usize = 24;
    let clips = crowd_library(BONES);
    let mut group = c.benchmark_group("crowd_tick");

    for instances in [64, 1024] {
        let mut world = AnimationWorld::new(AnimationSettings::default());
        let mut nodes: SlotMap<BoneHandle, ()> = SlotMap::with_key();

        for i in 0..instances {
            let names: HashMap<String, BoneHandle> = (0..BONES)
                .map(|b| (format!("bone_{b}"), nodes.insert(())))
                .collect();
            let key = world.spawn_animator(Arc::clone(&clips));
            world.attach(key, &names);
            if i % 2 == 1
                && let Some(animator) = world.animator_mut(key)
            {
                animator.cross_fade(1, 0.5, true);
            }
        }

        group.bench_function(BenchmarkId::from_parameter(instances), |b| {
            b.iter(|| world.tick(black_box(1.0 / 60.0)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sampling, bench_crowd_tick);
criterion_main!(benches);
