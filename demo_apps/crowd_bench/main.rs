//! Crowd benchmark
//!
//! Spawns rows of identical characters, each a chain of bones animated by a
//! shared clip library, and runs the full tick (pose, drive, propagation,
//! skin) for a fixed number of frames. Every few seconds each character
//! cross-fades to the next clip.
//!
//! Usage: `crowd_bench [rows] [columns] [frames]`

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};
use slotmap::{SecondaryMap, SlotMap};

use ossa::Timer;
use ossa::prelude::*;

const BONES_PER_CHARACTER: usize = 16;
const SWITCH_INTERVAL: f32 = 2.0;
const FADE_DURATION: f32 = 0.3;
const FIXED_DT: f32 = 1.0 / 60.0;

const IDLE_JSON: &str = include_str!("idle.json");

struct Character {
    animator: AnimatorKey,
    root: BoneHandle,
    bones: Vec<BoneHandle>,
}

/// Gait clip: every bone in the chain swings about X, phase-shifted per bone.
fn gait_clip(name: &str, duration: f32, amplitude: f32) -> anyhow::Result<ClipBuilder> {
    const KEYS: usize = 24;
    let mut builder = ClipBuilder::new(name, duration);
    for bone in 0..BONES_PER_CHARACTER {
        let keys: Vec<(f32, Quat)> = (0..KEYS)
            .map(|k| {
                let t = duration * k as f32 / KEYS as f32;
                let phase = std::f32::consts::TAU * t / duration + bone as f32 * 0.4;
                (t, Quat::from_rotation_x(phase.sin() * amplitude))
            })
            .collect();
        builder.add_rotation_keys(&format!("bone_{bone}"), &keys)?;
    }
    Ok(builder)
}

fn build_library() -> anyhow::Result<Arc<ClipLibrary>> {
    let mut clips = ClipLibrary::new();
    clips.push_source(ClipSource::from_json(IDLE_JSON)?)?;
    clips.push_builder(gait_clip("walk", 1.2, 0.3)?)?;
    clips.push_builder(gait_clip("run", 0.7, 0.6)?)?;
    log::info!("Clip library ready: {} clips", clips.len());
    Ok(Arc::new(clips))
}

fn parse_arg(index: usize, default: usize) -> usize {
    std::env::args()
        .nth(index)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let rows = parse_arg(1, 20);
    let columns = parse_arg(2, 50);
    let frames = parse_arg(3, 600);

    let clips = build_library()?;
    let mut world = AnimationWorld::default();
    let mut nodes: SlotMap<BoneHandle, ()> = SlotMap::with_key();
    let mut characters = Vec::with_capacity(rows * columns);
    let bind_poses: Vec<Mat4> = (0..BONES_PER_CHARACTER)
        .map(|i| Mat4::from_translation(Vec3::new(0.0, -(i as f32) * 0.1, 0.0)))
        .collect();

    for row in 0..rows {
        for column in 0..columns {
            let root = nodes.insert(());
            let bones: Vec<BoneHandle> = (0..BONES_PER_CHARACTER)
                .map(|_| nodes.insert(()))
                .collect();
            let names: HashMap<String, BoneHandle> = bones
                .iter()
                .enumerate()
                .map(|(i, &b)| (format!("bone_{i}"), b))
                .collect();

            let animator = world.spawn_animator(Arc::clone(&clips));
            world.attach(animator, &names);

            // Stagger so the crowd is not in lockstep.
            let offset = (row * columns + column) % clips.len();
            if let Some(a) = world.animator_mut(animator) {
                a.play(offset, true);
            }

            world.add_skeleton(Skeleton::new(
                format!("character_{row}_{column}"),
                root,
                bones.clone(),
                bind_poses.clone(),
            )?);
            characters.push(Character {
                animator,
                root,
                bones,
            });
        }
    }

    log::info!(
        "Spawned {} characters, {} animated bones",
        characters.len(),
        world.bones().len()
    );

    let mut timer = Timer::new();
    let mut worlds: SecondaryMap<BoneHandle, Mat4> = SecondaryMap::new();
    let mut since_switch = 0.0_f32;

    for _ in 0..frames {
        timer.tick();

        since_switch += FIXED_DT;
        if since_switch >= SWITCH_INTERVAL {
            since_switch = 0.0;
            for (_, animator) in world.animators_mut() {
                let next = (animator.state.active_clip() + 1) % animator.clips().len();
                animator.cross_fade_if_changed(next, FADE_DURATION, true);
            }
        }

        world.tick(FIXED_DT);

        // Propagate: each bone is the child of the previous one.
        for pose in world.poses_mut() {
            pose.update_local_matrix();
        }
        let locals: HashMap<BoneHandle, Mat4> = world
            .bone_poses()
            .map(|(bone, pose)| (bone, Mat4::from(*pose.local_matrix())))
            .collect();
        for (i, character) in characters.iter().enumerate() {
            let root_world = Mat4::from_translation(Vec3::new(
                (i % columns) as f32 * 2.0,
                0.0,
                (i / columns) as f32 * 2.0,
            ));
            worlds.insert(character.root, root_world);

            let mut parent = root_world;
            for bone in &character.bones {
                let local = locals.get(bone).copied().unwrap_or(Mat4::IDENTITY);
                parent *= local;
                worlds.insert(*bone, parent);
            }
        }

        world.update_skin_matrices(&worlds);
    }

    timer.tick();
    let transitioning = characters
        .iter()
        .filter_map(|c| world.animator(c.animator))
        .filter(|a| a.state.phase() == PlaybackPhase::Transitioning)
        .count();

    log::info!(
        "{frames} frames in {:.2}s ({:.1} frames/s), {transitioning} characters mid-transition",
        timer.elapsed.as_secs_f32(),
        timer.average_tps()
    );
    println!(
        "crowd_bench: {} characters x {BONES_PER_CHARACTER} bones, {:.1} frames/s",
        characters.len(),
        timer.average_tps()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_builds_and_binds_every_bone() {
        let clips = build_library().unwrap();
        assert_eq!(clips.len(), 3);
        assert_eq!(clips.clip(0).unwrap().name(), "idle");

        let mut nodes: SlotMap<BoneHandle, ()> = SlotMap::with_key();
        let names: HashMap<String, BoneHandle> = (0..BONES_PER_CHARACTER)
            .map(|i| (format!("bone_{i}"), nodes.insert(())))
            .collect();
        let bindings = Binder::bind(&names, &clips);
        assert_eq!(bindings.len(), BONES_PER_CHARACTER);
    }
}
