//! Playback and cross-fade state machine.
//!
//! Each animated instance owns one [`PlaybackState`]. It holds up to two
//! active clips in a fixed two-slot array: slot [`CURRENT`] is the clip being
//! played (or faded out), slot [`NEXT`] is the clip being faded in while a
//! transition is running.
//!
//! ```text
//!            play                      cross_fade
//!   Idle ───────────▶ Playing ────────────────────▶ Transitioning
//!    ▲                 │  ▲                            │    │
//!    └──── pause ──────┘  └─── transition resolves ────┘    │
//!                         ◀────────────── play ─────────────┘
//! ```
//!
//! Runtime selectors never fail: an out-of-range clip index leaves the state
//! untouched and is reported through `log::debug!`.

use crate::clip::ClipStore;
use crate::library::ClipLibrary;
use crate::sampler::WrapMode;

/// Index of the current clip in [`PlaybackState::slots`].
pub const CURRENT: usize = 0;
/// Index of the incoming clip in [`PlaybackState::slots`].
pub const NEXT: usize = 1;

/// Time-advance state of one playing clip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipPlayback {
    pub clip: usize,
    pub elapsed: f32,
    pub duration: f32,
    pub speed: f32,
    pub looping: bool,
}

impl ClipPlayback {
    #[must_use]
    pub fn start(clip: usize, store: &ClipStore, looping: bool) -> Self {
        Self {
            clip,
            elapsed: 0.0,
            duration: store.duration(),
            speed: store.default_speed(),
            looping,
        }
    }

    #[inline]
    #[must_use]
    pub fn wrap_mode(&self) -> WrapMode {
        if self.looping {
            WrapMode::Loop
        } else {
            WrapMode::Clamp
        }
    }

    /// Elapsed time as a fraction of the clip duration.
    #[must_use]
    pub fn normalized_time(&self) -> f32 {
        if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            0.0
        }
    }

    /// True once a non-looping clip has reached its end.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !self.looping && self.elapsed >= self.duration
    }

    #[inline]
    fn advance(&mut self, clip_dt: f32) {
        if self.duration <= 0.0 {
            return;
        }
        self.elapsed += clip_dt * self.speed;

        if self.looping {
            // rem_euclid keeps reverse playback positive; it can round up to
            // exactly `duration` for tiny negative inputs.
            let wrapped = self.elapsed.rem_euclid(self.duration);
            self.elapsed = if wrapped < self.duration { wrapped } else { 0.0 };
        } else {
            self.elapsed = self.elapsed.clamp(0.0, self.duration);
        }
    }
}

/// Observable state of a [`PlaybackState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Playing,
    Transitioning,
}

/// Per-instance playback state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    slots: [ClipPlayback; 2],
    in_transition: bool,
    transition_elapsed: f32,
    transition_duration: f32,
    playing: bool,
    /// Scales clip-time advance of both slots. Transition time is unaffected.
    pub speed_multiplier: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackState {
    /// An idle state with no clip assigned.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: [ClipPlayback::default(); 2],
            in_transition: false,
            transition_elapsed: 0.0,
            transition_duration: 0.0,
            playing: false,
            speed_multiplier: 1.0,
        }
    }

    /// A state already playing clip 0 on loop, or idle if `clips` is empty.
    #[must_use]
    pub fn autoplay(clips: &ClipLibrary) -> Self {
        let mut state = Self::new();
        state.play(clips, 0, true);
        state
    }

    // ========================================================================
    // Selectors
    // ========================================================================

    /// Starts `index` from the beginning, cancelling any transition.
    ///
    /// Returns `false` (and changes nothing) if `index` is out of range.
    pub fn play(&mut self, clips: &ClipLibrary, index: usize, looping: bool) -> bool {
        let Some(store) = clips.clip(index) else {
            log::debug!("play: clip index {index} out of range ({} clips)", clips.len());
            return false;
        };

        self.slots[CURRENT] = ClipPlayback::start(index, store, looping);
        self.playing = true;
        self.clear_transition();
        true
    }

    /// Starts fading `index` in over `duration` seconds while the current clip
    /// keeps playing and fades out.
    ///
    /// A non-positive or non-finite `duration`, or a state that has never been
    /// given a clip, switches immediately as [`play`](Self::play) does.
    /// Returns `false` (and changes nothing) if `index` is out of range.
    pub fn cross_fade(
        &mut self,
        clips: &ClipLibrary,
        index: usize,
        duration: f32,
        looping: bool,
    ) -> bool {
        let Some(store) = clips.clip(index) else {
            log::debug!(
                "cross_fade: clip index {index} out of range ({} clips)",
                clips.len()
            );
            return false;
        };

        if !(duration.is_finite() && duration > 0.0) || !self.has_clip() {
            return self.play(clips, index, looping);
        }

        self.slots[NEXT] = ClipPlayback::start(index, store, looping);
        self.in_transition = true;
        self.transition_duration = duration;
        self.transition_elapsed = 0.0;
        self.playing = true;
        true
    }

    /// Like [`cross_fade`](Self::cross_fade), but does nothing if `index` is
    /// already the active clip (the incoming clip while transitioning).
    pub fn cross_fade_if_changed(
        &mut self,
        clips: &ClipLibrary,
        index: usize,
        duration: f32,
        looping: bool,
    ) -> bool {
        if self.has_clip() && self.active_clip() == index {
            return false;
        }
        self.cross_fade(clips, index, duration, looping)
    }

    /// Freezes all counters; subsequent drive steps are no-ops.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Continues from where [`pause`](Self::pause) stopped. Does nothing if no
    /// clip has ever been played.
    pub fn resume(&mut self) {
        if self.has_clip() {
            self.playing = true;
        }
    }

    // ========================================================================
    // Drive step
    // ========================================================================

    /// Advances playback by `dt` seconds. Called once per tick, after the pose
    /// stage has sampled the pre-advance state.
    pub fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }

        let clip_dt = dt * self.speed_multiplier;
        self.slots[CURRENT].advance(clip_dt);

        if !self.in_transition {
            return;
        }

        self.slots[NEXT].advance(clip_dt);
        self.transition_elapsed += dt;

        if self.transition_elapsed >= self.transition_duration {
            self.slots[CURRENT] = self.slots[NEXT];
            self.clear_transition();
        } else if self.transition_elapsed < 0.0 {
            self.transition_elapsed = 0.0;
        }
    }

    fn clear_transition(&mut self) {
        self.in_transition = false;
        self.transition_elapsed = 0.0;
        self.transition_duration = 0.0;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn phase(&self) -> PlaybackPhase {
        match (self.playing, self.in_transition) {
            (false, _) => PlaybackPhase::Idle,
            (true, false) => PlaybackPhase::Playing,
            (true, true) => PlaybackPhase::Transitioning,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[inline]
    #[must_use]
    pub fn in_transition(&self) -> bool {
        self.in_transition
    }

    /// Whether a clip has ever been assigned.
    #[inline]
    #[must_use]
    pub fn has_clip(&self) -> bool {
        self.slots[CURRENT].duration > 0.0
    }

    #[inline]
    #[must_use]
    pub fn current(&self) -> &ClipPlayback {
        &self.slots[CURRENT]
    }

    /// The incoming clip, only while transitioning.
    #[inline]
    #[must_use]
    pub fn next(&self) -> Option<&ClipPlayback> {
        self.in_transition.then(|| &self.slots[NEXT])
    }

    /// The clips contributing to the pose: one, or two while transitioning.
    #[inline]
    #[must_use]
    pub fn active_slots(&self) -> &[ClipPlayback] {
        if self.in_transition {
            &self.slots
        } else {
            &self.slots[..1]
        }
    }

    /// The clip the instance is playing or heading to.
    #[inline]
    #[must_use]
    pub fn active_clip(&self) -> usize {
        if self.in_transition {
            self.slots[NEXT].clip
        } else {
            self.slots[CURRENT].clip
        }
    }

    #[inline]
    #[must_use]
    pub fn transition_elapsed(&self) -> f32 {
        self.transition_elapsed
    }

    #[inline]
    #[must_use]
    pub fn transition_duration(&self) -> f32 {
        self.transition_duration
    }

    /// Blend weight of the incoming clip in `[0, 1]`; `1.0` if the stored
    /// transition duration is not positive.
    #[inline]
    #[must_use]
    pub fn transition_progress(&self) -> f32 {
        if !self.in_transition {
            return 0.0;
        }
        if self.transition_duration > 0.0 {
            (self.transition_elapsed / self.transition_duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ClipBuilder;
    use glam::Vec3;

    fn library() -> ClipLibrary {
        let mut library = ClipLibrary::new();
        for (name, duration, speed) in [("idle", 2.0, 1.0), ("run", 1.0, 2.0)] {
            let mut builder = ClipBuilder::new(name, duration).speed(speed);
            builder
                .add_position_keys("root", &[(0.0, Vec3::ZERO)])
                .unwrap();
            library.push_builder(builder).unwrap();
        }
        library
    }

    #[test]
    fn play_resets_current_slot() {
        let clips = library();
        let mut state = PlaybackState::new();
        assert_eq!(state.phase(), PlaybackPhase::Idle);

        assert!(state.play(&clips, 1, false));
        assert_eq!(state.phase(), PlaybackPhase::Playing);
        assert_eq!(
            *state.current(),
            ClipPlayback {
                clip: 1,
                elapsed: 0.0,
                duration: 1.0,
                speed: 2.0,
                looping: false
            }
        );
    }

    #[test]
    fn play_cancels_transition() {
        let clips = library();
        let mut state = PlaybackState::autoplay(&clips);
        state.cross_fade(&clips, 1, 0.5, true);
        assert!(state.in_transition());

        state.play(&clips, 0, true);
        assert!(!state.in_transition());
        assert_eq!(state.transition_duration(), 0.0);
    }

    #[test]
    fn loop_wraps_and_once_clamps() {
        let clips = library();
        let mut state = PlaybackState::new();
        state.play(&clips, 0, true);
        state.advance(2.5);
        assert!((state.current().elapsed - 0.5).abs() < 1e-6);

        state.play(&clips, 0, false);
        state.advance(5.0);
        assert_eq!(state.current().elapsed, 2.0);
        assert!(state.current().is_finished());
    }

    #[test]
    fn reverse_loop_stays_in_range() {
        let clips = library();
        let mut state = PlaybackState::autoplay(&clips);
        state.speed_multiplier = -1.0;
        state.advance(0.5);
        assert!((state.current().elapsed - 1.5).abs() < 1e-6);
    }

    #[test]
    fn cross_fade_keeps_current_fields() {
        let clips = library();
        let mut state = PlaybackState::autoplay(&clips);
        state.advance(0.75);
        let before = *state.current();

        assert!(state.cross_fade(&clips, 1, 1.0, true));
        assert_eq!(*state.current(), before);
        assert_eq!(state.next().map(|n| n.clip), Some(1));
        assert_eq!(state.transition_elapsed(), 0.0);
        assert_eq!(state.active_slots().len(), 2);
    }

    #[test]
    fn zero_duration_cross_fade_snaps() {
        let clips = library();
        let mut state = PlaybackState::autoplay(&clips);
        assert!(state.cross_fade(&clips, 1, 0.0, true));
        assert!(!state.in_transition());
        assert_eq!(state.current().clip, 1);
    }

    #[test]
    fn cross_fade_from_idle_plays() {
        let clips = library();
        let mut state = PlaybackState::new();
        assert!(state.cross_fade(&clips, 1, 0.3, true));
        assert_eq!(state.phase(), PlaybackPhase::Playing);
        assert_eq!(state.current().clip, 1);
    }

    #[test]
    fn cross_fade_if_changed_ignores_active_clip() {
        let clips = library();
        let mut state = PlaybackState::autoplay(&clips);
        assert!(!state.cross_fade_if_changed(&clips, 0, 0.5, true));
        assert!(!state.in_transition());

        assert!(state.cross_fade_if_changed(&clips, 1, 0.5, true));
        state.advance(0.1);
        let snapshot = state.clone();
        assert!(!state.cross_fade_if_changed(&clips, 1, 0.5, true));
        assert_eq!(state, snapshot);
    }

    #[test]
    fn resume_continues_after_pause() {
        let clips = library();
        let mut state = PlaybackState::autoplay(&clips);
        state.advance(0.5);
        state.pause();
        state.advance(0.5);
        assert!((state.current().elapsed - 0.5).abs() < 1e-6);

        state.resume();
        state.advance(0.25);
        assert!((state.current().elapsed - 0.75).abs() < 1e-6);
    }

    #[test]
    fn resume_without_clip_stays_idle() {
        let mut state = PlaybackState::new();
        state.resume();
        assert_eq!(state.phase(), PlaybackPhase::Idle);
    }
}
