use glam::{Mat4, Vec3};
use log::debug;

/// A timed waypoint.
///
/// `duration` is the number of milliseconds spent moving from the previous frame
/// into this one. The first frame of an animation is its initial pose and its
/// duration is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub position: Vec3,
    pub duration: u32,
}

impl Frame {
    pub fn new(position: Vec3, duration: u32) -> Self {
        Self { position, duration }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Constructed but never updated or reset; behaves as a segment started at time 0.
    Uninitialized,
    Active,
    /// Ran past its last frame. Only `reset` leaves this state.
    Completed,
}

/// Linear translation path through an ordered list of frames.
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<Frame>,
    previous_frame: usize,
    current_frame: usize,
    segment_start: u64,
    state: AnimationState,
}

impl Animation {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            previous_frame: 0,
            current_frame: 1,
            segment_start: 0,
            state: AnimationState::Uninitialized,
        }
    }

    pub fn add_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    #[inline]
    pub fn previous_frame_index(&self) -> usize {
        self.previous_frame
    }

    #[inline]
    pub fn current_frame_index(&self) -> usize {
        self.current_frame
    }

    #[inline]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Sum of all transition durations, i.e. every frame after the first.
    pub fn total_duration(&self) -> u64 {
        self.frames.iter().skip(1).map(|f| f.duration as u64).sum()
    }

    /// An animation with fewer than two frames has nothing to move between and is
    /// never active.
    pub fn is_active(&self) -> bool {
        self.frames.len() >= 2 && self.state != AnimationState::Completed
    }

    /// Advances the animation to `time` and post-multiplies the interpolated
    /// translation onto `transform`.
    ///
    /// Returns `false` without touching `transform` once the animation has run out
    /// of frames. When a segment finishes, the cursor moves to the next segment and
    /// this tick interpolates it with the elapsed time measured against the old
    /// segment's start.
    pub fn update(&mut self, time: u64, transform: &mut Mat4) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = AnimationState::Active;

        let elapsed = time.saturating_sub(self.segment_start);

        if elapsed > self.frames[self.current_frame].duration as u64 {
            if self.current_frame + 1 >= self.frames.len() {
                debug!("Animation completed at {} ms", time);
                self.state = AnimationState::Completed;
                return false;
            }

            self.previous_frame += 1;
            self.current_frame += 1;
            self.segment_start = time;
            debug!(
                "Animation switched to segment {} -> {} at {} ms",
                self.previous_frame, self.current_frame, time
            );
        }

        debug_assert!(self.current_frame < self.frames.len());
        let previous = self.frames[self.previous_frame];
        let current = self.frames[self.current_frame];

        let p = if current.duration == 0 {
            1.0
        } else {
            (elapsed as f32 / current.duration as f32).clamp(0.0, 1.0)
        };

        let offset = previous.position.lerp(current.position, p);
        *transform *= Mat4::from_translation(offset);

        true
    }

    pub fn reset(&mut self, time: u64) {
        self.previous_frame = 0;
        self.current_frame = 1;
        self.segment_start = time;
        self.state = AnimationState::Active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_frames() -> Animation {
        Animation::new(vec![
            Frame::new(Vec3::new(0.0, -1.0, 0.0), 0),
            Frame::new(Vec3::new(0.0, 5.0, 0.0), 1000),
            Frame::new(Vec3::new(0.0, 5.0, 5.0), 500),
        ])
    }

    fn translation_at(animation: &mut Animation, time: u64) -> Option<Vec3> {
        let mut transform = Mat4::IDENTITY;
        animation
            .update(time, &mut transform)
            .then(|| transform.w_axis.truncate())
    }

    #[test]
    fn single_frame_never_applies() {
        let mut animation = Animation::new(vec![Frame::new(Vec3::ONE, 0)]);
        assert!(!animation.is_active());

        let mut transform = Mat4::IDENTITY;
        for time in [0, 10, 10_000] {
            assert!(!animation.update(time, &mut transform));
            assert!(!animation.is_active());
        }
        assert_eq!(transform, Mat4::IDENTITY);

        animation.reset(50);
        assert!(!animation.is_active());
        assert!(!animation.update(60, &mut transform));
    }

    #[test]
    fn interpolates_first_segment() {
        let mut animation = three_frames();
        animation.reset(0);

        let start = translation_at(&mut animation, 0).unwrap();
        assert!(start.abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-6));

        let middle = translation_at(&mut animation, 500).unwrap();
        assert!(middle.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));

        let end = translation_at(&mut animation, 1000).unwrap();
        assert!(end.abs_diff_eq(Vec3::new(0.0, 5.0, 0.0), 1e-6));
        assert_eq!(animation.current_frame_index(), 1);
    }

    #[test]
    fn switch_tick_uses_stale_elapsed() {
        let mut animation = three_frames();
        animation.reset(0);
        translation_at(&mut animation, 1000).unwrap();

        // 1001 ms elapsed against a 500 ms segment clamps to the segment's end
        let switched = translation_at(&mut animation, 1001).unwrap();
        assert_eq!(animation.previous_frame_index(), 1);
        assert_eq!(animation.current_frame_index(), 2);
        assert!(animation.is_active());
        assert!(switched.abs_diff_eq(Vec3::new(0.0, 5.0, 5.0), 1e-6));

        // Later ticks measure from the switch time
        let middle = translation_at(&mut animation, 1251).unwrap();
        assert!(middle.abs_diff_eq(Vec3::new(0.0, 5.0, 2.5), 1e-6));
    }

    #[test]
    fn completes_after_last_segment() {
        let mut animation = three_frames();
        animation.reset(0);
        translation_at(&mut animation, 1001).unwrap();
        translation_at(&mut animation, 1501).unwrap();
        assert_eq!(animation.state(), AnimationState::Active);

        assert!(translation_at(&mut animation, 1502).is_none());
        assert_eq!(animation.state(), AnimationState::Completed);
        assert!(!animation.is_active());

        // Terminal until reset
        assert!(translation_at(&mut animation, 5000).is_none());
        assert_eq!(animation.current_frame_index(), 2);

        animation.reset(6000);
        assert!(animation.is_active());
        assert_eq!(animation.previous_frame_index(), 0);
        assert_eq!(animation.current_frame_index(), 1);
        let restarted = translation_at(&mut animation, 6000).unwrap();
        assert!(restarted.abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-6));
    }

    #[test]
    fn uninitialized_starts_at_time_zero() {
        let mut animation = three_frames();
        assert_eq!(animation.state(), AnimationState::Uninitialized);
        assert!(animation.is_active());

        let pose = translation_at(&mut animation, 0).unwrap();
        assert!(pose.abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-6));
        assert_eq!(animation.state(), AnimationState::Active);
    }

    #[test]
    fn appends_to_existing_transform() {
        let mut animation = three_frames();
        animation.reset(0);

        let mut transform = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        assert!(animation.update(1000, &mut transform));
        let translation = transform.w_axis.truncate();
        assert!(translation.abs_diff_eq(Vec3::new(1.0, 5.0, 0.0), 1e-6));
    }

    #[test]
    fn repeated_and_backwards_time_is_stable() {
        let mut animation = three_frames();
        animation.reset(100);

        let first = translation_at(&mut animation, 600).unwrap();
        let again = translation_at(&mut animation, 600).unwrap();
        assert_eq!(first, again);

        let backwards = translation_at(&mut animation, 50).unwrap();
        assert!(backwards.abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-6));
        assert_eq!(animation.previous_frame_index(), 0);
        assert_eq!(animation.current_frame_index(), 1);
    }

    #[test]
    fn fraction_stays_within_segment() {
        let mut animation = three_frames();
        animation.reset(0);
        let mut last_index = animation.current_frame_index();

        for time in [0u64, 300, 200, 900, 1200, 1100, 1300, 1900, 1800] {
            if let Some(t) = translation_at(&mut animation, time) {
                let previous = animation.frames()[animation.previous_frame_index()].position;
                let current = animation.frames()[animation.current_frame_index()].position;
                let lo = previous.min(current) - Vec3::splat(1e-5);
                let hi = previous.max(current) + Vec3::splat(1e-5);
                assert!(t.cmpge(lo).all() && t.cmple(hi).all());
            }
            assert!(animation.current_frame_index() >= last_index);
            last_index = animation.current_frame_index();
        }
    }

    #[test]
    fn zero_duration_fast_forwards() {
        let mut animation = Animation::new(vec![
            Frame::new(Vec3::ZERO, 0),
            Frame::new(Vec3::X, 0),
            Frame::new(Vec3::Y, 0),
        ]);
        animation.reset(0);

        let snapped = translation_at(&mut animation, 0).unwrap();
        assert_eq!(snapped, Vec3::X);

        let next = translation_at(&mut animation, 1).unwrap();
        assert_eq!(next, Vec3::Y);
        assert!(translation_at(&mut animation, 2).is_none());
    }

    #[test]
    fn add_frame_extends_path() {
        let mut animation = Animation::new(vec![Frame::new(Vec3::ZERO, 0)]);
        assert!(!animation.is_active());

        animation.add_frame(Frame::new(Vec3::X, 100));
        animation.add_frame(Frame::new(Vec3::Y, 250));
        assert!(animation.is_active());
        assert_eq!(animation.total_duration(), 350);
    }
}
