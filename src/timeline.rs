use std::collections::HashSet;
use glam::Mat4;
use log::{debug, warn};
use crate::animation::Animation;
use crate::scene::{Mesh, MeshHandle};

#[derive(Debug, Clone)]
pub struct TimelineEntry {
    pub target: MeshHandle,
    pub animation: Animation,
}

/// Plays a playlist of animations one after another, each driving one mesh.
///
/// The final entry is a resting pose: the timeline stops once the entry before it
/// completes, so the last entry never becomes current through `advance`.
#[derive(Debug, Clone)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    current: usize,
    animating: bool,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            current: 0,
            animating: true,
        }
    }

    pub(crate) fn push(&mut self, target: MeshHandle, animation: Animation) {
        self.entries.push(TimelineEntry { target, animation });
    }

    #[inline]
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn current_entry_index(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn set_animating(&mut self, animating: bool) {
        self.animating = animating;
    }

    /// Poses every animated mesh using the first entry that targets it.
    ///
    /// Returns the handles that were posed; later entries for the same mesh leave
    /// its transform alone.
    pub fn initialize(&mut self, meshes: &mut [Mesh]) -> HashSet<MeshHandle> {
        let mut initialized = HashSet::new();

        for entry in &mut self.entries {
            if initialized.contains(&entry.target) {
                continue;
            }
            let Some(mesh) = meshes.get_mut(entry.target.index()) else {
                warn!("Timeline entry targets missing mesh #{}", entry.target.index());
                continue;
            };
            initialized.insert(entry.target);

            let mut transform = Mat4::IDENTITY;
            entry.animation.update(0, &mut transform);
            mesh.transform = transform * Mat4::from_scale(mesh.scale);
        }

        initialized
    }

    /// Runs one tick of the current entry and moves to the next entry when it
    /// completes.
    pub fn advance(&mut self, time: u64, meshes: &mut [Mesh]) {
        if !self.animating || self.entries.is_empty() {
            return;
        }

        let entry = &mut self.entries[self.current];

        // A missing target still plays so the playlist keeps moving
        let mut transform = Mat4::IDENTITY;
        if entry.animation.update(time, &mut transform) {
            match meshes.get_mut(entry.target.index()) {
                Some(mesh) => mesh.transform = transform * Mat4::from_scale(mesh.scale),
                None => warn!("Timeline entry targets missing mesh #{}", entry.target.index()),
            }
        }

        if !entry.animation.is_active() {
            if self.current + 1 >= self.entries.len() - 1 {
                debug!("Timeline finished at entry {} ({} ms)", self.current, time);
                self.animating = false;
            } else {
                self.current += 1;
                self.entries[self.current].animation.reset(time);
                debug!("Timeline advanced to entry {} ({} ms)", self.current, time);
            }
        }
    }
}
