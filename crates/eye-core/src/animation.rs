//! Keyframe clip playback for loaded models.

use crate::scene::{Pose, Scene};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    ScaleY,
    RotationX,
    RotationY,
}

impl Channel {
    fn write(self, pose: &mut Pose, value: f32) {
        match self {
            Channel::ScaleY => pose.scale_y = value,
            Channel::RotationX => pose.rotation_x = value,
            Channel::RotationY => pose.rotation_y = value,
        }
    }
}

/// `(time_sec, value)` pairs, sorted by time.
#[derive(Clone, Debug)]
pub struct Track {
    pub target: String,
    pub channel: Channel,
    pub keys: Vec<(f32, f32)>,
}

impl Track {
    pub fn new(target: impl Into<String>, channel: Channel, keys: Vec<(f32, f32)>) -> Self {
        Self {
            target: target.into(),
            channel,
            keys,
        }
    }

    /// Linear interpolation, holding the first/last key outside the range.
    pub fn sample(&self, t: f32) -> Option<f32> {
        let first = self.keys.first()?;
        if t <= first.0 {
            return Some(first.1);
        }
        for pair in self.keys.windows(2) {
            let (t0, v0) = pair[0];
            let (t1, v1) = pair[1];
            if t <= t1 {
                let span = t1 - t0;
                if span <= f32::EPSILON {
                    return Some(v1);
                }
                return Some(v0 + (v1 - v0) * ((t - t0) / span));
            }
        }
        self.keys.last().map(|k| k.1)
    }
}

#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

#[derive(Clone, Debug)]
struct ClipAction {
    clip: AnimationClip,
    time: f32,
}

/// Plays clips in a loop and writes sampled channels into mesh poses.
#[derive(Clone, Debug, Default)]
pub struct AnimationMixer {
    actions: Vec<ClipAction>,
}

impl AnimationMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start every clip from time zero.
    pub fn play_all(&mut self, clips: impl IntoIterator<Item = AnimationClip>) {
        for clip in clips {
            log::info!("[model] play clip '{}' ({:.2}s)", clip.name, clip.duration);
            self.actions.push(ClipAction { clip, time: 0.0 });
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clip_time(&self, name: &str) -> Option<f32> {
        self.actions
            .iter()
            .find(|a| a.clip.name == name)
            .map(|a| a.time)
    }

    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        let dt = dt.max(0.0);
        for action in &mut self.actions {
            let duration = action.clip.duration;
            action.time = if duration > 0.0 {
                (action.time + dt) % duration
            } else {
                0.0
            };
            for track in &action.clip.tracks {
                let (Some(id), Some(value)) = (scene.find(&track.target), track.sample(action.time))
                else {
                    continue;
                };
                if let Some(mesh) = scene.mesh_mut(id) {
                    track.channel.write(&mut mesh.pose, value);
                }
            }
        }
    }
}
