//! Audio orchestration: unlock gating, activation ramps, mute override and
//! external video-audio playback.
//!
//! The controller never touches a platform API. It appends [`AudioCommand`]s
//! to an output vector which the host drains and executes against its audio
//! subsystem, the same way note events leave a scheduler.

use crate::constants::{
    AMBIENCE_LEVEL, MUTE_TIME_CONSTANT_SEC, NOISE_LEVEL, VIDEO_VOLUME,
};
use crate::unlock::{AudioUnlock, InputKind, ResumePolicy, UnlockState, UnlockStep, UnlockTrigger};
use rand::Rng;
use smallvec::{smallvec, SmallVec};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioSource {
    Ambience,
    Noise,
    Video,
}

/// Gain ramp applied from the moment a source starts: gain is 0 at offset 0
/// and moves linearly through each `(offset_sec, gain)` point.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    pub points: SmallVec<[(f32, f32); 4]>,
}

impl Envelope {
    pub fn ramp(level: f32, seconds: f32) -> Self {
        Self {
            points: smallvec![(seconds, level)],
        }
    }

    pub fn final_level(&self) -> f32 {
        self.points.last().map(|p| p.1).unwrap_or(0.0)
    }

    pub fn duration(&self) -> f32 {
        self.points.last().map(|p| p.0).unwrap_or(0.0)
    }

    /// Gain at `t` seconds after start.
    pub fn value_at(&self, t: f32) -> f32 {
        let mut prev = (0.0_f32, 0.0_f32);
        for &(at, level) in &self.points {
            if t < at {
                let span = at - prev.0;
                if span <= f32::EPSILON {
                    return level;
                }
                return prev.1 + (level - prev.1) * ((t - prev.0).max(0.0) / span);
            }
            prev = (at, level);
        }
        prev.1
    }

    /// The part of the ramp still ahead `elapsed` seconds after it was
    /// requested: the level to start from, and the later points shifted so
    /// offset 0 is now. Used when a source starts after its fade-in began.
    pub fn remaining(&self, elapsed: f32) -> (f32, Envelope) {
        let elapsed = elapsed.max(0.0);
        let points = self
            .points
            .iter()
            .filter(|p| p.0 > elapsed)
            .map(|&(t, v)| (t - elapsed, v))
            .collect();
        (self.value_at(elapsed), Envelope { points })
    }

    /// Same timing with every level scaled by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            points: self.points.iter().map(|&(t, v)| (t, v * factor)).collect(),
        }
    }
}

/// Uniform white noise in `[-amplitude, amplitude]`, the looping bed under
/// the ambience.
pub fn white_noise<R: Rng + ?Sized>(len: usize, amplitude: f32, rng: &mut R) -> Vec<f32> {
    (0..len)
        .map(|_| (rng.gen::<f32>() * 2.0 - 1.0) * amplitude)
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct AudioConfig {
    pub ambience_envelope: Envelope,
    pub noise_envelope: Envelope,
    pub video_volume: f32,
    pub mute_time_constant: f32,
}

impl AudioConfig {
    /// Ramps used when audio starts on the first pointer/key interaction.
    pub fn first_interaction() -> Self {
        Self {
            ambience_envelope: Envelope::ramp(AMBIENCE_LEVEL, 4.0),
            noise_envelope: Envelope::ramp(NOISE_LEVEL, 1.0),
            video_volume: VIDEO_VOLUME,
            mute_time_constant: MUTE_TIME_CONSTANT_SEC,
        }
    }

    /// Slower ramps used behind the click-to-enter screen; the noise eases
    /// in over two steps to avoid a pop.
    pub fn click_to_enter() -> Self {
        Self {
            ambience_envelope: Envelope::ramp(AMBIENCE_LEVEL, 5.0),
            noise_envelope: Envelope {
                points: smallvec![(0.4, NOISE_LEVEL * 0.5), (1.2, NOISE_LEVEL)],
            },
            ..Self::first_interaction()
        }
    }

    pub fn level(&self, source: AudioSource) -> f32 {
        match source {
            AudioSource::Ambience => self.ambience_envelope.final_level(),
            AudioSource::Noise => self.noise_envelope.final_level(),
            AudioSource::Video => self.video_volume,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self::first_interaction()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AudioCommand {
    ResumeContext { attempt: u32 },
    HideEnterScreen,
    StartAmbience { envelope: Envelope },
    StartNoise { envelope: Envelope },
    /// Glide an already-playing source to `value` without stopping it.
    SetGain {
        source: AudioSource,
        value: f32,
        time_constant: f32,
    },
    PlayVideo { volume: f32, muted: bool },
    SetVideoMuted(bool),
    ShowAudioFallback,
    HideAudioFallback,
}

#[derive(Clone, Debug)]
pub struct AudioController {
    unlock: AudioUnlock,
    config: AudioConfig,
    muted: bool,
    video_ready: bool,
    video_playing: bool,
    fallback_shown: bool,
    entered: bool,
}

impl AudioController {
    pub fn new(trigger: UnlockTrigger, policy: ResumePolicy, config: AudioConfig) -> Self {
        Self {
            unlock: AudioUnlock::new(trigger, policy),
            config,
            muted: false,
            video_ready: false,
            video_playing: false,
            fallback_shown: false,
            entered: false,
        }
    }

    pub fn state(&self) -> UnlockState {
        self.unlock.state()
    }

    pub fn unlock(&self) -> &AudioUnlock {
        &self.unlock
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_video_playing(&self) -> bool {
        self.video_playing
    }

    pub fn handle_input(&mut self, kind: InputKind, now: f64, out: &mut Vec<AudioCommand>) {
        let step = self.unlock.handle_input(kind, now);
        if step.is_some() && !self.entered {
            self.entered = true;
            out.push(AudioCommand::HideEnterScreen);
        }
        self.push_step(step, out);
    }

    /// Fallback control pressed.
    pub fn retry_now(&mut self, now: f64, out: &mut Vec<AudioCommand>) {
        let step = self.unlock.retry_now(now);
        self.push_step(step, out);
    }

    pub fn resume_succeeded(&mut self, attempt: u32, out: &mut Vec<AudioCommand>) {
        if !self.unlock.resume_succeeded(attempt) {
            return;
        }
        let factor = if self.muted { 0.0 } else { 1.0 };
        out.push(AudioCommand::StartAmbience {
            envelope: self.config.ambience_envelope.scaled(factor),
        });
        out.push(AudioCommand::StartNoise {
            envelope: self.config.noise_envelope.scaled(factor),
        });
        if self.fallback_shown {
            self.fallback_shown = false;
            out.push(AudioCommand::HideAudioFallback);
        }
        if self.video_ready {
            self.start_video(out);
        }
    }

    pub fn resume_failed(&mut self, attempt: u32, now: f64, out: &mut Vec<AudioCommand>) {
        let step = self.unlock.resume_failed(attempt, now);
        self.push_step(step, out);
    }

    pub fn poll(&mut self, now: f64, out: &mut Vec<AudioCommand>) {
        let step = self.unlock.poll(now);
        self.push_step(step, out);
    }

    /// The external provider can play. Playback starts now if audio is
    /// active, otherwise as soon as it becomes active.
    pub fn video_ready(&mut self, out: &mut Vec<AudioCommand>) {
        if self.video_ready {
            return;
        }
        self.video_ready = true;
        log::info!("[audio] video audio ready");
        if self.state() == UnlockState::Active {
            self.start_video(out);
        }
    }

    pub fn set_muted(&mut self, muted: bool, out: &mut Vec<AudioCommand>) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        log::info!("[audio] muted={}", muted);
        if self.state() != UnlockState::Active {
            return;
        }
        for source in [AudioSource::Ambience, AudioSource::Noise] {
            out.push(AudioCommand::SetGain {
                source,
                value: self.target_gain(source),
                time_constant: self.config.mute_time_constant,
            });
        }
        if self.video_playing {
            out.push(AudioCommand::SetVideoMuted(muted));
        }
    }

    pub fn toggle_mute(&mut self, out: &mut Vec<AudioCommand>) -> bool {
        self.set_muted(!self.muted, out);
        self.muted
    }

    /// Steady-state output gain of a source given the current state.
    pub fn effective_gain(&self, source: AudioSource) -> f32 {
        let playing = match source {
            AudioSource::Video => self.video_playing,
            _ => self.state() == UnlockState::Active,
        };
        if playing {
            self.target_gain(source)
        } else {
            0.0
        }
    }

    fn target_gain(&self, source: AudioSource) -> f32 {
        if self.muted {
            0.0
        } else {
            self.config.level(source)
        }
    }

    fn start_video(&mut self, out: &mut Vec<AudioCommand>) {
        if self.video_playing {
            return;
        }
        self.video_playing = true;
        out.push(AudioCommand::PlayVideo {
            volume: self.config.video_volume,
            muted: self.muted,
        });
    }

    fn push_step(&mut self, step: Option<UnlockStep>, out: &mut Vec<AudioCommand>) {
        match step {
            Some(UnlockStep::Resume { attempt }) => {
                out.push(AudioCommand::ResumeContext { attempt });
            }
            Some(UnlockStep::Stalled) => {
                if !self.fallback_shown {
                    self.fallback_shown = true;
                    out.push(AudioCommand::ShowAudioFallback);
                }
            }
            None => {}
        }
    }
}
