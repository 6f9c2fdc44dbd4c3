//! Session configuration. Defaults come from `constants.rs`; a page can
//! override a few knobs through its URL query string, e.g.
//! `?palette=16&unlock=click&seed=7&muted=1`.

use crate::applicator::Finish;
use crate::audio::AudioConfig;
use crate::constants::{IRIS_METALNESS, IRIS_ROUGHNESS, IRIS_TARGET_SUBSTRING, PALETTE_SIZE};
use crate::modulator::{DriftConfig, FlickerConfig, GrainConfig};
use crate::unlock::{ResumePolicy, UnlockTrigger};

#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub palette_size: usize,
    pub color_target: String,
    pub finish: Option<Finish>,
    pub unlock_trigger: UnlockTrigger,
    pub resume_policy: ResumePolicy,
    pub audio: AudioConfig,
    pub start_muted: bool,
    pub flicker: FlickerConfig,
    pub grain: GrainConfig,
    pub drift: DriftConfig,
    /// Fixed seed for reproducible sessions; entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            palette_size: PALETTE_SIZE,
            color_target: IRIS_TARGET_SUBSTRING.to_string(),
            finish: Some(Finish {
                roughness: IRIS_ROUGHNESS,
                metalness: IRIS_METALNESS,
            }),
            unlock_trigger: UnlockTrigger::first_interaction(),
            resume_policy: ResumePolicy::default(),
            audio: AudioConfig::first_interaction(),
            start_muted: false,
            flicker: FlickerConfig::default(),
            grain: GrainConfig::default(),
            drift: DriftConfig::default(),
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Defaults with overrides from a `?key=value&...` string. Values are
    /// percent-decoded. Unknown keys are ignored; malformed values are logged
    /// and skipped.
    pub fn from_query(query: &str) -> Self {
        let mut config = Self::default();
        let query = query.trim_start_matches('?');
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
            // `+` is a space in form-encoded queries
            let raw = raw.replace('+', " ");
            match urlencoding::decode(&raw) {
                Ok(value) => config.apply(key, &value),
                Err(_) => log::warn!("[config] ignoring {}: not valid UTF-8", key),
            }
        }
        config
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "palette" => match value.parse::<usize>() {
                Ok(n) if n > 0 => self.palette_size = n,
                _ => log::warn!("[config] ignoring palette={}", value),
            },
            "target" if !value.is_empty() => self.color_target = value.to_string(),
            "unlock" => match value {
                "click" => {
                    self.unlock_trigger = UnlockTrigger::click_to_enter();
                    self.audio = AudioConfig::click_to_enter();
                }
                "any" | "interaction" => {
                    self.unlock_trigger = UnlockTrigger::first_interaction();
                    self.audio = AudioConfig::first_interaction();
                }
                _ => log::warn!("[config] ignoring unlock={}", value),
            },
            "seed" => match value.parse::<u64>() {
                Ok(s) => self.seed = Some(s),
                Err(_) => log::warn!("[config] ignoring seed={}", value),
            },
            "muted" => self.start_muted = matches!(value, "" | "1" | "true" | "yes"),
            "finish" => {
                if value == "off" {
                    self.finish = None;
                }
            }
            _ => {}
        }
    }
}
