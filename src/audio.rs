use crate::host::Host;
use crate::overlay;
use eye_core::constants::{NOISE_AMPLITUDE, NOISE_BUFFER_SEC};
use eye_core::{white_noise, AudioCommand, AudioSource, Envelope, Error};
use std::cell::{Cell, RefCell};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// A looping buffer source feeding its own gain node.
struct Bed {
    gain: web::GainNode,
    buffer: RefCell<Option<web::AudioBuffer>>,
    // Envelope requested before the buffer finished decoding, and when
    pending: RefCell<Option<(Envelope, f64)>>,
    started: Cell<bool>,
}

impl Bed {
    fn new(ctx: &web::AudioContext, label: &str) -> anyhow::Result<Self> {
        let gain = create_gain(ctx, 0.0, label)?;
        gain.connect_with_audio_node(&ctx.destination())
            .map_err(|e| anyhow::anyhow!("{} connect: {:?}", label, e))?;
        Ok(Self {
            gain,
            buffer: RefCell::new(None),
            pending: RefCell::new(None),
            started: Cell::new(false),
        })
    }

    fn start(&self, ctx: &web::AudioContext, envelope: Envelope) {
        self.start_from(ctx, envelope, ctx.current_time());
    }

    /// Start playing with the fade-in that was requested at `requested_at`
    /// (context time); a late start joins the ramp part way through.
    fn start_from(&self, ctx: &web::AudioContext, envelope: Envelope, requested_at: f64) {
        if self.started.get() {
            return;
        }
        let buffer = self.buffer.borrow();
        let Some(buffer) = buffer.as_ref() else {
            *self.pending.borrow_mut() = Some((envelope, requested_at));
            return;
        };
        let src = match web::AudioBufferSourceNode::new(ctx) {
            Ok(s) => s,
            Err(e) => {
                log::error!("[audio] AudioBufferSourceNode error: {:?}", e);
                return;
            }
        };
        src.set_buffer(Some(buffer));
        src.set_loop(true);
        _ = src.connect_with_audio_node(&self.gain);
        let now = ctx.current_time();
        let (level, rest) = envelope.remaining((now - requested_at) as f32);
        schedule_envelope(&self.gain.gain(), level, &rest, now);
        if let Err(e) = src.start() {
            log::error!("[audio] source start error: {:?}", e);
            return;
        }
        self.started.set(true);
    }

    fn set_buffer(&self, ctx: &web::AudioContext, buffer: web::AudioBuffer) {
        *self.buffer.borrow_mut() = Some(buffer);
        let pending = self.pending.borrow_mut().take();
        if let Some((envelope, requested_at)) = pending {
            self.start_from(ctx, envelope, requested_at);
        }
    }

    fn glide(&self, ctx: &web::AudioContext, value: f32, time_constant: f32) {
        let param = self.gain.gain();
        let now = ctx.current_time();
        _ = param.cancel_scheduled_values(now);
        _ = param.set_target_at_time(value, now, time_constant as f64);
        // Still waiting on its buffer: retarget the deferred fade-in
        if let Some((envelope, _)) = self.pending.borrow_mut().as_mut() {
            *envelope = Envelope::ramp(value, envelope.duration());
        }
    }
}

/// The WebAudio side of the presentation: one context, an ambience bed loaded
/// from a URL and a generated white-noise bed.
pub struct AudioGraph {
    ctx: web::AudioContext,
    ambience: Bed,
    noise: Bed,
}

impl AudioGraph {
    pub fn new() -> anyhow::Result<Self> {
        let ctx = web::AudioContext::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let ambience = Bed::new(&ctx, "ambience")?;
        let noise = Bed::new(&ctx, "noise")?;

        let sr = ctx.sample_rate();
        let len = (sr * NOISE_BUFFER_SEC) as u32;
        let buffer = ctx
            .create_buffer(1, len, sr)
            .map_err(|e| anyhow::anyhow!("noise buffer: {:?}", e))?;
        let mut data = white_noise(len as usize, NOISE_AMPLITUDE, &mut rand::thread_rng());
        buffer
            .copy_to_channel(&mut data, 0)
            .map_err(|e| anyhow::anyhow!("noise fill: {:?}", e))?;
        noise.set_buffer(&ctx, buffer);

        log::info!("[audio] graph ready sr={} state={:?}", sr, ctx.state());
        Ok(Self {
            ctx,
            ambience,
            noise,
        })
    }

    pub async fn resume(&self) -> eye_core::Result<()> {
        let promise = self
            .ctx
            .resume()
            .map_err(|e| Error::AudioResume(format!("{:?}", e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| Error::AudioResume(format!("{:?}", e)))?;
        Ok(())
    }

    /// Fetch and decode the ambience track. Playback requested before this
    /// completes starts as soon as it does.
    pub async fn load_ambience(&self, url: &str) -> anyhow::Result<()> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let resp: web::Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| anyhow::anyhow!("fetch {}: {:?}", url, e))?
            .dyn_into()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        if !resp.ok() {
            anyhow::bail!("fetch {}: HTTP {}", url, resp.status());
        }
        let body = resp.array_buffer().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let bytes = JsFuture::from(body)
            .await
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let array: js_sys::ArrayBuffer =
            bytes.dyn_into().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let decoded = JsFuture::from(
            self.ctx
                .decode_audio_data(&array)
                .map_err(|e| anyhow::anyhow!("{:?}", e))?,
        )
        .await
        .map_err(|e| anyhow::anyhow!("decode {}: {:?}", url, e))?;
        let buffer: web::AudioBuffer =
            decoded.dyn_into().map_err(|e| anyhow::anyhow!("{:?}", e))?;
        log::info!("[audio] ambience loaded ({:.1}s)", buffer.duration());
        self.ambience.set_buffer(&self.ctx, buffer);
        Ok(())
    }

    fn bed(&self, source: AudioSource) -> Option<&Bed> {
        match source {
            AudioSource::Ambience => Some(&self.ambience),
            AudioSource::Noise => Some(&self.noise),
            AudioSource::Video => None,
        }
    }
}

fn create_gain(
    ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> anyhow::Result<web::GainNode> {
    let g = web::GainNode::new(ctx)
        .map_err(|e| anyhow::anyhow!("{} GainNode error: {:?}", label, e))?;
    g.gain().set_value(value);
    Ok(g)
}

fn schedule_envelope(param: &web::AudioParam, from: f32, envelope: &Envelope, t0: f64) {
    _ = param.cancel_scheduled_values(t0);
    _ = param.set_value_at_time(from, t0);
    for &(at, level) in &envelope.points {
        _ = param.linear_ramp_to_value_at_time(level, t0 + at as f64);
    }
}

/// Execute commands emitted by the session against WebAudio, the media
/// element and the page.
pub fn dispatch(host: &Host, cmds: Vec<AudioCommand>) {
    for cmd in cmds {
        match cmd {
            AudioCommand::ResumeContext { attempt } => resume(host.clone(), attempt),
            AudioCommand::HideEnterScreen => overlay::hide_enter_screen(&host.document),
            AudioCommand::StartAmbience { envelope } => {
                if let Some(graph) = &host.audio {
                    graph.ambience.start(&graph.ctx, envelope);
                }
            }
            AudioCommand::StartNoise { envelope } => {
                if let Some(graph) = &host.audio {
                    graph.noise.start(&graph.ctx, envelope);
                }
            }
            AudioCommand::SetGain {
                source,
                value,
                time_constant,
            } => match source {
                AudioSource::Video => {
                    if let Some(video) = &host.video {
                        video.set_volume(value);
                    }
                }
                _ => {
                    if let Some(graph) = &host.audio {
                        if let Some(bed) = graph.bed(source) {
                            bed.glide(&graph.ctx, value, time_constant);
                        }
                    }
                }
            },
            AudioCommand::PlayVideo { volume, muted } => {
                if let Some(video) = &host.video {
                    video.play(volume, muted);
                }
            }
            AudioCommand::SetVideoMuted(muted) => {
                if let Some(video) = &host.video {
                    video.set_muted(muted);
                }
            }
            AudioCommand::ShowAudioFallback => {
                log::warn!("[audio] context did not start; showing fallback");
                overlay::show_audio_fallback(&host.document);
            }
            AudioCommand::HideAudioFallback => overlay::hide_audio_fallback(&host.document),
        }
    }
}

fn resume(host: Host, attempt: u32) {
    let Some(graph) = host.audio.clone() else {
        let now = host.now();
        log::warn!("[audio] no audio context; attempt {} failed", attempt);
        host.with_session(|s, out| s.audio.resume_failed(attempt, now, out));
        return;
    };
    log::info!("[audio] resume attempt {}", attempt);
    spawn_local(async move {
        let result = graph.resume().await;
        let now = host.now();
        match result {
            Ok(()) => {
                log::info!("[audio] context running (attempt {})", attempt);
                host.with_session(|s, out| s.audio.resume_succeeded(attempt, out));
            }
            Err(e) => {
                log::warn!("[audio] {}", e);
                host.with_session(|s, out| s.audio.resume_failed(attempt, now, out));
            }
        }
    });
}
