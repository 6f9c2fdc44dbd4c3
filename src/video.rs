use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

const VIDEO_AUDIO_ID: &str = "video-audio";
// HTMLMediaElement.HAVE_FUTURE_DATA
const HAVE_FUTURE_DATA: u16 = 3;

/// The page's optional `<audio>`/`<video>` element carrying a second track.
#[derive(Clone)]
pub struct VideoAudio {
    el: web::HtmlMediaElement,
}

impl VideoAudio {
    pub fn find(document: &web::Document) -> Option<Self> {
        let el = document
            .get_element_by_id(VIDEO_AUDIO_ID)?
            .dyn_into::<web::HtmlMediaElement>()
            .ok()?;
        Some(Self { el })
    }

    /// Enough data buffered to start playing.
    pub fn is_ready(&self) -> bool {
        self.el.ready_state() >= HAVE_FUTURE_DATA
    }

    pub fn play(&self, volume: f32, muted: bool) {
        self.el.set_volume(volume.clamp(0.0, 1.0) as f64);
        self.el.set_muted(muted);
        self.el.set_loop(true);
        match self.el.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("[audio] video play rejected: {:?}", e);
                }
            }),
            Err(e) => log::warn!("[audio] video play error: {:?}", e),
        }
    }

    pub fn set_muted(&self, muted: bool) {
        self.el.set_muted(muted);
    }

    pub fn set_volume(&self, volume: f32) {
        self.el.set_volume(volume.clamp(0.0, 1.0) as f64);
    }
}
