#![cfg(target_arch = "wasm32")]
use eye_core::constants::{AMBIENCE_URL, EYE_MODEL_NAME};
use eye_core::{BuiltinModels, ModelLoader, Session, SessionConfig, UnlockTrigger};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod dom;
mod events;
mod frame;
mod host;
mod overlay;
mod render;
mod ui;
mod video;

use host::Host;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("eye-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let config = SessionConfig::from_query(&dom::location_query());
    log::info!(
        "[config] palette={} target={} unlock={:?} seed={:?} muted={}",
        config.palette_size,
        config.color_target,
        config.unlock_trigger,
        config.seed,
        config.start_muted
    );
    if matches!(config.unlock_trigger, UnlockTrigger::Only(_)) {
        overlay::show_enter_screen(&document);
    } else {
        overlay::hide_enter_screen(&document);
    }
    overlay::hide_audio_fallback(&document);

    // Audio is optional: without a context the page still renders and the
    // unlock attempts fail through to the fallback control.
    let graph = match audio::AudioGraph::new() {
        Ok(g) => Some(Rc::new(g)),
        Err(e) => {
            log::error!("[audio] {:?}", e);
            None
        }
    };
    if let Some(g) = graph.clone() {
        spawn_local(async move {
            if let Err(e) = g.load_ambience(AMBIENCE_URL).await {
                log::error!("[audio] {:?}", e);
            }
        });
    }
    let video = video::VideoAudio::find(&document);

    let host = Host::new(Session::new(config), graph, video, document);

    events::wire_window_resize(&canvas);
    events::wire_pointer_handlers(&host);
    events::wire_global_keydown(&host);
    ui::wire_controls(&host);

    // Model resolves off the init path and lands on a later frame
    let model_host = host.clone();
    spawn_local(async move {
        let result = BuiltinModels.load(EYE_MODEL_NAME);
        model_host.session.borrow_mut().model_loaded(result);
    });

    let gpu = frame::init_gpu(&canvas).await;
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(host, canvas, gpu)));
    frame::start_loop(frame_ctx);
    Ok(())
}
