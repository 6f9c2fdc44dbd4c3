use crate::audio;
use crate::host::Host;
use crate::render::{GpuState, Headless};
use eye_core::RenderEngine;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub host: Host,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<GpuState<'a>>,
    pub headless: Headless,
    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn new(host: Host, canvas: web::HtmlCanvasElement, gpu: Option<GpuState<'a>>) -> Self {
        Self {
            host,
            canvas,
            gpu,
            headless: Headless,
            last_instant: Instant::now(),
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;
        let clock = self.host.now();

        let mut out = Vec::new();
        {
            let engine: &mut dyn RenderEngine = match &mut self.gpu {
                Some(g) => g as &mut dyn RenderEngine,
                None => &mut self.headless,
            };
            let mut session = self.host.session.borrow_mut();

            if let Some(video) = &self.host.video {
                if video.is_ready() {
                    session.audio.video_ready(&mut out);
                }
            }

            let size = (self.canvas.width(), self.canvas.height());
            if size != session.viewport() {
                session.resize(size.0, size.1, &mut *engine);
            }

            session.frame(dt_sec, clock, &mut *engine, &mut out);
        }
        audio::dispatch(&self.host, out);
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
