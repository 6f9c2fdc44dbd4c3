use crate::dom;
use crate::host::Host;
use eye_core::{pointer_ndc, InputKind};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Pointer listeners stay attached for the whole session; the unlock state
/// machine ignores input it no longer needs.
pub fn wire_pointer_handlers(host: &Host) {
    wire_pointermove(host);
    wire_unlock_listener(host, "pointerdown", InputKind::PointerDown);
    wire_unlock_listener(host, "click", InputKind::Click);
}

fn wire_pointermove(host: &Host) {
    let host = host.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let Some(window) = web::window() else {
            return;
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        let ndc = pointer_ndc(
            ev.client_x() as f32,
            ev.client_y() as f32,
            width as f32,
            height as f32,
        );
        let now = host.now();
        host.with_session(|s, out| {
            s.on_pointer_move(ndc);
            s.on_input(InputKind::PointerMove, now, out);
        });
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_unlock_listener(host: &Host, event: &str, kind: InputKind) {
    let host = host.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        let now = host.now();
        host.with_session(|s, out| s.on_input(kind, now, out));
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// Keep the canvas backing store in step with its CSS size. The frame loop
/// picks up the new size and resizes the session and renderer.
pub fn wire_window_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas = canvas.clone();
    let closure = Closure::wrap(Box::new(move || {
        let (w, h) = dom::sync_canvas_backing_size(&canvas);
        log::info!("[frame] canvas {}x{}", w, h);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
