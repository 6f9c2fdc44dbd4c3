use crate::host::Host;
use crate::{overlay, ui};
use eye_core::{key_action, InputKind, KeyAction};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_global_keydown(ev: &web::KeyboardEvent, host: &Host) {
    let now = host.now();
    host.with_session(|s, out| s.on_input(InputKind::KeyDown, now, out));

    if ev.repeat() || ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }
    let key = ev.key();
    let Some(action) = key_action(&key) else {
        return;
    };
    log::info!("[keys] {} -> {:?}", key, action);
    match action {
        KeyAction::Upload => ui::open_file_picker(&host.document),
        KeyAction::Reroll => {
            host.session.borrow_mut().reroll_colors();
        }
        KeyAction::ToggleMute => {
            let muted = host.with_session(|s, out| s.toggle_mute(out));
            overlay::update_mute_label(&host.document, muted);
        }
    }
    ev.prevent_default();
}

pub fn wire_global_keydown(host: &Host) {
    if let Some(window) = web::window() {
        let host = host.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            handle_global_keydown(&ev, &host);
        }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
