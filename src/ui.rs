use crate::dom;
use crate::host::Host;
use crate::overlay;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

const IMAGE_INPUT_ID: &str = "image-input";

fn image_input(document: &web::Document) -> Option<web::HtmlInputElement> {
    document
        .get_element_by_id(IMAGE_INPUT_ID)?
        .dyn_into::<web::HtmlInputElement>()
        .ok()
}

pub fn open_file_picker(document: &web::Document) {
    match image_input(document) {
        Some(input) => input.click(),
        None => log::warn!("[palette] no #{} on page", IMAGE_INPUT_ID),
    }
}

/// Buttons, the hidden file input and the audio fallback control.
pub fn wire_controls(host: &Host) {
    let doc = host.document.clone();

    let d = doc.clone();
    dom::add_click_listener(&doc, "upload-image", move || open_file_picker(&d));

    let h = host.clone();
    dom::add_click_listener(&doc, "reroll-colors", move || {
        let n = h.session.borrow_mut().reroll_colors();
        log::info!("[palette] re-rolled {} meshes", n);
    });

    let h = host.clone();
    dom::add_click_listener(&doc, "mute-button", move || {
        let muted = h.with_session(|s, out| s.toggle_mute(out));
        overlay::update_mute_label(&h.document, muted);
    });

    let h = host.clone();
    dom::add_click_listener(&doc, "audio-fallback", move || {
        let now = h.now();
        log::info!("[audio] fallback pressed");
        h.with_session(|s, out| s.audio.retry_now(now, out));
    });

    overlay::update_mute_label(&doc, host.session.borrow().audio.is_muted());
    wire_file_input(host);
}

fn wire_file_input(host: &Host) {
    let Some(input) = image_input(&host.document) else {
        return;
    };
    let host = host.clone();
    let input_for_change = input.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        let Some(file) = input_for_change.files().and_then(|f| f.get(0)) else {
            return;
        };
        // Allow picking the same file again
        input_for_change.set_value("");
        let host = host.clone();
        spawn_local(async move {
            let bytes = match read_file_bytes(&file).await {
                Ok(b) => b,
                Err(e) => {
                    log::error!("[palette] read {}: {:?}", file.name(), e);
                    return;
                }
            };
            let result = host.session.borrow_mut().upload_image(&bytes);
            match result {
                Ok(n) => log::info!("[palette] {} recolored {} meshes", file.name(), n),
                Err(e) => log::warn!("[palette] {}: {}", file.name(), e),
            }
        });
    }) as Box<dyn FnMut(_)>);
    _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}

async fn read_file_bytes(file: &web::File) -> anyhow::Result<Vec<u8>> {
    let buf = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}
