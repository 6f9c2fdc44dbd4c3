use crate::dom;
use web_sys as web;

const ENTER_SCREEN_ID: &str = "enter-screen";
const AUDIO_FALLBACK_ID: &str = "audio-fallback";
const MUTE_BUTTON_ID: &str = "mute-button";

#[inline]
pub fn hide_enter_screen(document: &web::Document) {
    dom::set_hidden(document, ENTER_SCREEN_ID, true);
}

/// The enter screen is only shown when audio waits for an explicit click.
#[inline]
pub fn show_enter_screen(document: &web::Document) {
    dom::set_hidden(document, ENTER_SCREEN_ID, false);
}

#[inline]
pub fn show_audio_fallback(document: &web::Document) {
    dom::set_hidden(document, AUDIO_FALLBACK_ID, false);
}

#[inline]
pub fn hide_audio_fallback(document: &web::Document) {
    dom::set_hidden(document, AUDIO_FALLBACK_ID, true);
}

pub fn update_mute_label(document: &web::Document, muted: bool) {
    dom::set_text(document, MUTE_BUTTON_ID, if muted { "Unmute" } else { "Mute" });
}
