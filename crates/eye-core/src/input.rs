use glam::Vec2;

/// Window pixel coordinates to normalized device coordinates (x right, y up,
/// both in \[-1, 1\] inside the window).
#[inline]
pub fn pointer_ndc(client_x: f32, client_y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (client_x / width) * 2.0 - 1.0,
        -(client_y / height) * 2.0 + 1.0,
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Upload,
    Reroll,
    ToggleMute,
}

#[inline]
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "u" | "U" => Some(KeyAction::Upload),
        "r" | "R" => Some(KeyAction::Reroll),
        "m" | "M" => Some(KeyAction::ToggleMute),
        _ => None,
    }
}
