pub mod animation;
pub mod applicator;
pub mod audio;
pub mod camera;
pub mod config;
pub mod constants;
pub mod error;
pub mod frame;
pub mod input;
pub mod model;
pub mod modulator;
pub mod palette;
pub mod scene;
pub mod session;
pub mod uniforms;
pub mod unlock;

pub use animation::*;
pub use applicator::*;
pub use audio::*;
pub use camera::*;
pub use config::*;
pub use error::{Error, Result};
pub use frame::*;
pub use input::*;
pub use model::*;
pub use modulator::*;
pub use palette::*;
pub use scene::*;
pub use session::*;
pub use uniforms::*;
pub use unlock::*;

pub use image::RgbaImage;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");
