use super::helpers::{self, HDR_FORMAT};

/// Offscreen scene color in Rgba16Float, read back by the composite pass.
pub(crate) struct RenderTargets {
    pub(crate) hdr_tex: wgpu::Texture,
    pub(crate) hdr_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (hdr_tex, hdr_view) = create_hdr(device, width, height);
        Self { hdr_tex, hdr_view }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.hdr_tex.destroy();
        (self.hdr_tex, self.hdr_view) = create_hdr(device, width, height);
    }
}

fn create_hdr(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    helpers::create_color_texture(
        device,
        "hdr_tex",
        width,
        height,
        HDR_FORMAT,
        wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
    )
}
