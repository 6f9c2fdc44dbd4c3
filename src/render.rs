use eye_core::{FrameParams, PostUniforms, RenderEngine, Scene, SceneUniforms};
use web_sys as web;

mod helpers;
mod post;
mod scene;
mod targets;
use targets::RenderTargets;

// ===================== WebGPU state =====================

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    scene: scene::SceneResources,
    post: post::PostResources,
    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    bg_hdr: wgpu::BindGroup,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let targets = RenderTargets::new(&device, width, height);
        let scene = scene::create_scene_resources(&device);
        let post = post::create_post_resources(&device, format);
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let bg_hdr = post::create_bind_group(&device, &post, &linear_sampler, &targets.hdr_view);

        let [r, g, b] = eye_core::constants::BACKGROUND_RGB;
        log::info!("[frame] WebGPU ready {}x{} format={:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            scene,
            post,
            targets,
            linear_sampler,
            bg_hdr,
            width,
            height,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: 1.0,
            },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.targets.recreate(&self.device, width, height);
            self.bg_hdr = post::create_bind_group(
                &self.device,
                &self.post,
                &self.linear_sampler,
                &self.targets.hdr_view,
            );
        }
    }
}

impl RenderEngine for GpuState<'_> {
    fn apply(&mut self, params: &FrameParams, scene: Option<&Scene>) {
        let su = SceneUniforms::new(params, scene, self.width, self.height);
        let pu = PostUniforms::new(params, self.width, self.height);
        self.queue
            .write_buffer(&self.scene.uniform_buffer, 0, bytemuck::bytes_of(&su));
        self.queue
            .write_buffer(&self.post.uniform_buffer, 0, bytemuck::bytes_of(&pu));
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let frame = match self.surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                anyhow::bail!("surface reconfigured");
            }
            Err(e) => return Err(anyhow::anyhow!("surface error: {:?}", e)),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // Pass 1: eye into HDR
        helpers::blit(
            &mut encoder,
            "scene_pass",
            &self.targets.hdr_view,
            self.clear_color,
            &self.scene.pipeline,
            &self.scene.bind_group,
        );

        // Pass 2: composite to swapchain
        helpers::blit(
            &mut encoder,
            "composite",
            &view,
            wgpu::Color::BLACK,
            &self.post.pipeline,
            &self.bg_hdr,
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.resize_if_needed(width, height);
    }
}

/// Stand-in when WebGPU is unavailable: the session keeps running (audio,
/// palette, animation) with nothing drawn.
#[derive(Default)]
pub struct Headless;

impl RenderEngine for Headless {
    fn apply(&mut self, _params: &FrameParams, _scene: Option<&Scene>) {}

    fn render(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn resize(&mut self, _width: u32, _height: u32) {}
}
