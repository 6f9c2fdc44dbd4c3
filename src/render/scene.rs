use super::helpers::{self, HDR_FORMAT};
use eye_core::SceneUniforms;

/// The eye pass: one uniform block, drawn as a fullscreen triangle into HDR.
pub(crate) struct SceneResources {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

pub(crate) fn create_scene_resources(device: &wgpu::Device) -> SceneResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene_shader"),
        source: wgpu::ShaderSource::Wgsl(eye_core::SCENE_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("scene_bgl"),
        entries: &[helpers::uniform_entry(0)],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    let pipeline =
        helpers::make_fullscreen_pipeline(device, "scene_pipeline", &pl, &shader, "fs_scene", HDR_FORMAT);
    let uniform_buffer = helpers::uniform_buffer::<SceneUniforms>(device, "scene_uniforms");
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("scene_bg"),
        layout: &bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });

    SceneResources {
        pipeline,
        uniform_buffer,
        bind_group,
    }
}
