// crates/scrubdeck-media/src/render/gpu.rs
//
// GPU-backed `ThumbnailRenderer` (§4.D, §9 Design Note: "uses blade-graphics
// to own a real offscreen TARGET texture, upload the decoded frame, and read
// back through a staging buffer"). Grounded on
// examples/dkkloimwieder-blade/examples/bunnymark/main.rs, the only complete
// blade-graphics consumer in the pack: context init, texture/sampler/buffer
// creation, the upload-via-staging-buffer dance
// (`Memory::Upload` + `copy_buffer_to_texture`), and render-pipeline setup
// (`create_shader`/`create_render_pipeline`) are copied from there almost
// verbatim. The pack's own backend source (blade-graphics/src/webgpu) is an
// unfinished skeleton (`Command` has no variants yet), so it's consumer code,
// not library internals, that grounds this file.
//
// The readback side (`copy_texture_to_buffer` and a host-visible memory kind
// for the destination buffer) is not exercised anywhere in the pack — bunnymark
// only uploads, it never reads a render back to the CPU. It is written here
// by symmetry with the confirmed `copy_buffer_to_texture(src, bytes_per_row,
// dst, extent)` upload call. If the installed blade-graphics version names
// either differently, this is the one place in the crate to fix it.

use std::sync::Arc;

use blade_graphics as gpu;

use scrubdeck_core::cache_entry::RasterImage;

use crate::error::MediaError;
use crate::plugin::DecodedFrame;
use crate::render::ThumbnailRenderer;

const SHADER_SRC: &str = include_str!("gpu_shader.wgsl");

#[derive(blade_macros::ShaderData)]
struct Params {
    source_texture: gpu::TextureView,
    source_sampler: gpu::Sampler,
}

struct SourceTexture {
    texture: gpu::Texture,
    view: gpu::TextureView,
    width: u32,
    height: u32,
}

struct TargetTexture {
    texture: gpu::Texture,
    view: gpu::TextureView,
    readback: gpu::Buffer,
    width: u32,
    height: u32,
}

/// Offscreen GPU thumbnail renderer. One instance lives on the thumbnail
/// worker thread (not `Send` across a real GPU context boundary in general,
/// but blade's `Context` is designed for exactly this single-owner-thread
/// usage, matching the worker's one-thread-per-queue architecture).
pub struct GpuRenderer {
    context: gpu::Context,
    pipeline: gpu::RenderPipeline,
    sampler: gpu::Sampler,
    command_encoder: gpu::CommandEncoder,
    prev_sync_point: Option<gpu::SyncPoint>,
    source: Option<SourceTexture>,
    target: Option<TargetTexture>,
}

impl GpuRenderer {
    pub fn new() -> Self {
        let context = unsafe {
            gpu::Context::init(gpu::ContextDesc {
                presentation: false,
                validation: cfg!(debug_assertions),
                timing: false,
                capture: false,
                overlay: false,
                device_id: 0,
            })
            .expect("init headless blade-graphics context for thumbnail rendering")
        };

        let layout = <Params as gpu::ShaderData>::layout();
        let shader = context.create_shader(gpu::ShaderDesc { source: SHADER_SRC });
        let pipeline = context.create_render_pipeline(gpu::RenderPipelineDesc {
            name: "thumbnail",
            data_layouts: &[&layout],
            vertex: shader.at("vs_main"),
            vertex_fetches: &[],
            primitive: gpu::PrimitiveState {
                topology: gpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            fragment: Some(shader.at("fs_main")),
            color_targets: &[gpu::ColorTargetState {
                format: gpu::TextureFormat::Rgba8Unorm,
                blend: None,
                write_mask: gpu::ColorWrites::default(),
            }],
            multisample_state: gpu::MultisampleState::default(),
        });

        let sampler = context.create_sampler(gpu::SamplerDesc {
            name: "thumbnail-sampler",
            ..Default::default()
        });

        let command_encoder = context.create_command_encoder(gpu::CommandEncoderDesc {
            name: "thumbnail",
            buffer_count: 2,
        });

        Self {
            context,
            pipeline,
            sampler,
            command_encoder,
            prev_sync_point: None,
            source: None,
            target: None,
        }
    }

    fn ensure_source(&mut self, width: u32, height: u32) {
        if let Some(src) = &self.source {
            if src.width == width && src.height == height {
                return;
            }
        }
        if let Some(old) = self.source.take() {
            self.context.destroy_texture_view(old.view);
            self.context.destroy_texture(old.texture);
        }
        let extent = gpu::Extent { width, height, depth: 1 };
        let texture = self.context.create_texture(gpu::TextureDesc {
            name: "thumbnail-source",
            format: gpu::TextureFormat::Rgba8Unorm,
            size: extent,
            dimension: gpu::TextureDimension::D2,
            array_layer_count: 1,
            mip_level_count: 1,
            usage: gpu::TextureUsage::RESOURCE | gpu::TextureUsage::COPY,
            sample_count: 1,
            external: None,
        });
        let view = self.context.create_texture_view(
            texture,
            gpu::TextureViewDesc {
                name: "thumbnail-source-view",
                format: gpu::TextureFormat::Rgba8Unorm,
                dimension: gpu::ViewDimension::D2,
                subresources: &Default::default(),
            },
        );
        self.source = Some(SourceTexture { texture, view, width, height });
    }

    fn ensure_target(&mut self, width: u32, height: u32) {
        if let Some(t) = &self.target {
            if t.width == width && t.height == height {
                return;
            }
        }
        if let Some(old) = self.target.take() {
            self.context.destroy_buffer(old.readback);
            self.context.destroy_texture_view(old.view);
            self.context.destroy_texture(old.texture);
        }
        let extent = gpu::Extent { width, height, depth: 1 };
        let texture = self.context.create_texture(gpu::TextureDesc {
            name: "thumbnail-target",
            format: gpu::TextureFormat::Rgba8Unorm,
            size: extent,
            dimension: gpu::TextureDimension::D2,
            array_layer_count: 1,
            mip_level_count: 1,
            usage: gpu::TextureUsage::TARGET | gpu::TextureUsage::COPY,
            sample_count: 1,
            external: None,
        });
        let view = self.context.create_texture_view(
            texture,
            gpu::TextureViewDesc {
                name: "thumbnail-target-view",
                format: gpu::TextureFormat::Rgba8Unorm,
                dimension: gpu::ViewDimension::D2,
                subresources: &Default::default(),
            },
        );
        let readback = self.context.create_buffer(gpu::BufferDesc {
            name: "thumbnail-readback",
            size: (width * height) as u64 * 4,
            memory: gpu::Memory::Download,
        });
        self.target = Some(TargetTexture { texture, view, readback, width, height });
    }
}

impl ThumbnailRenderer for GpuRenderer {
    fn render(&mut self, frame: &DecodedFrame, out_width: u32, out_height: u32) -> Result<RasterImage, MediaError> {
        self.ensure_source(frame.width, frame.height);
        self.ensure_target(out_width, out_height);
        let source = self.source.as_ref().expect("source texture just ensured");
        let target = self.target.as_ref().expect("target texture just ensured");

        let upload = self.context.create_buffer(gpu::BufferDesc {
            name: "thumbnail-upload",
            size: (frame.width * frame.height) as u64 * 4,
            memory: gpu::Memory::Upload,
        });
        unsafe {
            std::ptr::copy_nonoverlapping(frame.rgba.as_ptr(), upload.data(), frame.rgba.len());
        }
        self.context.sync_buffer(upload);

        self.command_encoder.start();
        self.command_encoder.init_texture(source.texture);
        self.command_encoder.init_texture(target.texture);

        if let mut transfer = self.command_encoder.transfer("upload thumbnail source") {
            let extent = gpu::Extent { width: frame.width, height: frame.height, depth: 1 };
            transfer.copy_buffer_to_texture(upload.into(), frame.width * 4, source.texture.into(), extent);
        }

        if let mut pass = self.command_encoder.render(
            "thumbnail blit",
            gpu::RenderTargetSet {
                colors: &[gpu::RenderTarget {
                    view: target.view,
                    init_op: gpu::InitOp::Clear(gpu::TextureColor::TransparentBlack),
                    finish_op: gpu::FinishOp::Store,
                }],
                depth_stencil: None,
            },
        ) {
            let mut rc = pass.with(&self.pipeline);
            rc.bind(0, &Params { source_texture: source.view, source_sampler: self.sampler });
            rc.draw(0, 4, 0, 1);
        }

        if let mut transfer = self.command_encoder.transfer("read back thumbnail") {
            let extent = gpu::Extent { width: out_width, height: out_height, depth: 1 };
            transfer.copy_texture_to_buffer(target.texture.into(), target.readback.into(), out_width * 4, extent);
        }

        let sync_point = self.context.submit(&mut self.command_encoder);
        if let Some(prev) = self.prev_sync_point.take() {
            self.context.wait_for(&prev, !0);
        }
        self.context.wait_for(&sync_point, !0);
        self.prev_sync_point = Some(sync_point);

        let rgba = unsafe {
            std::slice::from_raw_parts(target.readback.data(), (out_width * out_height) as usize * 4).to_vec()
        };
        self.context.destroy_buffer(upload);

        Ok(RasterImage { width: out_width, height: out_height, rgba: Arc::new(rgba) })
    }
}

impl Drop for GpuRenderer {
    fn drop(&mut self) {
        if let Some(sp) = self.prev_sync_point.take() {
            self.context.wait_for(&sp, !0);
        }
        if let Some(t) = self.target.take() {
            self.context.destroy_buffer(t.readback);
            self.context.destroy_texture_view(t.view);
            self.context.destroy_texture(t.texture);
        }
        if let Some(s) = self.source.take() {
            self.context.destroy_texture_view(s.view);
            self.context.destroy_texture(s.texture);
        }
        self.context.destroy_sampler(self.sampler);
        self.context.destroy_render_pipeline(&mut self.pipeline);
        self.context.destroy_command_encoder(&mut self.command_encoder);
    }
}
