use std::sync::Arc;

use anyhow::{Context, Result};
use glam::UVec2;
use raymarch_render::{
    DrawOutcome, FrameStats, FrameTarget, RenderError, ShaderInputs, ShaderSources, ShaderVariant,
};
use raymarch_render_wgpu::QuadRenderer;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::overlay;

/// Image acquired for the current frame, held until present.
struct PendingFrame {
    output: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

/// Window surface, GPU device and overlay renderer behind [`FrameTarget`].
pub struct Presenter {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    quad: Option<QuadRenderer>,
    egui_ctx: egui::Context,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    pending: Option<PendingFrame>,
}

impl Presenter {
    pub fn new(
        window: Arc<Window>,
        sources: &ShaderSources,
        variant: ShaderVariant,
        vsync: bool,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create window surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no GPU adapter can present to this window")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("raymarch_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create GPU device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let quad = QuadRenderer::new(&device, surface_format, sources, variant)
            .context("failed to build shader program")?;

        let egui_ctx = egui::Context::default();
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            format = ?surface_format,
            present_mode = ?config.present_mode,
            "GPU initialized"
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            quad: Some(quad),
            egui_ctx,
            egui_winit,
            egui_renderer,
            pending: None,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Forwards a window event to egui. True if egui consumed it.
    pub fn on_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui_winit
            .on_window_event(&self.window, event)
            .consumed
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        let width = size.width.max(1);
        let height = size.height.max(1);
        if (width, height) == (self.config.width, self.config.height) {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        tracing::debug!(width, height, "surface reconfigured");
    }

    fn acquire(&mut self) -> Result<Option<wgpu::SurfaceTexture>, RenderError> {
        match self.surface.get_current_texture() {
            Ok(output) => Ok(Some(output)),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                tracing::debug!("surface lost or outdated, reconfigured");
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => Ok(None),
            Err(wgpu::SurfaceError::OutOfMemory) => Err(RenderError::OutOfMemory),
            Err(e) => Err(RenderError::Surface(e.to_string())),
        }
    }

    fn draw_overlay(&mut self, view: &wgpu::TextureView, stats: &FrameStats) {
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = self
            .egui_ctx
            .run(raw_input, |ctx| overlay::show(ctx, stats));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("overlay_encoder"),
            });
        let prepare = self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("overlay_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue
            .submit(prepare.into_iter().chain(std::iter::once(encoder.finish())));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

impl FrameTarget for Presenter {
    fn framebuffer_size(&self) -> UVec2 {
        let size = self.window.inner_size();
        UVec2::new(size.width.max(1), size.height.max(1))
    }

    fn bind_program(&mut self) -> Result<&mut dyn ShaderInputs, RenderError> {
        self.quad
            .as_mut()
            .map(QuadRenderer::inputs_mut)
            .ok_or(RenderError::Released)
    }

    fn acquire_frame(&mut self) -> Result<DrawOutcome, RenderError> {
        if self.quad.is_none() {
            return Err(RenderError::Released);
        }
        // An image left over from a failed frame goes back unpresented.
        self.pending = None;
        // The window may have been resized since the last Resized event
        // reached us; the drawable must match what the shader is told.
        self.resize(self.window.inner_size());

        let Some(output) = self.acquire()? else {
            return Ok(DrawOutcome::Skipped);
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.pending = Some(PendingFrame { output, view });
        Ok(DrawOutcome::Ready)
    }

    fn draw_fullscreen_quad(&mut self) -> Result<(), RenderError> {
        let Some(quad) = &self.quad else {
            return Err(RenderError::Released);
        };
        let frame = self
            .pending
            .as_ref()
            .ok_or_else(|| RenderError::Surface("draw without an acquired image".into()))?;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quad_encoder"),
            });
        quad.record(&self.queue, &mut encoder, &frame.view);
        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn present(&mut self, stats: &FrameStats) -> Result<(), RenderError> {
        let frame = self
            .pending
            .take()
            .ok_or_else(|| RenderError::Surface("present without a drawn frame".into()))?;
        self.draw_overlay(&frame.view, stats);
        self.window.pre_present_notify();
        frame.output.present();
        Ok(())
    }

    fn release(&mut self) {
        self.pending = None;
        if let Some(quad) = self.quad.take() {
            quad.release();
        }
        tracing::info!("GPU resources released");
    }
}
