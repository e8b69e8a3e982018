//! Viewer builder and host loop.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::AppError;
use crate::field::{FieldSlot, ParticleField};
use crate::gpu::{Camera, GpuState};
use crate::input::{CursorState, Input};
use crate::params::{clamp_particle_count, InteractionParams, DEFAULT_PARTICLES};
use crate::time::Time;
use crate::uniforms::{FrameContext, DEFAULT_POINT_SIZE};

#[cfg(feature = "egui")]
use crate::gpu::EguiIntegration;
#[cfg(feature = "egui")]
use crate::panel::{self, PanelState};

/// Radius of the sphere the particles are sampled in.
pub const DEFAULT_FIELD_RADIUS: f32 = 1.5;

/// Startup configuration for the viewer.
#[derive(Clone, Debug)]
pub struct SphereConfig {
    pub particle_count: usize,
    pub field_radius: f32,
    pub point_size: f32,
    pub params: InteractionParams,
    /// Fixed RNG seed for reproducible fields.
    pub seed: Option<u64>,
    pub title: String,
    pub window_size: (u32, u32),
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLES,
            field_radius: DEFAULT_FIELD_RADIUS,
            point_size: DEFAULT_POINT_SIZE,
            params: InteractionParams::default(),
            seed: None,
            title: "Particle Sphere".to_string(),
            window_size: (1280, 720),
        }
    }
}

impl SphereConfig {
    /// Build the initial field this configuration describes.
    pub fn build_field(&self) -> FieldSlot {
        let count = clamp_particle_count(self.particle_count);
        match self.seed {
            Some(seed) => {
                FieldSlot::new(ParticleField::generate_seeded(seed, count, self.field_radius))
                    .with_seed(seed)
            }
            None => FieldSlot::new(ParticleField::generate(count, self.field_radius)),
        }
    }
}

/// The particle sphere viewer.
///
/// Use method chaining to configure, then call `.run()` to start.
///
/// ```ignore
/// ParticleSphere::new()
///     .with_particle_count(50_000)
///     .with_radius(1.5)
///     .run()?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct ParticleSphere {
    config: SphereConfig,
}

impl ParticleSphere {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of particles (clamped to the supported range).
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.config.particle_count = clamp_particle_count(count);
        self
    }

    /// Set the radius of the particle sphere.
    pub fn with_radius(mut self, radius: f32) -> Self {
        if radius > 0.0 {
            self.config.field_radius = radius;
        }
        self
    }

    /// Set the base sprite size in pixels at one unit of depth.
    pub fn with_point_size(mut self, size: f32) -> Self {
        self.config.point_size = size.max(0.0);
        self
    }

    /// Set the initial interaction parameters.
    pub fn with_params(mut self, params: InteractionParams) -> Self {
        self.config.params = params.sanitized();
        self
    }

    /// Use a fixed RNG seed for the particle field.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.config.window_size = (width.max(1), height.max(1));
        self
    }

    pub fn config(&self) -> &SphereConfig {
        &self.config
    }

    /// Run the viewer. Blocks until the window is closed.
    pub fn run(self) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.config);
        event_loop.run_app(&mut app)?;

        match app.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct App {
    config: SphereConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    #[cfg(feature = "egui")]
    egui: Option<EguiIntegration>,
    #[cfg(feature = "egui")]
    panel: PanelState,
    field: FieldSlot,
    params: InteractionParams,
    camera: Camera,
    input: Input,
    time: Time,
    fatal: Option<AppError>,
}

impl App {
    fn new(config: SphereConfig) -> Self {
        let field = config.build_field();
        let (width, height) = config.window_size;
        let mut camera = Camera::new();
        camera.set_aspect(width, height);

        tracing::info!(
            particles = field.current().len(),
            radius = config.field_radius,
            "particle field generated"
        );

        Self {
            window: None,
            gpu_state: None,
            #[cfg(feature = "egui")]
            egui: None,
            #[cfg(feature = "egui")]
            panel: PanelState {
                particle_count: field.current().len(),
                params: config.params,
            },
            field,
            params: config.params,
            camera,
            input: Input::new(Arc::new(CursorState::new()), width, height),
            time: Time::new(),
            fatal: None,
            config,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu_state = pollster::block_on(GpuState::new(window.clone(), self.field.current()))?;

        let size = window.inner_size();
        self.camera.set_aspect(size.width, size.height);
        self.input.set_window_size(size.width, size.height);

        #[cfg(feature = "egui")]
        {
            self.egui = Some(EguiIntegration::new(
                gpu_state.device(),
                gpu_state.config.format,
                &window,
            ));
        }

        self.gpu_state = Some(gpu_state);
        self.window = Some(window);
        Ok(())
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if let Some(gpu_state) = &mut self.gpu_state {
            gpu_state.resize(size);
        }
        self.camera.set_aspect(size.width, size.height);
        self.input.set_window_size(size.width, size.height);
    }

    /// Rebuild the field with `count` particles and hand it to the GPU
    /// before the next draw.
    #[cfg(feature = "egui")]
    fn regenerate(&mut self, count: usize) {
        let field = self.field.regenerate(count);
        if let Some(gpu_state) = &mut self.gpu_state {
            gpu_state.replace_field(field);
        }
    }

    fn frame_context(&self) -> FrameContext {
        let (width, height) = self
            .gpu_state
            .as_ref()
            .map(|g| (g.config.width, g.config.height))
            .unwrap_or(self.config.window_size);

        FrameContext::new(
            &self.camera,
            self.params,
            self.input.cursor().load(),
            self.time.elapsed(),
        )
        .with_viewport(width, height)
        .with_field_radius(self.field.current().radius())
        .with_point_size(self.config.point_size)
    }

    /// Run the control panel for this frame and apply what it changed.
    #[cfg(feature = "egui")]
    fn run_panel(&mut self) -> Option<crate::gpu::EguiFrameOutput> {
        let fps = self.time.fps();
        let (Some(egui), Some(window)) = (self.egui.as_mut(), self.window.as_ref()) else {
            return None;
        };

        let panel_state = &mut self.panel;
        let mut response = panel::PanelResponse::default();
        let output = egui.run(window, |ctx| {
            response = panel::show(ctx, panel_state, fps);
        });

        if response.params_changed {
            self.params = self.panel.params;
            tracing::debug!(params = ?self.params, "interaction parameters changed");
        }
        if let Some(count) = response.regenerate {
            self.regenerate(count);
        }
        Some(output)
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.time.update();

        #[cfg(feature = "egui")]
        let ui_output = self.run_panel();

        let frame = self.frame_context();

        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };

        #[cfg(feature = "egui")]
        let result = {
            let egui = &mut self.egui;
            gpu_state.render(&frame, |target| {
                if let (Some(egui), Some(output)) = (egui.as_mut(), ui_output.as_ref()) {
                    egui.paint(target, output);
                }
            })
        };
        #[cfg(not(feature = "egui"))]
        let result = gpu_state.render(&frame, |_| {});

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost, reconfiguring");
                gpu_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => tracing::warn!(error = %e, "render error"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                tracing::error!(error = %err, "failed to start renderer");
                self.fatal = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "egui")]
        if let (Some(egui), Some(window)) = (&mut self.egui, &self.window) {
            // The panel sees every event; pointer events still move the
            // cursor so the sphere keeps reacting under the panel.
            egui.on_window_event(window, &event);
        }

        if self.input.handle_event(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.resize(physical_size);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
