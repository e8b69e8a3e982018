//! Control panel for live-tuning the sphere.
//!
//! Only compiled with the `egui` feature.

use crate::params::{
    InteractionParams, DEFAULT_PARTICLES, MAX_INTERACTION, MAX_PARTICLES, MIN_INTERACTION,
    MIN_PARTICLES,
};

/// Values edited by the panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelState {
    pub particle_count: usize,
    pub params: InteractionParams,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLES,
            params: InteractionParams::default(),
        }
    }
}

/// What changed during one frame of the panel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanelResponse {
    /// A uniform-backed parameter changed.
    pub params_changed: bool,
    /// The particle count changed; the field must be rebuilt with this many.
    pub regenerate: Option<usize>,
}

/// Draw the panel into its own window and report what changed.
///
/// Only widgets the user actually edited count as changes.
pub fn show(ctx: &egui::Context, state: &mut PanelState, fps: f32) -> PanelResponse {
    let previous_count = state.particle_count;

    let mut response = egui::Window::new("Particles")
        .default_pos([16.0, 16.0])
        .resizable(false)
        .show(ctx, |ui| render_controls(ui, state, fps))
        .and_then(|r| r.inner)
        .unwrap_or_default();

    if response.params_changed {
        state.params = state.params.sanitized();
    }
    if response.regenerate.is_some() {
        state.particle_count = state.particle_count.clamp(MIN_PARTICLES, MAX_PARTICLES);
        response.regenerate =
            (state.particle_count != previous_count).then_some(state.particle_count);
    }
    response
}

fn render_controls(ui: &mut egui::Ui, state: &mut PanelState, fps: f32) -> PanelResponse {
    let mut response = PanelResponse::default();
    let params = &mut state.params;

    if ui
        .add(
            egui::Slider::new(&mut state.particle_count, MIN_PARTICLES..=MAX_PARTICLES)
                .text("Particle count"),
        )
        .changed()
    {
        response.regenerate = Some(state.particle_count);
    }

    ui.separator();
    ui.heading("Interaction");

    // Radius in NDC units
    response.params_changed |= ui
        .add(
            egui::Slider::new(&mut params.interaction_radius, MIN_INTERACTION..=MAX_INTERACTION)
                .text("Radius"),
        )
        .changed();
    response.params_changed |= ui
        .add(
            egui::Slider::new(&mut params.repulsion_strength, MIN_INTERACTION..=MAX_INTERACTION)
                .text("Strength"),
        )
        .changed();

    ui.separator();
    ui.heading("Colors");

    response.params_changed |= color_row(ui, "Background:", &mut params.background);
    response.params_changed |= color_row(ui, "Bottom:", &mut params.color1);
    response.params_changed |= color_row(ui, "Top:", &mut params.color2);

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.small_button("Reset").clicked() {
            *params = InteractionParams::default();
            response.params_changed = true;
        }
        ui.label(egui::RichText::new(format!("{:.0} fps", fps)).small().weak());
    });

    response
}

/// sRGB color picker. The stored value is only touched when the user edits it.
fn color_row(ui: &mut egui::Ui, label: &str, color: &mut [f32; 3]) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let mut swatch = srgb_to_swatch(*color);
        let changed = ui.color_edit_button_srgb(&mut swatch).changed();
        if changed {
            *color = swatch_to_srgb(swatch);
        }
        changed
    })
    .inner
}

/// sRGB `[0, 1]` triple to the 8-bit sRGB value egui's picker shows.
fn srgb_to_swatch(c: [f32; 3]) -> [u8; 3] {
    c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn swatch_to_srgb(c: [u8; 3]) -> [f32; 3] {
    c.map(|v| v as f32 / 255.0)
}
