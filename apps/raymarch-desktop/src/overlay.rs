use raymarch_render::FrameStats;

/// Display-only performance panel in the top-left corner.
pub fn show(ctx: &egui::Context, stats: &FrameStats) {
    egui::Window::new("Performance")
        .anchor(egui::Align2::LEFT_TOP, [10.0, 10.0])
        .collapsible(false)
        .resizable(false)
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(stats.fps_label());
            ui.label(stats.render_time_label());
        });
}
