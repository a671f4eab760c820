use crate::app::ChronicleApp;
use crate::model::Action;
use crate::ui::layout::centered_panel;
use egui::{Context, RichText};

pub fn ui_load_failed(app: &ChronicleApp, ctx: &Context, actions: &mut Vec<Action>) {
    centered_panel(ctx, 160.0, 480.0, |ui| {
        ui.heading("The chronicle is unavailable");
        ui.add_space(8.0);
        ui.label(RichText::new(&app.message).color(egui::Color32::LIGHT_RED));
        ui.add_space(12.0);
        if ui.button("⟲ Retry").clicked() {
            actions.push(Action::RetryLoad);
        }
    });
}
