use crate::app::ChronicleApp;
use crate::model::Action;
use egui::{CentralPanel, Context, Frame, ProgressBar, RichText, ScrollArea, Ui, Visuals};

pub fn top_panel(app: &mut ChronicleApp, ctx: &Context) {
    egui::TopBottomPanel::top("menu_panel").show(ctx, |ui| {
        ui.horizontal_centered(|ui| {
            ui.heading("👑 Royal Chronicle");
            ui.separator();
            if ui.button("🔄 Reset progress").clicked() {
                app.confirm_reset = true;
            }
            if !app.message.is_empty() {
                ui.label(RichText::new(&app.message).color(egui::Color32::YELLOW));
            }
        });
    });
}

pub fn bottom_panel(ctx: &Context) {
    egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
        // ----------- BOTONES DE TEMA -----------
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("🌙 Dark").clicked() {
                ctx.set_visuals(Visuals::dark());
            }
            if ui.button("☀ Light").clicked() {
                ctx.set_visuals(Visuals::light());
            }
        });
    });
}

/// Insignias, progreso global, quests y artefactos
pub fn sidebar(app: &ChronicleApp, ctx: &Context, actions: &mut Vec<Action>) {
    let view = app.sidebar_view();

    egui::SidePanel::left("sidebar")
        .resizable(false)
        .default_width(280.0)
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(format!("XP {}", view.experience)).strong());
                    ui.label(RichText::new(format!("Crowns {}", view.currency)).strong());
                    ui.label(RichText::new(format!("Streak {}", view.streak)).strong());
                });
                ui.add(ProgressBar::new((view.overall_mastery / 100.0) as f32));
                ui.small(view.mastery_label());

                ui.separator();
                ui.heading("Quests");
                for quest in &view.quests {
                    ui.group(|ui| {
                        ui.label(RichText::new(&quest.title).strong());
                        ui.small(&quest.era);
                        ui.small(format!("Objectives: {}", quest.objectives));
                        if ui.button(format!("Go to {}", quest.era)).clicked() {
                            actions.push(Action::EnterEra(quest.era.clone()));
                        }
                    });
                }

                ui.separator();
                ui.heading("Artifacts");
                for artifact in &view.artifacts {
                    ui.small(artifact.label());
                }
            });
        });
}

pub fn confirm_reset_window(app: &mut ChronicleApp, ctx: &Context, actions: &mut Vec<Action>) {
    egui::Window::new("Confirm reset")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label("Erase all saved progress? This cannot be undone.");
            ui.horizontal(|ui| {
                if ui.button("Yes, erase").clicked() {
                    actions.push(Action::ResetProgress);
                }
                if ui.button("No").clicked() {
                    app.confirm_reset = false;
                }
            });
        });
}

/// Panel centrado tanto vertical como horizontalmente,
/// con un tamaño de contenido máximo y un bloque interior `inner`.
pub fn centered_panel(ctx: &Context, est_height: f32, max_width: f32, inner: impl FnOnce(&mut Ui)) {
    CentralPanel::default().show(ctx, |ui| {
        let extra = ((ui.available_height() - est_height) / 2.0).max(0.0);
        ui.add_space(extra);
        Frame::default()
            .fill(ui.visuals().window_fill())
            .inner_margin(egui::Margin::symmetric(16, 16))
            .show(ui, |ui| {
                let w = ui.available_width().min(max_width);
                ui.set_width(w);
                inner(ui);
            });
        ui.add_space(extra);
    });
}
