use crate::app::ChronicleApp;
use crate::model::Action;
use egui::{Align, CentralPanel, Context, Layout, RichText};

pub fn ui_results(app: &ChronicleApp, ctx: &Context, actions: &mut Vec<Action>) {
    CentralPanel::default().show(ctx, |ui| {
        ui.with_layout(Layout::top_down(Align::Center), |ui| {
            let Some(result) = &app.last_result else {
                ui.label("No encounter has been completed yet.");
                if ui.button("Back to map").clicked() {
                    actions.push(Action::BackToMap);
                }
                return;
            };

            ui.heading(format!("{} – Results", result.era));
            ui.add_space(10.0);
            ui.label(
                RichText::new(format!(
                    "{}/{} correct — Score {}",
                    result.correct, result.total, result.score
                ))
                .strong(),
            );
            ui.label(format!(
                "+{} XP   +{} Crowns   Mastery {}%",
                result.xp_gain,
                result.crowns_gain,
                app.learner.mastery(&result.era)
            ));

            if let Some(id) = &result.unlocked_artifact {
                let title = app
                    .content
                    .artifacts
                    .iter()
                    .find(|a| &a.id == id)
                    .map(|a| a.title.as_str())
                    .unwrap_or(id.as_str());
                ui.label(
                    RichText::new(format!("🗝 Artifact recovered: {title}"))
                        .color(egui::Color32::GOLD),
                );
            }

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Try again").clicked() {
                    actions.push(Action::EnterEra(result.era.clone()));
                }
                if ui.button("Back to map").clicked() {
                    actions.push(Action::BackToMap);
                }
            });
        });
    });
}
