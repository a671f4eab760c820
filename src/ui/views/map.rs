use crate::app::ChronicleApp;
use crate::model::{Action, TRACKED_ERAS};
use egui::{CentralPanel, Context, RichText, ScrollArea};

pub fn ui_map(app: &ChronicleApp, ctx: &Context, actions: &mut Vec<Action>) {
    let cards = app.card_rows();

    CentralPanel::default().show(ctx, |ui| {
        ScrollArea::vertical().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("The Map of the Realm");
                ui.add_space(8.0);
                ui.horizontal_wrapped(|ui| {
                    for era in TRACKED_ERAS {
                        let label = format!("Enter {era} ({}%)", app.learner.mastery(era));
                        if ui.button(label).clicked() {
                            actions.push(Action::EnterEra(era.to_string()));
                        }
                    }
                });
            });

            ui.add_space(12.0);
            ui.heading("Monarch cards");
            ui.horizontal_wrapped(|ui| {
                for card in &cards {
                    ui.group(|ui| {
                        ui.set_width(240.0);
                        ui.label(RichText::new(&card.name).strong());
                        ui.small(&card.subtitle);
                        ui.separator();
                        ui.small(format!("Claim: {}", card.claim));
                        ui.small(format!("Events: {}", card.events));
                        if ui.button(card.study_label()).clicked() {
                            actions.push(Action::StudyCard(card.id.clone()));
                        }
                    });
                }
            });
        });
    });
}
