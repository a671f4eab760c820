use crate::app::ChronicleApp;
use crate::model::{Action, QuestionKind};
use crate::ui::helpers::big_button;
use egui::{CentralPanel, Context, RichText, ScrollArea, TextEdit};

pub fn ui_encounter(app: &mut ChronicleApp, ctx: &Context, actions: &mut Vec<Action>) {
    let era = app.learner.active_era.clone().unwrap_or_default();

    CentralPanel::default().show(ctx, |ui| {
        ui.heading(format!("{era} – Encounter"));
        ui.small("Answer the questions to earn XP and Crowns.");
        ui.add_space(8.0);

        let questions = app.learner.active_quiz.as_deref().unwrap_or(&[]);
        if questions.is_empty() {
            ui.label("No questions are available for this era yet.");
        }

        ScrollArea::vertical().show(ui, |ui| {
            for (i, q) in questions.iter().enumerate() {
                let draft = app.draft_answers.entry(i).or_default();
                ui.group(|ui| {
                    ui.label(RichText::new(format!("Q{}. {}", i + 1, q.stem)).strong());
                    match &q.kind {
                        QuestionKind::Mcq { options, .. } => {
                            for opt in options {
                                ui.radio_value(&mut *draft, opt.clone(), opt.as_str());
                            }
                        }
                        QuestionKind::Ordering { options, .. } => {
                            ui.small("Enter a comma-separated order:");
                            ui.small(options.join(" • "));
                            ui.add(
                                TextEdit::singleline(draft)
                                    .hint_text(format!("e.g. {}", options.join(", "))),
                            );
                        }
                        QuestionKind::Short { .. } => {
                            ui.add(TextEdit::singleline(draft).hint_text("Your answer"));
                        }
                    }
                });
            }
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            // Un encuentro sin preguntas no se puede enviar
            let can_submit = !questions.is_empty();
            if big_button(ui, "Submit", 120.0, 32.0, can_submit) {
                actions.push(Action::SubmitQuiz(app.draft_answers.clone()));
            }
            if big_button(ui, "Back", 120.0, 32.0, true) {
                actions.push(Action::BackToMap);
            }
        });
    });
}
