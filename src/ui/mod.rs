mod helpers;
pub mod layout;
pub mod views;

use crate::app::ChronicleApp;
use crate::model::{Action, AppState};
use crate::persistence::write_mirror;
use eframe::{App, Frame};
use egui::Context;
use layout::{bottom_panel, confirm_reset_window, sidebar, top_panel};

impl App for ChronicleApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        // Las vistas no tocan el progreso: solo devuelven acciones
        let mut actions: Vec<Action> = Vec::new();

        if self.state != AppState::LoadFailed {
            top_panel(self, ctx);
        }

        // PANEL INFERIOR TEMA OSCURO O CLARO
        bottom_panel(ctx);

        if self.state != AppState::LoadFailed {
            sidebar(self, ctx, &mut actions);
        }

        match self.state {
            AppState::LoadFailed => views::load_failed::ui_load_failed(self, ctx, &mut actions),
            AppState::Map => views::map::ui_map(self, ctx, &mut actions),
            AppState::Encounter => views::encounter::ui_encounter(self, ctx, &mut actions),
            AppState::Results => views::results::ui_results(self, ctx, &mut actions),
        }

        if self.confirm_reset {
            confirm_reset_window(self, ctx, &mut actions);
        }

        for action in actions {
            self.dispatch(action);
            ctx.request_repaint();
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.learner.snapshot().to_json() {
            Ok(json) => write_mirror(storage, &json),
            Err(err) => log::warn!("could not mirror progress into window storage: {err}"),
        }
    }
}
