use super::*;

impl ChronicleApp {
    /// Borra todo el progreso: estado por defecto y almacén vacío.
    /// El contenido cargado se conserva.
    pub fn reset_progress(&mut self) {
        self.learner = LearnerState::default();
        self.draft_answers.clear();
        self.last_result = None;
        self.state = AppState::Map;
        self.message.clear();
        self.confirm_reset = false;

        match self.store.clear() {
            Ok(()) => {
                self.has_saved_progress = false;
                log::info!("progress reset");
            }
            Err(err) => {
                log::warn!("saved progress could not be cleared: {err}");
                self.message = format!("⚠ Saved progress could not be cleared: {err}");
            }
        }
    }
}
